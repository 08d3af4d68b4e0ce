//! Purpose: Compose the optional stages into one query run.
//! Exports: `Query`, `Output`.
//! Role: The only place stage order is decided: filter, then order, then aggregate.
//! Invariants: Stages never mutate their input; each step yields a new table.
//! Invariants: An aggregate request replaces the table in the output (modes are exclusive).

use tracing::info;

use crate::core::aggregate::{AggregateResult, aggregate};
use crate::core::error::Error;
use crate::core::filter::filter;
use crate::core::order::order;
use crate::core::table::Table;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Option<String>,
    pub order_by: Option<String>,
    /// `(column, function)`.
    pub aggregate: Option<(String, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    Table(Table),
    Aggregate(AggregateResult),
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, expr: impl Into<String>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    pub fn with_order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    pub fn with_aggregate(mut self, column: impl Into<String>, function: impl Into<String>) -> Self {
        self.aggregate = Some((column.into(), function.into()));
        self
    }

    pub fn run(&self, table: &Table) -> Result<Output, Error> {
        let filtered;
        let mut current = table;
        if let Some(expr) = &self.filter {
            filtered = filter(current, expr)?;
            current = &filtered;
        }

        let ordered;
        if let Some(expr) = &self.order_by {
            ordered = order(current, expr)?;
            current = &ordered;
        }

        if let Some((column, function)) = &self.aggregate {
            let result = aggregate(current, column, function)?;
            info!(label = %result.label, value = result.value, "query produced aggregate");
            return Ok(Output::Aggregate(result));
        }

        info!(rows = current.len(), "query produced table");
        Ok(Output::Table(current.clone()))
    }
}
