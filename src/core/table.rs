//! Purpose: In-memory table model consumed and produced by every pipeline stage.
//! Exports: `Record`, `Table`.
//! Role: Value types only; stages take `&Table` and build new tables.
//! Invariants: Cell values are kept as the exact text that was read (no inferred typing).
//! Invariants: Every record in a table exposes the header's column set.

use std::collections::BTreeMap;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    cells: BTreeMap<String, String>,
}

impl Record {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Like `get`, but a missing column is a `FieldNotFound` error.
    pub fn field(&self, column: &str) -> Result<&str, Error> {
        self.get(column).ok_or_else(|| {
            Error::new(ErrorKind::FieldNotFound)
                .with_message(format!("no column named `{column}`"))
                .with_column(column)
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Builds a table from records alone, taking the header from the first record.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = records
            .first()
            .map(|record| record.cells.keys().cloned().collect())
            .unwrap_or_default();
        Self { columns, records }
    }

    /// Same header, different rows. Used by stages to emit their result.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
