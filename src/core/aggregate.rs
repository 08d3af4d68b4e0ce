//! Purpose: Reduce one numeric column to a single labeled statistic.
//! Exports: `AggregateFn`, `AggregateResult`, `aggregate`.
//! Role: Final optional pipeline stage; its result replaces the table in the output.
//! Invariants: Zero records is `EmptyInput`, never a default of 0 or NaN.
//! Invariants: Checks run in order: numeric conversion, emptiness, function name.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::order::numeric_column;
use crate::core::table::Table;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AggregateFn {
    Min,
    Max,
    Avg,
}

impl AggregateFn {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Avg => "avg",
        }
    }

    /// Folds from the first value; a later value replaces the running result only when it
    /// compares strictly smaller (min) or larger (max), so a leading `NaN` sticks.
    fn reduce(self, first: f64, rest: &[f64]) -> f64 {
        match self {
            AggregateFn::Min => rest
                .iter()
                .fold(first, |acc, &v| if v < acc { v } else { acc }),
            AggregateFn::Max => rest
                .iter()
                .fold(first, |acc, &v| if v > acc { v } else { acc }),
            AggregateFn::Avg => {
                rest.iter().fold(first, |acc, &v| acc + v) / (rest.len() + 1) as f64
            }
        }
    }
}

impl FromStr for AggregateFn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(AggregateFn::Min),
            "max" => Ok(AggregateFn::Max),
            "avg" => Ok(AggregateFn::Avg),
            other => Err(Error::new(ErrorKind::Parse)
                .with_message(format!("unknown aggregate function `{other}`"))
                .with_hint("Use one of: min, max, avg.")),
        }
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateResult {
    pub label: String,
    pub value: f64,
}

pub fn aggregate(table: &Table, column: &str, function: &str) -> Result<AggregateResult, Error> {
    let values = numeric_column(table, column)?;
    let Some((&first, rest)) = values.split_first() else {
        return Err(Error::new(ErrorKind::EmptyInput)
            .with_message(format!("no rows to aggregate for `{function}({column})`"))
            .with_column(column)
            .with_hint("The input (after filtering) has no rows; loosen --filter."));
    };
    let function: AggregateFn = function.parse()?;
    let value = function.reduce(first, rest);
    debug!(%function, column, rows = values.len(), value, "aggregate computed");
    Ok(AggregateResult {
        label: format!("{function}({column})"),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::{AggregateFn, aggregate};
    use crate::core::error::ErrorKind;
    use crate::core::table::{Record, Table};

    fn prices(values: &[&str]) -> Table {
        Table::from_records(
            values
                .iter()
                .map(|v| Record::from_pairs([("price", *v)]))
                .collect(),
        )
    }

    #[test]
    fn min_max_avg() {
        let table = prices(&["499", "799", "1299", "1499"]);

        let min = aggregate(&table, "price", "min").unwrap();
        assert_eq!(min.label, "min(price)");
        assert_eq!(min.value, 499.0);

        let max = aggregate(&table, "price", "max").unwrap();
        assert_eq!(max.label, "max(price)");
        assert_eq!(max.value, 1499.0);

        let avg = aggregate(&table, "price", "avg").unwrap();
        assert_eq!(avg.label, "avg(price)");
        assert_eq!(avg.value, 1024.0);
    }

    #[test]
    fn empty_table_is_empty_input() {
        let err = aggregate(&Table::new(["price"]), "price", "min").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn empty_input_is_reported_before_unknown_function() {
        let err = aggregate(&Table::new(["price"]), "price", "median").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn unknown_function_is_parse_error() {
        let err = aggregate(&prices(&["1"]), "price", "median").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.message().unwrap().contains("median"));
    }

    #[test]
    fn non_numeric_value_is_reported_first() {
        let err = aggregate(&prices(&["1", "cheap"]), "price", "median").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonNumericColumn);
        assert_eq!(err.column(), Some("price"));
    }

    #[test]
    fn missing_column_is_field_not_found() {
        let err = aggregate(&prices(&["1", "2"]), "weight", "min").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
        assert_eq!(err.column(), Some("weight"));
    }

    #[test]
    fn nan_only_column_yields_nan_not_infinity() {
        let table = prices(&["nan"]);
        for func in ["min", "max", "avg"] {
            let result = aggregate(&table, "price", func).unwrap();
            assert!(result.value.is_nan(), "{func}: {}", result.value);
        }
    }

    #[test]
    fn leading_nan_sticks_trailing_nan_is_skipped() {
        let result = aggregate(&prices(&["nan", "5"]), "price", "min").unwrap();
        assert!(result.value.is_nan());
        let result = aggregate(&prices(&["nan", "5"]), "price", "max").unwrap();
        assert!(result.value.is_nan());

        assert_eq!(aggregate(&prices(&["5", "nan"]), "price", "min").unwrap().value, 5.0);
        assert_eq!(aggregate(&prices(&["5", "nan", "7"]), "price", "max").unwrap().value, 7.0);
    }

    #[test]
    fn aggregate_is_repeatable() {
        let table = prices(&["0.1", "0.2", "0.3"]);
        let first = aggregate(&table, "price", "avg").unwrap();
        let second = aggregate(&table, "price", "avg").unwrap();
        assert_eq!(first.value.to_bits(), second.value.to_bits());
    }

    #[test]
    fn function_names_round_trip_through_display() {
        for func in [AggregateFn::Min, AggregateFn::Max, AggregateFn::Avg] {
            assert_eq!(func.to_string().parse::<AggregateFn>().unwrap(), func);
        }
    }
}
