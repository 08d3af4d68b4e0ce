//! Purpose: Parse `--filter` and `--order-by` expressions into typed values.
//! Exports: `CompareOp`, `Comparison`, `Direction`, `OrderBy`.
//! Role: Single grammar boundary; evaluators never see raw expression strings.
//! Invariants: Malformed expressions are `Parse` errors carrying a usage hint.
//! Invariants: Operator detection precedence is `=`, then `>`, then `<`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::{Error, ErrorKind};

/// `<column>`, one whitespace run, then a non-empty remainder.
static COMPARISON_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(\S+)\s+(\S.*)$").expect("comparison grammar is a valid regex")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Equals,
    GreaterThan,
    LessThan,
}

impl CompareOp {
    const DETECTION_ORDER: [CompareOp; 3] =
        [CompareOp::Equals, CompareOp::GreaterThan, CompareOp::LessThan];

    pub fn symbol(self) -> char {
        match self {
            CompareOp::Equals => '=',
            CompareOp::GreaterThan => '>',
            CompareOp::LessThan => '<',
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub op: CompareOp,
    pub value: String,
}

impl Comparison {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let captures = COMPARISON_GRAMMAR.captures(raw).ok_or_else(|| {
            filter_parse_error(raw, "expected a column, whitespace, then an operator and value")
        })?;
        let column = &captures[1];
        let remainder = &captures[2];

        let op = CompareOp::DETECTION_ORDER
            .into_iter()
            .find(|op| remainder.contains(op.symbol()))
            .ok_or_else(|| filter_parse_error(raw, "missing operator; use one of `=`, `>`, `<`"))?;

        let symbol = op.symbol();
        let value = remainder.trim_matches(|c: char| c == symbol || c.is_whitespace());

        Ok(Self {
            column: column.to_string(),
            op,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)
    }
}

fn filter_parse_error(raw: &str, message: &str) -> Error {
    Error::new(ErrorKind::Parse)
        .with_message(format!("invalid --filter expression `{raw}`: {message}"))
        .with_hint("Example: --filter \"price > 1000\" or --filter \"brand = Acer\"")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let Some((column, direction)) = raw.split_once('=') else {
            return Err(order_parse_error(raw, "expected `<column>=<asc|desc>`"));
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(order_parse_error(raw, "column name is empty"));
        }
        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "asc" => Direction::Asc,
            "desc" => Direction::Desc,
            other => {
                return Err(order_parse_error(
                    raw,
                    &format!("unknown direction `{other}`; use `asc` or `desc`"),
                ));
            }
        };
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

fn order_parse_error(raw: &str, message: &str) -> Error {
    Error::new(ErrorKind::Parse)
        .with_message(format!("invalid --order-by expression `{raw}`: {message}"))
        .with_hint("Example: --order-by \"price=desc\"")
}
