//! Purpose: Shared numeric coercion and the numeric-or-text comparator.
//! Exports: `parse_number`, `compare`.
//! Invariants: Pure functions; no hidden state between calls.
//! Invariants: Numeric comparison applies only when both operands parse as numbers.

use crate::core::expr::CompareOp;

/// Parses a cell as `f64`, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

pub fn compare(cell: &str, value: &str, op: CompareOp) -> bool {
    match (parse_number(cell), parse_number(value)) {
        (Some(lhs), Some(rhs)) => match op {
            CompareOp::Equals => lhs == rhs,
            CompareOp::GreaterThan => lhs > rhs,
            CompareOp::LessThan => lhs < rhs,
        },
        _ => match op {
            CompareOp::Equals => cell == value,
            CompareOp::GreaterThan => cell > value,
            CompareOp::LessThan => cell < value,
        },
    }
}
