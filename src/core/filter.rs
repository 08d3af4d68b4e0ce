//! Purpose: Keep the records that satisfy one comparison expression.
//! Exports: `filter`, `filter_by`.
//! Role: First optional pipeline stage.
//! Invariants: Output preserves the input's relative record order.
//! Invariants: A record missing the column fails the whole call; nothing is skipped.

use tracing::debug;

use crate::core::compare::compare;
use crate::core::error::Error;
use crate::core::expr::Comparison;
use crate::core::table::Table;

pub fn filter(table: &Table, raw: &str) -> Result<Table, Error> {
    let comparison = Comparison::parse(raw)?;
    filter_by(table, &comparison)
}

pub fn filter_by(table: &Table, comparison: &Comparison) -> Result<Table, Error> {
    let mut kept = Vec::new();
    for record in table.records() {
        let cell = record.field(&comparison.column)?;
        if compare(cell, &comparison.value, comparison.op) {
            kept.push(record.clone());
        }
    }
    debug!(
        expr = %comparison,
        input = table.len(),
        kept = kept.len(),
        "filter applied"
    );
    Ok(table.with_records(kept))
}

#[cfg(test)]
mod tests {
    use super::filter;
    use crate::core::error::ErrorKind;
    use crate::core::table::{Record, Table};

    fn laptops() -> Table {
        Table::from_records(
            [
                ("1", "Acer", "499"),
                ("2", "Dell", "799"),
                ("3", "Huawei", "1299"),
                ("4", "MacBook", "1499"),
            ]
            .into_iter()
            .map(|(id, brand, price)| {
                Record::from_pairs([("product_id", id), ("brand", brand), ("price", price)])
            })
            .collect(),
        )
    }

    fn prices(table: &Table) -> Vec<&str> {
        table
            .records()
            .iter()
            .map(|record| record.get("price").unwrap())
            .collect()
    }

    #[test]
    fn filter_equality_on_text() {
        let out = filter(&laptops(), "brand = Acer").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.records()[0].get("brand"), Some("Acer"));
    }

    #[test]
    fn filter_greater_and_less_than() {
        let table = laptops();
        assert_eq!(prices(&filter(&table, "price > 1000").unwrap()), ["1299", "1499"]);
        assert_eq!(prices(&filter(&table, "price < 500").unwrap()), ["499"]);
    }

    #[test]
    fn filter_does_not_mutate_input() {
        let table = laptops();
        let before = table.clone();
        let _ = filter(&table, "price > 1000").unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn numeric_or_text_choice_is_per_record() {
        let table = Table::from_records(vec![
            Record::from_pairs([("v", "9")]),
            Record::from_pairs([("v", "n/a")]),
            Record::from_pairs([("v", "10")]),
        ]);
        // "9" and "10" compare numerically with "5"; "n/a" compares as text ("n/a" > "5").
        let out = filter(&table, "v > 5").unwrap();
        let values: Vec<_> = out.records().iter().map(|r| r.get("v").unwrap()).collect();
        assert_eq!(values, ["9", "n/a", "10"]);
    }

    #[test]
    fn missing_column_fails_whole_filter() {
        let err = filter(&laptops(), "weight > 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
        assert_eq!(err.column(), Some("weight"));
    }

    #[test]
    fn empty_table_filters_to_empty() {
        let out = filter(&Table::new(["price"]), "price > 1").unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), ["price".to_string()]);
    }
}
