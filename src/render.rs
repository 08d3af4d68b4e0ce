//! Purpose: Turn a query `Output` into stdout text.
//! Exports: `Format`, `render`.
//! Role: Renderer collaborator for the CLI; the library core never formats output.
//! Invariants: Cell text is emitted exactly as loaded; only aggregate values are numbers.
//! Invariants: Non-finite aggregate values render as their text form in every format.
//! Invariants: Text layout is a header line, a dash rule per column, then one line per row;
//! widths are terminal display columns, so wide characters count double.

use clap::ValueEnum;
use serde_json::{Map, Value, json};
use unicode_width::UnicodeWidthStr;

use csvsift::core::aggregate::AggregateResult;
use csvsift::core::compare::parse_number;
use csvsift::core::error::{Error, ErrorKind};
use csvsift::core::pipeline::Output;
use csvsift::core::table::{Record, Table};

const COLUMN_GAP: &str = "  ";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Table,
    Json,
    Csv,
}

pub(crate) fn render(output: &Output, format: Format) -> Result<String, Error> {
    match (output, format) {
        (Output::Table(table), Format::Table) => Ok(table_text(table)),
        (Output::Table(table), Format::Json) => json_text(&table_json(table)),
        (Output::Table(table), Format::Csv) => csv_text(table),
        (Output::Aggregate(result), Format::Table) => Ok(table_text(&aggregate_table(result))),
        (Output::Aggregate(result), Format::Json) => json_text(&aggregate_json(result)),
        (Output::Aggregate(result), Format::Csv) => csv_text(&aggregate_table(result)),
    }
}

fn aggregate_table(result: &AggregateResult) -> Table {
    let mut table = Table::new([result.label.as_str()]);
    table.push(Record::from_pairs([(
        result.label.as_str(),
        result.value.to_string(),
    )]));
    table
}

fn table_text(table: &Table) -> String {
    let columns = table.columns();
    if columns.is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<&str>> = table
        .records()
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).unwrap_or(""))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            cells
                .iter()
                .map(|row| row[idx].width())
                .chain(std::iter::once(column.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let right_align: Vec<bool> = (0..columns.len())
        .map(|idx| !cells.is_empty() && cells.iter().all(|row| parse_number(row[idx]).is_some()))
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(join_row(
        columns.iter().map(String::as_str),
        &widths,
        &right_align,
    ));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    for row in &cells {
        lines.push(join_row(row.iter().copied(), &widths, &right_align));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn join_row<'a>(
    values: impl Iterator<Item = &'a str>,
    widths: &[usize],
    right_align: &[bool],
) -> String {
    let padded: Vec<String> = values
        .zip(widths.iter().zip(right_align))
        .map(|(value, (&width, &right))| {
            let pad = " ".repeat(width.saturating_sub(value.width()));
            if right {
                format!("{pad}{value}")
            } else {
                format!("{value}{pad}")
            }
        })
        .collect();
    padded.join(COLUMN_GAP).trim_end().to_string()
}

fn table_json(table: &Table) -> Value {
    let rows = table
        .records()
        .iter()
        .map(|record| {
            let mut map = Map::new();
            for column in table.columns() {
                map.insert(column.clone(), json!(record.get(column).unwrap_or("")));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();
    Value::Array(rows)
}

fn aggregate_json(result: &AggregateResult) -> Value {
    let mut map = Map::new();
    let value = if result.value.is_finite() {
        json!(result.value)
    } else {
        json!(result.value.to_string())
    };
    map.insert(result.label.clone(), value);
    Value::Object(map)
}

fn json_text(value: &Value) -> Result<String, Error> {
    let mut out = serde_json::to_string_pretty(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    out.push('\n');
    Ok(out)
}

fn csv_text(table: &Table) -> Result<String, Error> {
    let encode_error = |err: csv::Error| {
        Error::new(ErrorKind::Internal)
            .with_message("csv encode failed")
            .with_source(err)
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns()).map_err(encode_error)?;
    for record in table.records() {
        writer
            .write_record(table.columns().iter().map(|c| record.get(c).unwrap_or("")))
            .map_err(encode_error)?;
    }
    let bytes = writer.into_inner().map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("csv flush failed")
            .with_source(err.into_error())
    })?;
    String::from_utf8(bytes).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("csv output is not UTF-8")
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{Format, render};
    use csvsift::core::aggregate::AggregateResult;
    use csvsift::core::pipeline::Output;
    use csvsift::core::table::{Record, Table};

    fn phones() -> Table {
        let mut table = Table::new(["name", "price"]);
        table.push(Record::from_pairs([("name", "Pixel 7 Pro"), ("price", "799")]));
        table.push(Record::from_pairs([("name", "Nokia G22"), ("price", "1299")]));
        table
    }

    #[test]
    fn text_table_aligns_numbers_right() {
        let text = render(&Output::Table(phones()), Format::Table).unwrap();
        let expected = "\
name         price
-----------  -----
Pixel 7 Pro    799
Nokia G22     1299
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_table_prints_header_only() {
        let text = render(&Output::Table(Table::new(["price"])), Format::Table).unwrap();
        assert_eq!(text, "price\n-----\n");
    }

    #[test]
    fn aggregate_prints_single_row() {
        let result = AggregateResult {
            label: "min(price)".to_string(),
            value: 499.0,
        };
        let text = render(&Output::Aggregate(result), Format::Table).unwrap();
        assert_eq!(text, "min(price)\n----------\n       499\n");
    }

    #[test]
    fn aggregate_json_is_single_entry_object() {
        let result = AggregateResult {
            label: "avg(price)".to_string(),
            value: 998.5,
        };
        let text = render(&Output::Aggregate(result), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({"avg(price)": 998.5}));
    }

    #[test]
    fn non_finite_aggregate_is_text_in_json() {
        let cases = [
            (f64::INFINITY, "inf"),
            (f64::NEG_INFINITY, "-inf"),
            (f64::NAN, "NaN"),
        ];
        for (value, expected) in cases {
            let result = AggregateResult {
                label: "avg(p)".to_string(),
                value,
            };
            let json = render(&Output::Aggregate(result.clone()), Format::Json).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, serde_json::json!({ "avg(p)": expected }));

            let text = render(&Output::Aggregate(result), Format::Table).unwrap();
            assert_eq!(text.lines().last().map(str::trim), Some(expected));
        }
    }

    #[test]
    fn wide_characters_keep_columns_aligned() {
        let mut table = Table::new(["name", "price"]);
        table.push(Record::from_pairs([("name", "小米"), ("price", "300")]));
        table.push(Record::from_pairs([("name", "Poco"), ("price", "250")]));
        let text = render(&Output::Table(table), Format::Table).unwrap();
        let expected = "\
name  price
----  -----
小米    300
Poco    250
";
        assert_eq!(text, expected);
    }

    #[test]
    fn table_json_keeps_cells_as_text() {
        let text = render(&Output::Table(phones()), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["price"], "1299");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn csv_output_quotes_when_needed() {
        let mut table = Table::new(["name"]);
        table.push(Record::from_pairs([("name", "a,b")]));
        let text = render(&Output::Table(table), Format::Csv).unwrap();
        assert_eq!(text, "name\n\"a,b\"\n");
    }
}
