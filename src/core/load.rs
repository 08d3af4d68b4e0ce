//! Purpose: Read a delimited UTF-8 text file into a `Table`.
//! Exports: `load_table`, `read_table`, `DEFAULT_DELIMITER`.
//! Role: Loader collaborator in front of the pipeline; the core never touches files.
//! Invariants: The first row is the header; every later row must have the same width.
//! Invariants: The file handle is scoped to `load_table` and released before it returns.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::table::{Record, Table};

pub const DEFAULT_DELIMITER: u8 = b',';

pub fn load_table(path: &Path, delimiter: u8) -> Result<Table, Error> {
    let file = File::open(path).map_err(|err| open_error(path, err))?;
    let table = read_table(file, delimiter).map_err(|err| err.with_path(path))?;
    debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "table loaded"
    );
    Ok(table)
}

pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(malformed)?.clone();
    let mut table = Table::new(headers.iter());
    for row in reader.records() {
        let row = row.map_err(malformed)?;
        table.push(Record::from_pairs(headers.iter().zip(row.iter())));
    }
    Ok(table)
}

fn open_error(path: &Path, err: io::Error) -> Error {
    let kind = match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        _ => ErrorKind::Io,
    };
    Error::new(kind)
        .with_message("failed to open input file")
        .with_path(path)
        .with_source(err)
}

fn malformed(err: csv::Error) -> Error {
    let row = err.position().map(|pos| pos.line());
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("row has {len} fields, header has {expected_len}"),
        csv::ErrorKind::Utf8 { .. } => "input is not valid UTF-8".to_string(),
        _ => "failed to read delimited input".to_string(),
    };
    let is_io = matches!(err.kind(), csv::ErrorKind::Io(_));
    let mut out = Error::new(if is_io {
        ErrorKind::Io
    } else {
        ErrorKind::Malformed
    })
    .with_message(message);
    if let Some(row) = row {
        out = out.with_row(row);
    }
    out.with_source(err)
}
