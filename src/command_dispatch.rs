//! Purpose: Hold top-level CLI command dispatch for `csvsift`.
//! Exports: `dispatch`.
//! Role: Thin adapter from parsed flags to `load_table` + `Query::run` + `render`.
//! Invariants: Stage order is owned by `Query`; this module only wires inputs and outputs.

use super::*;

use std::io::Write;

use clap::CommandFactory;
use csvsift::core::load::load_table;
use csvsift::core::pipeline::Query;
use tracing::debug;

pub(super) fn dispatch(cli: Cli) -> Result<RunOutcome, Error> {
    match cli.command {
        Some(Command::Generate { path, rows, seed }) => {
            sample::generate(&path, rows, seed)?;
            Ok(RunOutcome::ok())
        }
        Some(Command::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "csvsift", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        None => run_query(cli),
    }
}

fn run_query(cli: Cli) -> Result<RunOutcome, Error> {
    let path = cli.file.ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("--file is required")
            .with_hint("Example: csvsift --file phones.csv --filter \"price > 1000\"")
    })?;
    let delimiter = delimiter_byte(cli.delimiter)?;
    let query = Query {
        filter: cli.filter,
        order_by: cli.order_by,
        aggregate: aggregate_pair(cli.aggregate)?,
    };
    debug!(?query, path = %path.display(), "running query");

    let table = load_table(&path, delimiter)?;
    let output = query.run(&table)?;
    let rendered = render::render(&output, cli.format)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write output")
                .with_source(err)
        })?;
    Ok(RunOutcome::ok())
}

fn delimiter_byte(delimiter: char) -> Result<u8, Error> {
    if delimiter.is_ascii() && delimiter != '\n' && delimiter != '\r' && delimiter != '"' {
        return Ok(delimiter as u8);
    }
    Err(Error::new(ErrorKind::Usage)
        .with_message(format!("unsupported delimiter `{}`", delimiter.escape_default()))
        .with_hint("Use a single ASCII character other than a quote or newline, e.g. --delimiter ';'."))
}

fn aggregate_pair(values: Option<Vec<String>>) -> Result<Option<(String, String)>, Error> {
    let Some(values) = values else {
        return Ok(None);
    };
    match <[String; 2]>::try_from(values) {
        Ok([column, function]) => Ok(Some((column, function))),
        Err(_) => Err(Error::new(ErrorKind::Usage)
            .with_message("--aggregate takes exactly two values")
            .with_hint("Example: --aggregate price avg")),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, aggregate_pair, delimiter_byte, dispatch};
    use clap::Parser;
    use csvsift::core::error::ErrorKind;

    #[test]
    fn query_without_file_is_usage_error() {
        let cli = Cli::try_parse_from(["csvsift", "--filter", "a = b"]).expect("parse");
        match dispatch(cli) {
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::Usage);
                assert!(err.message().unwrap().contains("--file"));
                assert!(err.hint().is_some());
            }
            Ok(_) => panic!("query without --file should fail"),
        }
    }

    #[test]
    fn delimiter_must_be_plain_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert_eq!(delimiter_byte('é').unwrap_err().kind(), ErrorKind::Usage);
        assert_eq!(delimiter_byte('"').unwrap_err().kind(), ErrorKind::Usage);
    }

    #[test]
    fn aggregate_pair_splits_column_and_function() {
        assert_eq!(aggregate_pair(None).unwrap(), None);
        assert_eq!(
            aggregate_pair(Some(vec!["price".into(), "max".into()])).unwrap(),
            Some(("price".to_string(), "max".to_string()))
        );
        assert!(aggregate_pair(Some(vec!["price".into()])).is_err());
    }
}
