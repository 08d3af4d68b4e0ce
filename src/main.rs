//! Purpose: `csvsift` CLI entry point.
//! Role: Binary crate root; parses flags, loads the table, runs the query, renders stdout.
//! Invariants: stdout carries only the rendered result; logs and diagnostics go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;
mod render;
mod sample;

use csvsift::core::error::{Error, ErrorKind, to_exit_code};
use render::Format;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `csvsift --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    command_dispatch::dispatch(cli)
        .map_err(add_query_hint)
        .map_err(add_io_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "csvsift",
    version,
    about = "Filter, order, and aggregate delimited text tables",
    long_about = None,
    after_help = r#"EXAMPLES
  $ csvsift --file phones.csv
  $ csvsift --file phones.csv --filter "brand = Apple"
  $ csvsift --file phones.csv --filter "price > 1000" --order-by "rating=desc"
  $ csvsift --file phones.csv --aggregate price avg
  $ csvsift generate phones.csv --rows 20

NOTES
  - --filter is `<column> <op><value>` with op one of = > <; the column must be
    followed by whitespace
  - Values that both parse as numbers compare numerically, otherwise as text
  - --order-by labels are inverted: `asc` lists high-to-low, `desc` low-to-high
  - With --aggregate only the single aggregate row is printed
  - Set RUST_LOG=debug to trace each stage on stderr"#,
    arg_required_else_help = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[arg(
        long,
        help = "Delimited text file with a header row; needed unless a subcommand is given",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(
        long,
        value_name = "EXPR",
        help = "Keep rows matching `<column> <op><value>` (op: = > <)"
    )]
    filter: Option<String>,
    #[arg(
        long = "order-by",
        value_name = "EXPR",
        help = "Order rows by a numeric column: `<column>=<asc|desc>`"
    )]
    order_by: Option<String>,
    #[arg(
        long,
        num_args = 2,
        value_names = ["COLUMN", "FUNC"],
        help = "Print one statistic over a column instead of the table (FUNC: min|max|avg)"
    )]
    aggregate: Option<Vec<String>>,
    #[arg(long, default_value_t = ',', help = "Field delimiter (single ASCII character)")]
    delimiter: char,
    #[arg(
        long,
        default_value = "table",
        value_enum,
        help = "Output format: table|json|csv"
    )]
    format: Format,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Write a sample phone catalogue to a delimited file",
        after_help = r#"EXAMPLES
  $ csvsift generate phones.csv
  $ csvsift generate phones.csv --rows 1000 --seed 7"#
    )]
    Generate {
        #[arg(help = "Output file path", value_hint = ValueHint::FilePath)]
        path: PathBuf,
        #[arg(long, default_value_t = sample::DEFAULT_ROWS, help = "Number of rows to write")]
        rows: usize,
        #[arg(long, help = "Seed for reproducible output")]
        seed: Option<u64>,
    },
    #[command(
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ csvsift completion bash > ~/.local/share/bash-completion/completions/csvsift
  $ csvsift completion zsh > ~/.zfunc/_csvsift
  $ csvsift completion fish > ~/.config/fish/completions/csvsift.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn add_query_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::FieldNotFound => {
            err.with_hint("Column names are case-sensitive and must match the header row.")
        }
        ErrorKind::NonNumericColumn => err.with_hint(
            "--order-by and --aggregate need every value in the column to be a number.",
        ),
        ErrorKind::Malformed => err.with_hint(
            "Check that every row has as many fields as the header, or pass --delimiter.",
        ),
        _ => err,
    }
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::NotFound => err.with_hint("Check the --file path."),
        ErrorKind::Io => err.with_hint("I/O error. Check the path, permissions, and disk space."),
        _ => err,
    }
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_LOG=debug and share the command if it persists.",
    )
}

enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Malformed => "malformed input".to_string(),
        ErrorKind::Parse => "invalid expression".to_string(),
        ErrorKind::FieldNotFound => "column not found".to_string(),
        ErrorKind::NonNumericColumn => "column is not numeric".to_string(),
        ErrorKind::EmptyInput => "nothing to aggregate".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(column) = err.column() {
        inner.insert("column".to_string(), json!(column));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(row) = err.row() {
        inner.insert("row".to_string(), json!(row));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(row) = err.row() {
        lines.push(format!(
            "{} {row}",
            colorize_label("row:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
