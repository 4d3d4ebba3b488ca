//! `csvconv` is a CLI tool for converting delimited text into HTML, JSON, Python or XML.
//!
//! # Example usage:
//! ```sh
//! # Convert a CSV file into an HTML table
//! csvconv -f html data.csv
//! # Pipe a semicolon separated export and get an array of row arrays
//! cat export.txt | csvconv -f "json (array of rows)" -d ';'
//! # Each file is converted on its own, with its own dialect and header
//! csvconv -f xml first.csv second.tsv
//! # The first row is data, not a header: name the columns `val0`, `val1`, ...
//! # unless the header heuristic recognises a header row
//! csvconv -f json -i measurements.csv
//! ```
//!
//! Defaults can be kept in a JSON settings file passed with `-s`. Flags given on the command line
//! take precedence over it, and each `--no-*` or `--assume-headers` flag undoes its setting. Set `RUST_LOG=debug` to see the sniffed dialect, header decision and
//! column types.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use runner::run_csvconv;

mod runner;

/// `csvconv` converts delimited text into HTML, JSON, Python or XML
#[derive(Debug, Parser)]
struct Args {
    /// Output format: `html`, `json`, `json (array of columns)`, `json (array of rows)`,
    /// `python`, `xml` or `xmlProperties`
    #[arg(short, long)]
    format: String,
    /// Input files, each converted independently. Reads stdin if none are given.
    files: Vec<PathBuf>,
    /// Delimiter used when it cannot be sniffed from the input (default `,`)
    #[arg(short, long)]
    delimiter: Option<char>,
    /// Line separator of the output. Accepts `\n`, `\r` and `\t` escapes.
    #[arg(long)]
    line_sep: Option<String>,
    /// Indent with this many spaces instead of a tab
    #[arg(long)]
    spaces: Option<usize>,
    /// Replace spaces in header names with underscores. Always on for the XML formats.
    #[arg(short, long)]
    merge_headers: bool,
    /// Keep header names as they are, even if the settings file merges them
    #[arg(long, conflicts_with = "merge_headers")]
    no_merge_headers: bool,
    /// Only use the first row as the header if it looks like one.
    /// If not specified, the first row is always the header.
    #[arg(short, long)]
    infer_header: bool,
    /// Always use the first row as the header, even if the settings file says to infer it
    #[arg(long, conflicts_with = "infer_header")]
    assume_headers: bool,
    /// Render numeric columns as numbers in JSON and Python output
    #[arg(long)]
    typed: bool,
    /// Render every value as a string, even if the settings file asks for typed values
    #[arg(long, conflicts_with = "typed")]
    no_typed: bool,
    /// Escape `&`, `<`, `>` and quotes in HTML and XML output
    #[arg(long)]
    escape: bool,
    /// Write cell text unescaped, even if the settings file asks for escaping
    #[arg(long, conflicts_with = "escape")]
    no_escape: bool,
    /// JSON settings file with default options
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

/// Primary entrypoint for `csvconv`
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run_csvconv(args)
}
