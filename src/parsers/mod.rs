//! Parsers which turn delimited text into a table of headers and rows

use csv::{ReaderBuilder, StringRecord};

pub mod delimited;
pub mod inference;
pub mod sniffer;

/// Number of leading characters inspected when sniffing the dialect and detecting a header row
pub const SAMPLE_CHARS: usize = 1024;

/// Describes how one line of input splits into fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Spaces directly after a delimiter are not part of the next field
    pub skip_initial_space: bool,
}

impl Dialect {
    /// Dialect with the given delimiter and standard double quoting
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            quote: b'"',
            skip_initial_space: false,
        }
    }

    pub fn with_quote(self, quote: u8) -> Self {
        Self { quote, ..self }
    }

    pub fn with_skip_initial_space(self, skip_initial_space: bool) -> Self {
        Self {
            skip_initial_space,
            ..self
        }
    }

    /// Fields of `record`, without the spaces after each delimiter if those are skipped
    pub(crate) fn fields(self, record: &StringRecord) -> impl Iterator<Item = &str> {
        let skip = self.skip_initial_space;
        record.iter().enumerate().map(move |(idx, field)| {
            if skip && idx > 0 {
                field.trim_start_matches(' ')
            } else {
                field
            }
        })
    }

    /// CSV reader which yields every record (including the first) and tolerates ragged rows
    pub(crate) fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(false)
            .flexible(true);
        builder
    }
}

/// Returns at most the first [`SAMPLE_CHARS`] characters of `text`
pub fn sample(text: &str) -> &str {
    match text.char_indices().nth(SAMPLE_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A record with no fields, or a single empty field, comes from a blank line
pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(str::is_empty)
}

/// Represents one data row, with cells aligned to the header by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<String>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Value of the cell in column `idx`, or the empty string if the row is too short
    pub fn get(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// Represents the parsed table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    header: Vec<String>,
    rows: Vec<TableRow>,
}

impl TableData {
    pub fn new(header: Vec<String>, rows: Vec<TableRow>) -> Self {
        Self { header, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}
