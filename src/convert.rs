//! Converts delimited text into the selected output format

use log::debug;
use thiserror::Error;

use crate::{
    parsers::{delimited::DelimitedReader, inference::infer_types, sample, sniffer},
    render::{Format, RenderOptions, Syntax},
};

/// Newline used when no line separator is configured
pub const PLATFORM_NEWLINE: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Errors that can occur when converting
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Unknown format `{0}`. Expected one of {keys}", keys = Format::key_list())]
    UnknownFormat(String),
    #[error("Delimiter {0:?} must be a single ASCII character other than a quote or line break")]
    InvalidDelimiter(char),
    /// A record that is not valid UTF-8. Only raised when reading bytes, so `convert` and
    /// `convert_all` never return it for `&str` input.
    #[error("Malformed row at record {record}")]
    MalformedRow {
        record: usize,
        #[source]
        source: csv::Error,
    },
}

/// Options for one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    pub format: Format,
    /// Delimiter used when it cannot be sniffed from the input
    pub delimiter: char,
    pub line_sep: String,
    /// One level of indentation
    pub indent: String,
    /// Replace spaces in header names with underscores. Always on for the XML formats.
    pub merge_headers: bool,
    /// Use the first row as the header without checking whether it looks like one
    pub assume_headers: bool,
    /// Render numeric columns as numbers in the JSON and Python formats
    pub typed_values: bool,
    /// Escape markup characters in the HTML and XML formats
    pub escape_markup: bool,
}

impl ConversionConfig {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            delimiter: ',',
            line_sep: PLATFORM_NEWLINE.to_string(),
            indent: "\t".to_string(),
            merge_headers: false,
            assume_headers: true,
            typed_values: false,
            escape_markup: false,
        }
    }

    fn fallback_delimiter(&self) -> Result<u8, ConvertError> {
        match self.delimiter {
            '"' | '\n' | '\r' => Err(ConvertError::InvalidDelimiter(self.delimiter)),
            c if c.is_ascii() => Ok(c as u8),
            c => Err(ConvertError::InvalidDelimiter(c)),
        }
    }

    fn render_options(&self) -> RenderOptions<'_> {
        RenderOptions {
            newline: &self.line_sep,
            indent: &self.indent,
            typed_values: self.typed_values,
            escape_markup: self.escape_markup,
        }
    }
}

/// Converted text and its syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub text: String,
    pub syntax: Syntax,
}

/// Converts `raw` into `config.format`
pub fn convert(raw: &str, config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let fallback = config.fallback_delimiter()?;
    let dialect = sniffer::sniff_or(sample(raw), fallback);
    let merge_headers = config.merge_headers || config.format.requires_merged_headers();
    let table = DelimitedReader::new(dialect)
        .assume_headers(config.assume_headers)
        .merge_headers(merge_headers)
        .read(raw)?;
    debug!(
        "Read {} rows with headers {:?}",
        table.rows().len(),
        table.headers()
    );

    let types = infer_types(table.headers(), table.rows());
    let text = config
        .format
        .render(&table, &types, &config.render_options());
    Ok(ConversionResult {
        text,
        syntax: config.format.syntax(),
    })
}

/// Converts each input independently. Fails without output if any input fails.
pub fn convert_all<'a, I>(
    inputs: I,
    config: &ConversionConfig,
) -> Result<Vec<ConversionResult>, ConvertError>
where
    I: IntoIterator<Item = &'a str>,
{
    inputs
        .into_iter()
        .map(|raw| convert(raw, config))
        .collect()
}
