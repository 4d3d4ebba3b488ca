//! Reads input where cells are separated by a delimiter into a header and data rows

use std::io::Read;

use csv::StringRecord;
use log::{debug, trace};

use crate::convert::ConvertError;

use super::{Dialect, TableData, TableRow, is_blank, sample, sniffer::has_header};

/// Placeholder column names are this prefix followed by the column index
const PLACEHOLDER_PREFIX: &str = "val";

/// Reader for delimited input with a resolved dialect
#[derive(Debug, Clone, Copy)]
pub struct DelimitedReader {
    dialect: Dialect,
    assume_headers: bool,
    merge_headers: bool,
}

impl DelimitedReader {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            assume_headers: true,
            merge_headers: false,
        }
    }

    /// Use the first record as the header without checking whether it looks like one
    pub fn assume_headers(self, assume_headers: bool) -> Self {
        Self {
            assume_headers,
            ..self
        }
    }

    /// Replace spaces in header names with underscores
    pub fn merge_headers(self, merge_headers: bool) -> Self {
        Self {
            merge_headers,
            ..self
        }
    }

    /// Reads the whole input. Empty input gives an empty table.
    pub fn read(&self, text: &str) -> Result<TableData, ConvertError> {
        self.read_from(text.as_bytes(), sample(text))
    }

    /// Reads records from `input`. `sample` is only consulted for header detection.
    pub(crate) fn read_from<R: Read>(
        &self,
        input: R,
        sample: &str,
    ) -> Result<TableData, ConvertError> {
        let mut reader = self.dialect.reader_builder().from_reader(input);
        let mut header: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|source| ConvertError::MalformedRow {
                record: idx + 1,
                source,
            })?;
            if is_blank(&record) {
                trace!("Skipping blank record {}", idx + 1);
                continue;
            }
            let width = match &header {
                Some(header) => header.len(),
                None => {
                    let candidate = self.candidate_header(&record);
                    if self.assume_headers || has_header(sample, self.dialect) {
                        debug!("Using first record as header: {:?}", candidate);
                        header = Some(candidate);
                        // the header row is not data
                        continue;
                    }
                    let placeholder = placeholder_header(candidate.len());
                    debug!("First record is data, using header {:?}", placeholder);
                    let width = placeholder.len();
                    header = Some(placeholder);
                    width
                }
            };
            let row = TableRow::new(
                self.dialect
                    .fields(&record)
                    .take(width)
                    .map(str::to_string)
                    .collect(),
            );
            trace!("Parsed row: {:?}", row);
            rows.push(row);
        }
        Ok(TableData::new(header.unwrap_or_default(), rows))
    }

    fn candidate_header(&self, record: &StringRecord) -> Vec<String> {
        self.dialect
            .fields(record)
            .map(|name| {
                if self.merge_headers {
                    name.replace(' ', "_")
                } else {
                    name.to_string()
                }
            })
            .collect()
    }
}

/// `val0`, `val1`, ... for each of `n_cols` columns
fn placeholder_header(n_cols: usize) -> Vec<String> {
    (0..n_cols)
        .map(|i| format!("{PLACEHOLDER_PREFIX}{i}"))
        .collect()
}
