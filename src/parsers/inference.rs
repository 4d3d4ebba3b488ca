//! Infers the type of each column from the first rows of the table

use std::{collections::HashMap, sync::LazyLock};

use log::debug;
use regex::Regex;

use super::TableRow;

/// Number of leading data rows sampled per column
pub const TYPE_SAMPLE_ROWS: usize = 10;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("integer pattern is a valid regex"));
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[+-]?(?:(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:e[+-]?[0-9]+)?|nan|inf|infinity)$")
        .expect("float pattern is a valid regex")
});

/// Type of a column. Ordered by precedence: one `String` cell makes the whole column `String`,
/// otherwise one `Float` cell makes it `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    String,
}

/// Column types keyed by header name
pub type ColumnTypes = HashMap<String, ColumnType>;

/// Classifies one cell, ignoring surrounding whitespace
pub fn classify(cell: &str) -> ColumnType {
    let cell = cell.trim();
    if INTEGER.is_match(cell) {
        ColumnType::Integer
    } else if FLOAT.is_match(cell) {
        ColumnType::Float
    } else {
        ColumnType::String
    }
}

pub fn is_numeric(cell: &str) -> bool {
    classify(cell) != ColumnType::String
}

/// Infers the type of every column from up to [`TYPE_SAMPLE_ROWS`] rows.
///
/// Cells missing from short rows are not sampled, and a column without any sampled
/// cell is `Integer`.
pub fn infer_types(headers: &[String], rows: &[TableRow]) -> ColumnTypes {
    let mut types: ColumnTypes = headers
        .iter()
        .map(|header| (header.clone(), ColumnType::Integer))
        .collect();
    for row in rows.iter().take(TYPE_SAMPLE_ROWS) {
        for (header, cell) in headers.iter().zip(row.cells()) {
            let cell_type = classify(cell);
            if let Some(column_type) = types.get_mut(header) {
                *column_type = (*column_type).max(cell_type);
            }
        }
    }
    debug!("Inferred column types: {:?}", types);
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<TableRow> {
        cells
            .iter()
            .map(|row| TableRow::new(row.iter().map(|c| c.to_string()).collect()))
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("42"), ColumnType::Integer);
        assert_eq!(classify(" -7 "), ColumnType::Integer);
        assert_eq!(classify("+3"), ColumnType::Integer);
        assert_eq!(classify("3.14"), ColumnType::Float);
        assert_eq!(classify("1e5"), ColumnType::Float);
        assert_eq!(classify(".5"), ColumnType::Float);
        assert_eq!(classify("5."), ColumnType::Float);
        assert_eq!(classify("NaN"), ColumnType::Float);
        assert_eq!(classify("-Infinity"), ColumnType::Float);
        assert_eq!(classify(""), ColumnType::String);
        assert_eq!(classify("1,000"), ColumnType::String);
        assert_eq!(classify("abc"), ColumnType::String);
        assert_eq!(classify("."), ColumnType::String);
    }

    #[test]
    fn test_precedence() {
        let headers = headers(&["id", "price", "name"]);
        let rows = rows(&[&["1", "2", "apple"], &["2", "2.5", "3"], &["3", "4", "pear"]]);
        let types = infer_types(&headers, &rows);
        assert_eq!(types["id"], ColumnType::Integer);
        assert_eq!(types["price"], ColumnType::Float);
        assert_eq!(types["name"], ColumnType::String);
    }

    #[test]
    fn test_only_first_rows_are_sampled() {
        let headers = headers(&["n"]);
        let one: &[&str] = &["1"];
        let mut cells = vec![one; TYPE_SAMPLE_ROWS];
        cells.push(&["not a number"]);
        let types = infer_types(&headers, &rows(&cells));
        assert_eq!(types["n"], ColumnType::Integer);
    }

    #[test]
    fn test_unsampled_column_is_integer() {
        let headers = headers(&["a", "b"]);
        let types = infer_types(&headers, &rows(&[&["x"]]));
        assert_eq!(types["a"], ColumnType::String);
        assert_eq!(types["b"], ColumnType::Integer);
        assert_eq!(infer_types(&[], &[]), ColumnTypes::new());
    }
}
