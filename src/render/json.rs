//! JSON output in three shapes
//!
//! JSON is emitted compact. Values are strings unless typed values are requested, in which case
//! cells of numeric columns become JSON numbers.

use serde_json::{Map, Number, Value as Json};

use crate::parsers::{TableData, TableRow, inference::ColumnTypes};

use super::{RenderOptions, Value};

fn json_value(cell: &str, header: &str, types: &ColumnTypes, options: &RenderOptions) -> Json {
    match Value::of(cell, types.get(header), options.typed_values) {
        Value::Text(text) => Json::String(text.to_string()),
        Value::Integer(n) => Json::from(n),
        Value::Float(f) => Number::from_f64(f)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(cell.to_string())),
    }
}

fn row_values(
    table: &TableData,
    row: &TableRow,
    types: &ColumnTypes,
    options: &RenderOptions,
) -> Vec<Json> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, header)| json_value(row.get(idx), header, types, options))
        .collect()
}

/// `[{"a": "1", "b": "2"}, ...]`, keys in header order
pub fn render_objects(table: &TableData, types: &ColumnTypes, options: &RenderOptions) -> String {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let object: Map<String, Json> = table
                .headers()
                .iter()
                .cloned()
                .zip(row_values(table, row, types, options))
                .collect();
            Json::Object(object)
        })
        .collect();
    Json::Array(rows).to_string()
}

/// `{"a": ["1", "3"], "b": ["2", "4"]}`, one key per header even without rows
pub fn render_columns(table: &TableData, types: &ColumnTypes, options: &RenderOptions) -> String {
    let mut columns: Vec<Vec<Json>> = vec![Vec::new(); table.headers().len()];
    for row in table.rows() {
        for (column, value) in columns.iter_mut().zip(row_values(table, row, types, options)) {
            column.push(value);
        }
    }
    let object: Map<String, Json> = table
        .headers()
        .iter()
        .cloned()
        .zip(columns.into_iter().map(Json::Array))
        .collect();
    Json::Object(object).to_string()
}

/// `[["1", "2"], ["3", "4"]]`, values in header order
pub fn render_rows(table: &TableData, types: &ColumnTypes, options: &RenderOptions) -> String {
    let rows = table
        .rows()
        .iter()
        .map(|row| Json::Array(row_values(table, row, types, options)))
        .collect();
    Json::Array(rows).to_string()
}
