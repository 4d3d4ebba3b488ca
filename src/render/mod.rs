//! Renders a parsed table in one of the supported output formats

use std::{borrow::Cow, fmt, str::FromStr};

use crate::{
    convert::ConvertError,
    parsers::{
        TableData,
        inference::{ColumnType, ColumnTypes},
    },
};

pub mod html;
pub mod json;
pub mod python;
pub mod xml;

/// Output formats, named by the keys users select them with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Html,
    /// Array of objects, one per row
    Json,
    /// Object mapping each header to the values of its column
    JsonArrayOfColumns,
    /// Array of arrays, one per row
    JsonArrayOfRows,
    /// Python list of dicts
    Python,
    /// One child element per field
    Xml,
    /// One attribute per field
    XmlProperties,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Html,
        Format::Json,
        Format::JsonArrayOfColumns,
        Format::JsonArrayOfRows,
        Format::Python,
        Format::Xml,
        Format::XmlProperties,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Json => "json",
            Format::JsonArrayOfColumns => "json (array of columns)",
            Format::JsonArrayOfRows => "json (array of rows)",
            Format::Python => "python",
            Format::Xml => "xml",
            Format::XmlProperties => "xmlProperties",
        }
    }

    /// Every format key, quoted and comma separated
    pub fn key_list() -> String {
        Self::ALL
            .iter()
            .map(|format| format!("`{}`", format.key()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Syntax of the rendered output
    pub fn syntax(&self) -> Syntax {
        match self {
            Format::Html => Syntax::Html,
            Format::Json | Format::JsonArrayOfColumns | Format::JsonArrayOfRows => {
                Syntax::JavaScript
            }
            Format::Python => Syntax::Python,
            Format::Xml | Format::XmlProperties => Syntax::Xml,
        }
    }

    /// XML formats use header names as element and attribute names, which cannot contain spaces
    pub fn requires_merged_headers(&self) -> bool {
        matches!(self, Format::Xml | Format::XmlProperties)
    }

    pub fn render(
        &self,
        table: &TableData,
        types: &ColumnTypes,
        options: &RenderOptions,
    ) -> String {
        match self {
            Format::Html => html::render(table, options),
            Format::Json => json::render_objects(table, types, options),
            Format::JsonArrayOfColumns => json::render_columns(table, types, options),
            Format::JsonArrayOfRows => json::render_rows(table, types, options),
            Format::Python => python::render(table, types, options),
            Format::Xml => xml::render_elements(table, options),
            Format::XmlProperties => xml::render_attributes(table, options),
        }
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.key() == s)
            .ok_or_else(|| ConvertError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Language of the converted text, used by a host to pick a syntax highlighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    Html,
    JavaScript,
    Python,
    Xml,
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Syntax::Html => "HTML",
            Syntax::JavaScript => "JavaScript",
            Syntax::Python => "Python",
            Syntax::Xml => "XML",
        };
        f.write_str(name)
    }
}

/// Layout options shared by all renderers
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub newline: &'a str,
    pub indent: &'a str,
    /// Render cells of numeric columns as numbers (JSON and Python only)
    pub typed_values: bool,
    /// Escape markup characters in HTML and XML text and attribute values
    pub escape_markup: bool,
}

impl RenderOptions<'_> {
    /// Appends `text` indented `depth` times and terminated by a newline
    pub(crate) fn push_line(&self, out: &mut String, depth: usize, text: &str) {
        for _ in 0..depth {
            out.push_str(self.indent);
        }
        out.push_str(text);
        out.push_str(self.newline);
    }

    /// Cell text for HTML and XML output
    pub(crate) fn markup<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.escape_markup {
            escape_markup(text)
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Replaces `&`, `<`, `>`, `"` and `'` with entity references
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// A cell as it is rendered by the JSON and Python formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Value<'a> {
    Text(&'a str),
    Integer(i64),
    Float(f64),
}

impl<'a> Value<'a> {
    /// Text unless typed values are on and the cell parses as its column's numeric type.
    /// Cells past the sampled rows may not fit the inferred type, those stay text.
    pub(crate) fn of(cell: &'a str, column_type: Option<&ColumnType>, typed: bool) -> Self {
        if !typed {
            return Value::Text(cell);
        }
        let trimmed = cell.trim();
        match column_type {
            Some(ColumnType::Integer) => trimmed
                .parse()
                .map(Value::Integer)
                .unwrap_or(Value::Text(cell)),
            Some(ColumnType::Float) => match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Value::Float(f),
                _ => Value::Text(cell),
            },
            Some(ColumnType::String) | None => Value::Text(cell),
        }
    }
}
