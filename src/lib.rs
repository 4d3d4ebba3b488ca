//! `csvconv` converts delimited text (CSV, TSV, semicolon separated, ...) into an HTML table,
//! JSON, a Python literal or XML.
//!
//! # Example usage:
//! ```
//! use csvconv::{ConversionConfig, Format, convert};
//!
//! let config = ConversionConfig::new(Format::JsonArrayOfColumns);
//! let result = convert("a,b\n1,2\n3,4\n", &config)?;
//! assert_eq!(result.text, r#"{"a":["1","3"],"b":["2","4"]}"#);
//! # Ok::<(), csvconv::ConvertError>(())
//! ```
//!
//! # Formats
//! | Key | Output |
//! |---|---|
//! | `html` | `<table>` with a `<thead>` row of headers and one `<tbody>` row per record |
//! | `json` | array of objects mapping header to value |
//! | `json (array of columns)` | object mapping header to the values of its column |
//! | `json (array of rows)` | array of arrays of values |
//! | `python` | list of dicts as a Python literal |
//! | `xml` | `<rows>` with a `<row>` per record and an element per field |
//! | `xmlProperties` | `<rows>` with a `<row>` per record and an attribute per field |
//!
//! ## Design
//! A conversion is a pipeline. The dialect (delimiter and quote character) is sniffed from the
//! first 1024 characters, falling back to the configured delimiter when the sample is ambiguous.
//! The first record becomes the header, either unconditionally or when a heuristic says it looks
//! like one; otherwise the columns are named `val0`, `val1`, etc. Each column is then classified
//! as integer, float or string from its first ten values, and the table is rendered.
//!
//! Values are rendered as text by default, and nothing is escaped for HTML or XML. Both can be
//! changed with [`ConversionConfig::typed_values`] and [`ConversionConfig::escape_markup`].

pub mod convert;
pub mod parsers;
pub mod render;
pub mod settings;

pub use convert::{ConversionConfig, ConversionResult, ConvertError, convert, convert_all};
pub use render::{Format, Syntax};
pub use settings::{Settings, SettingsError};
