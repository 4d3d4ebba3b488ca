//! Python literal output: a list with one dict per row

use std::fmt::Write;

use crate::parsers::{TableData, inference::ColumnTypes};

use super::{RenderOptions, Value};

/// `[{'a': '1', 'b': '2'}, ...]`, keys in header order
pub fn render(table: &TableData, types: &ColumnTypes, options: &RenderOptions) -> String {
    let rows: Vec<String> = table
        .rows()
        .iter()
        .map(|row| {
            let fields: Vec<String> = table
                .headers()
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = Value::of(row.get(idx), types.get(header), options.typed_values);
                    format!("{}: {}", repr_str(header), literal(value))
                })
                .collect();
            format!("{{{}}}", fields.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

fn literal(value: Value) -> String {
    match value {
        Value::Text(text) => repr_str(text),
        Value::Integer(n) => n.to_string(),
        // debug formatting always keeps a decimal point or exponent, so the literal stays a float
        Value::Float(f) => format!("{f:?}"),
    }
}

/// Quotes `text` the way Python's `repr` quotes a `str`
pub fn repr_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                // writing to a String cannot fail
                let _ = match c as u32 {
                    n @ 0..=0xff => write!(out, "\\x{n:02x}"),
                    n @ 0x100..=0xffff => write!(out, "\\u{n:04x}"),
                    n => write!(out, "\\U{n:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Characters `repr` writes as they are: everything but separators other than the ASCII
/// space, control and format characters, private use characters and noncharacters
fn is_printable(c: char) -> bool {
    !matches!(
        c,
        // Cc
        '\0'..='\x1f' | '\x7f'..='\u{9f}'
        // Zs
        | '\u{a0}' | '\u{1680}' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
        // Zl, Zp
        | '\u{2028}' | '\u{2029}'
        // Cf
        | '\u{ad}'
        | '\u{600}'..='\u{605}'
        | '\u{61c}'
        | '\u{6dd}'
        | '\u{70f}'
        | '\u{890}'..='\u{891}'
        | '\u{8e2}'
        | '\u{180e}'
        | '\u{200b}'..='\u{200f}'
        | '\u{202a}'..='\u{202e}'
        | '\u{2060}'..='\u{2064}'
        | '\u{2066}'..='\u{206f}'
        | '\u{feff}'
        | '\u{fff9}'..='\u{fffb}'
        | '\u{110bd}'
        | '\u{110cd}'
        | '\u{13430}'..='\u{1343f}'
        | '\u{1bca0}'..='\u{1bca3}'
        | '\u{1d173}'..='\u{1d17a}'
        | '\u{e0001}'
        | '\u{e0020}'..='\u{e007f}'
        // Co
        | '\u{e000}'..='\u{f8ff}'
        | '\u{f0000}'..='\u{ffffd}'
        | '\u{100000}'..='\u{10fffd}'
        // noncharacters
        | '\u{fdd0}'..='\u{fdef}'
        | '\u{fffe}'..='\u{ffff}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{TableRow, inference::infer_types};

    const OPTIONS: RenderOptions<'static> = RenderOptions {
        newline: "\n",
        indent: "\t",
        typed_values: false,
        escape_markup: false,
    };

    #[test]
    fn test_repr_str() {
        assert_eq!(repr_str("abc"), "'abc'");
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_str("'\""), "'\\'\"'");
        assert_eq!(repr_str("a\\b\nc"), "'a\\\\b\\nc'");
        assert_eq!(repr_str("\u{1}"), "'\\x01'");
        assert_eq!(repr_str("café"), "'café'");
    }

    #[test]
    fn test_repr_str_escapes_invisible_characters() {
        assert_eq!(repr_str("a b"), "'a b'");
        assert_eq!(repr_str("1\u{a0}000"), "'1\\xa0000'");
        assert_eq!(repr_str("a\u{2028}b"), "'a\\u2028b'");
        assert_eq!(repr_str("\u{feff}id"), "'\\ufeffid'");
        assert_eq!(repr_str("\u{200b}"), "'\\u200b'");
        assert_eq!(repr_str("\u{e0001}"), "'\\U000e0001'");
        assert_eq!(repr_str("日本"), "'日本'");
    }

    #[test]
    fn test_render() {
        let table = TableData::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                TableRow::new(vec!["1".into(), "x".into()]),
                TableRow::new(vec!["2.5".into()]),
            ],
        );
        let types = infer_types(table.headers(), table.rows());
        assert_eq!(
            render(&table, &types, &OPTIONS),
            "[{'a': '1', 'b': 'x'}, {'a': '2.5', 'b': ''}]"
        );
        let typed = RenderOptions {
            typed_values: true,
            ..OPTIONS
        };
        assert_eq!(
            render(&table, &types, &typed),
            "[{'a': 1.0, 'b': 'x'}, {'a': 2.5, 'b': ''}]"
        );
        assert_eq!(render(&TableData::default(), &types, &OPTIONS), "[]");
    }
}
