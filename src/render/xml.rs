//! XML output, with fields either as child elements or as attributes

use crate::parsers::TableData;

use super::RenderOptions;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn open_document(options: &RenderOptions) -> String {
    let mut out = String::new();
    options.push_line(&mut out, 0, DECLARATION);
    options.push_line(&mut out, 0, "<rows>");
    out
}

/// `<row><a>1</a><b>2</b></row>` per row
pub fn render_elements(table: &TableData, options: &RenderOptions) -> String {
    let mut out = open_document(options);
    for row in table.rows() {
        options.push_line(&mut out, 1, "<row>");
        for (idx, header) in table.headers().iter().enumerate() {
            let element = format!("<{header}>{}</{header}>", options.markup(row.get(idx)));
            options.push_line(&mut out, 2, &element);
        }
        options.push_line(&mut out, 1, "</row>");
    }
    out.push_str("</rows>");
    out
}

/// `<row a="1" b="2"></row>` per row
pub fn render_attributes(table: &TableData, options: &RenderOptions) -> String {
    let mut out = open_document(options);
    for row in table.rows() {
        let attributes: Vec<String> = table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, header)| format!(r#" {header}="{}""#, options.markup(row.get(idx))))
            .collect();
        options.push_line(&mut out, 1, &format!("<row{}></row>", attributes.concat()));
    }
    out.push_str("</rows>");
    out
}
