//! HTML table output

use crate::parsers::TableData;

use super::RenderOptions;

pub fn render(table: &TableData, options: &RenderOptions) -> String {
    let mut out = String::new();
    options.push_line(&mut out, 0, "<table>");

    options.push_line(&mut out, 1, "<thead>");
    let head = table
        .headers()
        .iter()
        .map(|header| format!("<th>{}</th>", options.markup(header)));
    push_row(&mut out, head, options);
    options.push_line(&mut out, 1, "</thead>");

    options.push_line(&mut out, 1, "<tbody>");
    for row in table.rows() {
        // cells follow the header order
        let cells = (0..table.headers().len())
            .map(|idx| format!("<td>{}</td>", options.markup(row.get(idx))));
        push_row(&mut out, cells, options);
    }
    options.push_line(&mut out, 1, "</tbody>");

    out.push_str("</table>");
    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, options: &RenderOptions) {
    options.push_line(out, 2, "<tr>");
    for cell in cells {
        options.push_line(out, 3, &cell);
    }
    options.push_line(out, 2, "</tr>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::TableRow;

    fn options(escape_markup: bool) -> RenderOptions<'static> {
        RenderOptions {
            newline: "\n",
            indent: "  ",
            typed_values: false,
            escape_markup,
        }
    }

    #[test]
    fn test_render_table() {
        let table = TableData::new(
            vec!["a".to_string(), "b".to_string()],
            vec![TableRow::new(vec!["1".to_string()])],
        );
        let expected = "<table>
  <thead>
    <tr>
      <th>a</th>
      <th>b</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <td>1</td>
      <td></td>
    </tr>
  </tbody>
</table>";
        assert_eq!(render(&table, &options(false)), expected);
    }

    #[test]
    fn test_markup_is_not_escaped_by_default() {
        let table = TableData::new(
            vec!["<b>".to_string()],
            vec![TableRow::new(vec!["a & b".to_string()])],
        );
        let raw = render(&table, &options(false));
        assert!(raw.contains("<th><b></th>"));
        assert!(raw.contains("<td>a & b</td>"));

        let escaped = render(&table, &options(true));
        assert!(escaped.contains("<th>&lt;b&gt;</th>"));
        assert!(escaped.contains("<td>a &amp; b</td>"));
    }
}
