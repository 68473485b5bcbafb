//! Non-destructive extension of a named table.
//!
//! Unlike marker rebuilds, the existing table keeps its frame and
//! formatting: rows and columns are only ever added, and cells outside the
//! incoming data are blanked rather than removed.

use serde::Serialize;

use crate::document::shape::{self, ShapeKind};
use crate::document::table;
use crate::document::{Element, Node};

use super::mapping::GenericTable;

/// Rows and columns added while extending a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Extension {
    pub rows_added: usize,
    pub columns_added: usize,
}

/// Whether a shape is a table whose name matches `tag` (trimmed,
/// case-insensitive)
pub fn is_tagged_table(shape: &Element, tag: &str) -> bool {
    shape::kind(shape) == ShapeKind::Table
        && shape::name(shape).is_some_and(|name| name.trim().eq_ignore_ascii_case(tag.trim()))
}

/// Extend the first tagged table among the top-level shapes of `tree`.
///
/// Returns `None` when the tree holds no such table.
pub fn extend_tagged_table(
    tree: &mut Element,
    tag: &str,
    data: &GenericTable,
    column_width: i64,
) -> Option<Extension> {
    let frame = tree.children.iter_mut().find_map(|node| match node {
        Node::Element(shape) if is_tagged_table(shape, tag) => Some(shape),
        _ => None,
    })?;

    let extension = extend_table(shape::table_mut(frame)?, data, column_width);
    if extension != Extension::default() {
        table::fit_frame_extent(frame);
    }
    Some(extension)
}

/// Grow `tbl` to fit `data` and write it in, header first.
pub fn extend_table(tbl: &mut Element, data: &GenericTable, column_width: i64) -> Extension {
    let need_cols = data
        .rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(data.headers.len());
    let need_rows = 1 + data.rows.len();

    let mut extension = Extension::default();
    while table::column_count(tbl) < need_cols {
        table::add_column(tbl, column_width);
        extension.columns_added += 1;
    }
    while table::row_count(tbl) < need_rows {
        table::add_row(tbl);
        extension.rows_added += 1;
    }

    let have_cols = table::column_count(tbl);
    let have_rows = table::row_count(tbl);
    for row in 0..have_rows {
        let values = match row {
            0 => Some(&data.headers),
            r => data.rows.get(r - 1),
        };
        for col in 0..have_cols {
            let text = values
                .and_then(|cells| cells.get(col))
                .map(|cell| cell.0.as_str())
                .unwrap_or("");
            table::set_cell_text(tbl, row, col, text);
        }
    }

    extension
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::table::cell_text;
    use crate::document::xml::XmlDocument;
    use serde_json::json;

    fn table_frame(name: &str, rows: &[&[&str]]) -> String {
        let cols = rows.first().map_or(0, |r| r.len());
        let grid: String = (0..cols).map(|_| r#"<a:gridCol w="100"/>"#).collect();
        let body: String = rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .iter()
                    .map(|t| format!("<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>{t}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"))
                    .collect();
                format!(r#"<a:tr h="10">{cells}</a:tr>"#)
            })
            .collect();
        format!(
            r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="{name}"/></p:nvGraphicFramePr><p:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></p:xfrm><a:graphic><a:graphicData><a:tbl><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
        )
    }

    fn tree(frames: &[String]) -> Element {
        let xml = format!("<p:spTree>{}</p:spTree>", frames.concat());
        XmlDocument::parse(xml.as_bytes()).unwrap().root
    }

    fn data(value: serde_json::Value) -> GenericTable {
        serde_json::from_value(value).unwrap()
    }

    fn texts(tbl: &Element) -> Vec<Vec<String>> {
        (0..table::row_count(tbl))
            .map(|r| {
                (0..table::column_count(tbl))
                    .map(|c| cell_text(tbl, r, c).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_extends_rows_and_columns() {
        let mut tree = tree(&[table_frame(" Quality ", &[&["h1"], &["a"]])]);
        let data = data(json!({"headers": ["Metric", "2024"], "rows": [["NPS", "40", "x"], ["CSAT"]]}));

        let extension = extend_tagged_table(&mut tree, "quality", &data, 500).unwrap();
        assert_eq!(
            extension,
            Extension {
                rows_added: 1,
                columns_added: 2
            }
        );

        let frame = tree.child("graphicFrame").unwrap();
        let tbl = shape::table(frame).unwrap();
        assert_eq!(
            texts(tbl),
            vec![
                vec!["Metric", "2024", ""],
                vec!["NPS", "40", "x"],
                vec!["CSAT", "", ""],
            ]
        );
        assert_eq!(frame.path(&["xfrm", "ext"]).unwrap().attr("cx"), Some("1100"));
    }

    #[test]
    fn test_never_shrinks_and_blanks_leftovers() {
        let mut tree = tree(&[table_frame(
            "quality",
            &[&["a", "b", "c"], &["d", "e", "f"], &["g", "h", "i"]],
        )]);
        let data = data(json!({"headers": ["H"], "rows": [["1"]]}));

        let extension = extend_tagged_table(&mut tree, "quality", &data, 500).unwrap();
        assert_eq!(extension, Extension::default());

        let tbl = shape::table(tree.child("graphicFrame").unwrap()).unwrap();
        assert_eq!(
            texts(tbl),
            vec![
                vec!["H", "", ""],
                vec!["1", "", ""],
                vec!["", "", ""],
            ]
        );
    }

    #[test]
    fn test_only_first_tagged_table() {
        let mut tree = tree(&[
            table_frame("other", &[&["keep"]]),
            table_frame("quality", &[&["first"]]),
            table_frame("QUALITY", &[&["second"]]),
        ]);
        let data = data(json!({"headers": ["new"], "rows": []}));

        assert!(extend_tagged_table(&mut tree, "quality", &data, 500).is_some());

        let values: Vec<String> = tree
            .children_named("graphicFrame")
            .map(|frame| cell_text(shape::table(frame).unwrap(), 0, 0).unwrap())
            .collect();
        assert_eq!(values, vec!["keep", "new", "second"]);
    }

    #[test]
    fn test_no_tagged_table() {
        let mut tree = tree(&[table_frame("other", &[&["keep"]])]);
        let data = data(json!({"headers": ["x"], "rows": []}));
        assert_eq!(extend_tagged_table(&mut tree, "quality", &data, 500), None);
    }
}
