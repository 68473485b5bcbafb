//! DrawingML tables (`a:tbl` inside a `p:graphicFrame`).
//!
//! Cells are addressed by row index and by position of the `a:tc` within
//! its row; merged cells are not re-flowed.

use super::shape::{self, Geometry};
use super::text::{frame_text, set_font_size, set_frame_text};
use super::xml::{Element, Node};

pub const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

/// "Medium Style 2 - Accent 1", the default style for new tables
const DEFAULT_TABLE_STYLE: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";
const DEFAULT_ROW_HEIGHT: i64 = 370_840;

pub fn row_count(tbl: &Element) -> usize {
    tbl.children_named("tr").count()
}

pub fn column_count(tbl: &Element) -> usize {
    tbl.child("tblGrid")
        .map_or(0, |grid| grid.children_named("gridCol").count())
}

pub fn cell(tbl: &Element, row: usize, col: usize) -> Option<&Element> {
    tbl.children_named("tr")
        .nth(row)?
        .children_named("tc")
        .nth(col)
}

pub fn cell_mut(tbl: &mut Element, row: usize, col: usize) -> Option<&mut Element> {
    tbl.children_named_mut("tr")
        .nth(row)?
        .children_named_mut("tc")
        .nth(col)
}

/// Every `a:tc` in row-major order
pub fn cells_mut(tbl: &mut Element) -> impl Iterator<Item = &mut Element> + '_ {
    tbl.children_named_mut("tr")
        .flat_map(|row| row.children_named_mut("tc"))
}

pub fn cell_text(tbl: &Element, row: usize, col: usize) -> Option<String> {
    cell(tbl, row, col).map(|tc| tc.child("txBody").map(frame_text).unwrap_or_default())
}

/// Rewrite a cell's text; `false` when the cell does not exist
pub fn set_cell_text(tbl: &mut Element, row: usize, col: usize, text: &str) -> bool {
    match cell_mut(tbl, row, col) {
        Some(tc) => {
            set_frame_text(cell_body_mut(tc), text);
            true
        }
        None => false,
    }
}

/// The cell's `a:txBody`, created when absent
pub fn cell_body_mut(tc: &mut Element) -> &mut Element {
    let index = match tc
        .children
        .iter()
        .position(|node| matches!(node, Node::Element(el) if el.is("txBody")))
    {
        Some(index) => index,
        None => {
            tc.children.insert(0, Node::Element(empty_text_body()));
            0
        }
    };

    match &mut tc.children[index] {
        Node::Element(body) => body,
        _ => unreachable!("position matched an element"),
    }
}

/// Append a row cloned from the last one, with its text cleared
pub fn add_row(tbl: &mut Element) {
    let columns = column_count(tbl);
    let mut row = tbl
        .children_named("tr")
        .last()
        .cloned()
        .unwrap_or_else(|| new_row(DEFAULT_ROW_HEIGHT, columns));

    for tc in row.children_named_mut("tc") {
        tc.remove_attr("rowSpan");
        tc.remove_attr("vMerge");
        set_frame_text(cell_body_mut(tc), "");
    }

    let index = insertion_index(tbl, &["tr", "tblGrid", "tblPr"]);
    tbl.children.insert(index, Node::Element(row));
}

/// Append a column of the given width, cloned from the last one, with its
/// text cleared
pub fn add_column(tbl: &mut Element, width: i64) {
    if tbl.child("tblGrid").is_none() {
        let index = insertion_index(tbl, &["tblPr"]);
        tbl.children
            .insert(index, Node::Element(Element::new("a:tblGrid")));
    }
    if let Some(grid) = tbl.child_mut("tblGrid") {
        let mut col = grid
            .children_named("gridCol")
            .last()
            .cloned()
            .unwrap_or_else(|| Element::new("a:gridCol"));
        col.set_attr("w", width.to_string());
        let index = insertion_index(grid, &["gridCol"]);
        grid.children.insert(index, Node::Element(col));
    }

    for row in tbl.children_named_mut("tr") {
        let mut tc = row
            .children_named("tc")
            .last()
            .cloned()
            .unwrap_or_else(new_cell);
        tc.remove_attr("gridSpan");
        tc.remove_attr("hMerge");
        set_frame_text(cell_body_mut(&mut tc), "");

        let index = insertion_index(row, &["tc"]);
        row.children.insert(index, Node::Element(tc));
    }
}

/// Resize a table frame's extent to the sum of its column widths and row
/// heights
pub fn fit_frame_extent(frame: &mut Element) {
    let Some(tbl) = shape::table(frame) else {
        return;
    };

    let width: i64 = tbl
        .child("tblGrid")
        .map(|grid| {
            grid.children_named("gridCol")
                .filter_map(|col| col.attr("w")?.parse::<i64>().ok())
                .sum()
        })
        .unwrap_or(0);
    let height: i64 = tbl
        .children_named("tr")
        .filter_map(|row| row.attr("h")?.parse::<i64>().ok())
        .sum();

    if let Some(ext) = frame.path_mut(&["xfrm", "ext"]) {
        ext.set_attr("cx", width.to_string());
        ext.set_attr("cy", height.to_string());
    }
}

/// Build a new table graphic frame.
///
/// `cells` is row-major, header row first; every row is laid out over
/// `columns` columns (longer rows are clipped, shorter ones padded). Column
/// widths and row heights split the geometry evenly, and every cell gets
/// the given font size (hundredths of a point).
pub fn build_table_frame(
    id: u32,
    geometry: Geometry,
    cells: &[Vec<String>],
    columns: usize,
    font_size: u32,
) -> Element {
    let columns = columns.max(1);
    let rows = cells.len().max(1);

    let mut grid = Element::new("a:tblGrid");
    for width in split_evenly(geometry.width, columns) {
        grid = grid.with_child(Element::new("a:gridCol").with_attr("w", width.to_string()));
    }

    let mut tbl = Element::new("a:tbl")
        .with_child(
            Element::new("a:tblPr")
                .with_attr("firstRow", "1")
                .with_attr("bandRow", "1")
                .with_child(Element::new("a:tableStyleId").with_text(DEFAULT_TABLE_STYLE)),
        )
        .with_child(grid);

    let heights = split_evenly(geometry.height, rows);
    for (r, height) in heights.into_iter().enumerate() {
        let values = cells.get(r).map(Vec::as_slice).unwrap_or_default();
        let mut row = Element::new("a:tr").with_attr("h", height.to_string());
        for c in 0..columns {
            let mut tc = new_cell();
            let body = cell_body_mut(&mut tc);
            set_frame_text(body, values.get(c).map(String::as_str).unwrap_or(""));
            set_font_size(body, font_size);
            row = row.with_child(tc);
        }
        tbl = tbl.with_child(row);
    }

    Element::new("p:graphicFrame")
        .with_child(
            Element::new("p:nvGraphicFramePr")
                .with_child(
                    Element::new("p:cNvPr")
                        .with_attr("id", id.to_string())
                        .with_attr("name", format!("Table {}", id.saturating_sub(1))),
                )
                .with_child(
                    Element::new("p:cNvGraphicFramePr")
                        .with_child(Element::new("a:graphicFrameLocks").with_attr("noGrp", "1")),
                )
                .with_child(Element::new("p:nvPr")),
        )
        .with_child(
            Element::new("p:xfrm")
                .with_child(
                    Element::new("a:off")
                        .with_attr("x", geometry.left.to_string())
                        .with_attr("y", geometry.top.to_string()),
                )
                .with_child(
                    Element::new("a:ext")
                        .with_attr("cx", geometry.width.to_string())
                        .with_attr("cy", geometry.height.to_string()),
                ),
        )
        .with_child(
            Element::new("a:graphic").with_child(
                Element::new("a:graphicData")
                    .with_attr("uri", TABLE_URI)
                    .with_child(tbl),
            ),
        )
}

/// Split `total` into `parts` lengths; the last one takes the remainder
fn split_evenly(total: i64, parts: usize) -> Vec<i64> {
    let each = total / parts as i64;
    let mut lengths = vec![each; parts];
    if let Some(last) = lengths.last_mut() {
        *last = total - each * (parts as i64 - 1);
    }
    lengths
}

/// Index just after the last child named by the first matching local name
fn insertion_index(parent: &Element, after: &[&str]) -> usize {
    for local in after {
        let last = parent
            .children
            .iter()
            .rposition(|node| matches!(node, Node::Element(el) if el.is(local)));
        if let Some(index) = last {
            return index + 1;
        }
    }
    parent.children.len()
}

fn empty_text_body() -> Element {
    Element::new("a:txBody")
        .with_child(Element::new("a:bodyPr"))
        .with_child(Element::new("a:lstStyle"))
        .with_child(Element::new("a:p"))
}

fn new_cell() -> Element {
    Element::new("a:tc")
        .with_child(empty_text_body())
        .with_child(Element::new("a:tcPr"))
}

fn new_row(height: i64, columns: usize) -> Element {
    (0..columns).fold(
        Element::new("a:tr").with_attr("h", height.to_string()),
        |row, _| row.with_child(new_cell()),
    )
}
