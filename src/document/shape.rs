//! Shape classification and shape-level accessors.

use super::xml::Element;

/// EMUs per inch, the DrawingML length unit
pub const EMU_PER_INCH: i64 = 914_400;

/// What a child of a shape tree is, as far as filling is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// `p:sp` carrying a text frame
    Text,
    /// `p:grpSp` with its own child shapes
    Group,
    /// `p:graphicFrame` holding an `a:tbl`
    Table,
    /// Pictures, connectors, charts, non-visual properties
    Other,
}

/// Position and size of a shape in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

pub fn kind(shape: &Element) -> ShapeKind {
    match shape.local_name() {
        "sp" if shape.child("txBody").is_some() => ShapeKind::Text,
        "grpSp" => ShapeKind::Group,
        "graphicFrame" if table(shape).is_some() => ShapeKind::Table,
        _ => ShapeKind::Other,
    }
}

/// The `p:spTree` of a slide root
pub fn shape_tree(slide: &Element) -> Option<&Element> {
    slide.path(&["cSld", "spTree"])
}

pub fn shape_tree_mut(slide: &mut Element) -> Option<&mut Element> {
    slide.path_mut(&["cSld", "spTree"])
}

/// `cNvPr` of whichever non-visual properties block the shape carries
fn non_visual_props(shape: &Element) -> Option<&Element> {
    shape
        .elements()
        .find(|el| el.local_name().starts_with("nv"))
        .and_then(|nv| nv.child("cNvPr"))
}

pub fn name(shape: &Element) -> Option<&str> {
    non_visual_props(shape).and_then(|props| props.attr("name"))
}

pub fn id(shape: &Element) -> Option<u32> {
    non_visual_props(shape)
        .and_then(|props| props.attr("id"))
        .and_then(|id| id.parse().ok())
}

/// Highest `cNvPr` id anywhere under `root`
pub fn max_shape_id(root: &Element) -> u32 {
    let mut max = 0;
    root.visit(&mut |el: &Element| {
        if el.is("cNvPr") {
            if let Some(id) = el.attr("id").and_then(|id| id.parse::<u32>().ok()) {
                max = max.max(id);
            }
        }
    });
    max
}

fn transform(shape: &Element) -> Option<&Element> {
    match shape.local_name() {
        "graphicFrame" => shape.child("xfrm"),
        "grpSp" => shape.path(&["grpSpPr", "xfrm"]),
        _ => shape.path(&["spPr", "xfrm"]),
    }
}

/// Position and size declared on the shape itself.
///
/// Placeholders that inherit their frame from the layout have no `a:xfrm`
/// and yield `None`.
pub fn geometry(shape: &Element) -> Option<Geometry> {
    let xfrm = transform(shape)?;
    let off = xfrm.child("off")?;
    let ext = xfrm.child("ext")?;
    let coord = |el: &Element, key: &str| el.attr(key).and_then(|v| v.parse::<i64>().ok());

    Some(Geometry {
        left: coord(off, "x")?,
        top: coord(off, "y")?,
        width: coord(ext, "cx")?,
        height: coord(ext, "cy")?,
    })
}

pub fn text_body(shape: &Element) -> Option<&Element> {
    shape.child("txBody")
}

pub fn text_body_mut(shape: &mut Element) -> Option<&mut Element> {
    shape.child_mut("txBody")
}

/// The `a:tbl` of a graphic frame
pub fn table(shape: &Element) -> Option<&Element> {
    shape.path(&["graphic", "graphicData", "tbl"])
}

pub fn table_mut(shape: &mut Element) -> Option<&mut Element> {
    shape.path_mut(&["graphic", "graphicData", "tbl"])
}
