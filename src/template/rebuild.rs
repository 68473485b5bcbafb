//! Table rebuild from `{{TABLE:<key>}}` marker shapes.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::shape;
use crate::document::table::build_table_frame;
use crate::document::text::frame_text;
use crate::document::Element;

use super::mapping::{Mapping, TableKind};

lazy_static! {
    /// A text frame consisting only of `{{TABLE:<key>}}`
    static ref MARKER_PATTERN: Regex =
        Regex::new(r"^\s*\{\{\s*TABLE:\s*([^{}]+?)\s*\}\}\s*$").unwrap();
}

/// What happened to a text shape checked for a table marker
#[derive(Debug)]
pub enum MarkerOutcome {
    /// The shape is ordinary text
    NotMarker,
    /// The shape is a marker but its key does not resolve to a usable spec
    Unresolved(String),
    /// Replacement table frame for the marker shape
    Rebuilt { key: String, kind: TableKind, frame: Element },
}

/// Key named by a marker text, if the whole text is a marker
pub fn marker_key(text: &str) -> Option<&str> {
    MARKER_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|key| key.as_str())
}

/// Check a text shape for a table marker and build its replacement.
///
/// The new frame takes the marker's position and size and the given shape
/// id. Missing keys, non-object values, malformed specs, zero-column specs,
/// markers without their own geometry and a missing id all come back as
/// `Unresolved`.
pub fn rebuild_from_marker(
    marker: &Element,
    mapping: &Mapping,
    id: Option<u32>,
    font_size: u32,
) -> MarkerOutcome {
    let Some(body) = shape::text_body(marker) else {
        return MarkerOutcome::NotMarker;
    };
    let text = frame_text(body);
    let Some(key) = marker_key(&text) else {
        return MarkerOutcome::NotMarker;
    };
    let key = key.to_string();

    let Some(spec) = mapping.table_spec(&key) else {
        return MarkerOutcome::Unresolved(key);
    };
    if spec.columns() == 0 {
        return MarkerOutcome::Unresolved(key);
    }
    let Some(geometry) = shape::geometry(marker) else {
        return MarkerOutcome::Unresolved(key);
    };
    let Some(id) = id else {
        return MarkerOutcome::Unresolved(key);
    };

    let frame = build_table_frame(id, geometry, &spec.grid(), spec.columns(), font_size);
    MarkerOutcome::Rebuilt {
        key,
        kind: spec.kind(),
        frame,
    }
}
