//! Template filler.
//!
//! Walks every slide's shape tree once: text shapes get token substitution
//! or, when they hold a table marker, are swapped for a rebuilt table;
//! existing tables get per-cell substitution; groups are recursed into.
//! The tagged quality table is extended afterwards. Slides that nothing
//! touched keep their original bytes.

use serde::Serialize;

use crate::config::FillConfig;
use crate::document::shape::{self, ShapeKind, EMU_PER_INCH};
use crate::document::table;
use crate::document::text::{frame_text, set_frame_text};
use crate::document::{DocumentError, DocumentResult, Element, Package, XmlDocument};

use super::mapping::{GenericTable, Mapping, TableKind};
use super::quality::{self, Extension};
use super::rebuild::{rebuild_from_marker, MarkerOutcome};
use super::substitution::substitute_string;

/// Knobs for a fill run
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Font size for rebuilt tables, in hundredths of a point
    pub table_font_size: u32,
    /// Shape name of the table extended in place, also its mapping key
    pub quality_table: String,
    /// Width of columns added to the quality table, in EMU
    pub added_column_width: i64,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            table_font_size: 1200,
            quality_table: "quality".to_string(),
            added_column_width: EMU_PER_INCH * 3 / 2,
        }
    }
}

impl From<&FillConfig> for FillOptions {
    fn from(config: &FillConfig) -> Self {
        Self {
            table_font_size: config.table_font_size_pt * 100,
            quality_table: config.quality_table.clone(),
            added_column_width: config.added_column_width_emu,
        }
    }
}

/// What a fill run changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub slides: usize,
    pub slides_modified: usize,
    pub tokens_replaced: usize,
    pub text_shapes_rewritten: usize,
    pub cells_rewritten: usize,
    pub generic_tables_rebuilt: usize,
    pub financial_tables_rebuilt: usize,
    pub markers_unresolved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_table: Option<Extension>,
}

impl FillReport {
    fn record_rebuild(&mut self, kind: TableKind) {
        match kind {
            TableKind::Generic => self.generic_tables_rebuilt += 1,
            TableKind::Financial => self.financial_tables_rebuilt += 1,
        }
    }

    pub fn tables_rebuilt(&self) -> usize {
        self.generic_tables_rebuilt + self.financial_tables_rebuilt
    }
}

/// Output of a fill run
#[derive(Debug)]
pub struct FilledPresentation {
    pub bytes: Vec<u8>,
    pub report: FillReport,
}

struct Slide {
    name: String,
    document: XmlDocument,
    modified: bool,
}

/// Fill a presentation template with a mapping.
///
/// Errors only come from reading or writing the package; unresolved
/// tokens, unresolved markers and malformed table specs are left as they
/// are.
pub fn fill_presentation(
    template: &[u8],
    mapping: &Mapping,
    options: &FillOptions,
) -> DocumentResult<FilledPresentation> {
    let mut package = Package::from_bytes(template)?;
    let mut report = FillReport::default();
    let mut slides = Vec::new();

    for name in package.slide_part_names()? {
        let bytes = package
            .part(&name)
            .ok_or_else(|| DocumentError::MissingPart(name.clone()))?;
        let mut document = XmlDocument::parse(bytes)?;

        let mut filler = ShapeFiller {
            mapping,
            options,
            next_id: shape::max_shape_id(&document.root).checked_add(1),
            report: &mut report,
        };
        let modified = match shape::shape_tree_mut(&mut document.root) {
            Some(tree) => filler.fill_shapes(tree),
            None => false,
        };

        tracing::debug!(slide = %name, modified, "Slide processed");
        slides.push(Slide {
            name,
            document,
            modified,
        });
    }
    report.slides = slides.len();

    if let Some(data) = quality_data(mapping, &options.quality_table) {
        report.quality_table = extend_quality_table(&mut slides, &data, options);
    }

    for slide in slides.iter().filter(|slide| slide.modified) {
        package.set_part(&slide.name, slide.document.to_bytes()?)?;
        report.slides_modified += 1;
    }

    let bytes = if report.slides_modified == 0 {
        template.to_vec()
    } else {
        package.to_bytes()?
    };

    Ok(FilledPresentation { bytes, report })
}

/// Quality table data: a non-empty object with `headers`/`rows`
fn quality_data(mapping: &Mapping, key: &str) -> Option<GenericTable> {
    let value = mapping.get(key)?;
    if value.as_object().map_or(true, |object| object.is_empty()) {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Ignoring malformed quality table data");
            None
        }
    }
}

fn extend_quality_table(
    slides: &mut [Slide],
    data: &GenericTable,
    options: &FillOptions,
) -> Option<Extension> {
    for slide in slides.iter_mut() {
        let Some(tree) = shape::shape_tree_mut(&mut slide.document.root) else {
            continue;
        };
        let extension = quality::extend_tagged_table(
            tree,
            &options.quality_table,
            data,
            options.added_column_width,
        );
        if let Some(extension) = extension {
            tracing::debug!(
                slide = %slide.name,
                rows_added = extension.rows_added,
                columns_added = extension.columns_added,
                "Quality table extended"
            );
            slide.modified = true;
            return Some(extension);
        }
    }
    None
}

/// Per-slide traversal state
struct ShapeFiller<'a> {
    mapping: &'a Mapping,
    options: &'a FillOptions,
    /// `None` once shape ids are exhausted
    next_id: Option<u32>,
    report: &'a mut FillReport,
}

impl ShapeFiller<'_> {
    /// Fill every shape in a shape tree or group; `true` if anything changed
    fn fill_shapes(&mut self, container: &mut Element) -> bool {
        let mut modified = false;
        for shape in container.elements_mut() {
            modified |= match shape::kind(shape) {
                ShapeKind::Group => self.fill_shapes(shape),
                ShapeKind::Table => self.fill_table_cells(shape),
                ShapeKind::Text => self.fill_text_shape(shape),
                ShapeKind::Other => false,
            };
        }
        modified
    }

    fn fill_text_shape(&mut self, shape: &mut Element) -> bool {
        let outcome = rebuild_from_marker(
            shape,
            self.mapping,
            self.next_id,
            self.options.table_font_size,
        );

        match outcome {
            MarkerOutcome::Rebuilt { key, kind, frame } => {
                tracing::debug!(key = %key, kind = kind.as_str(), "Table rebuilt from marker");
                *shape = frame;
                self.next_id = self.next_id.and_then(|id| id.checked_add(1));
                self.report.record_rebuild(kind);
                true
            }
            MarkerOutcome::Unresolved(key) => {
                tracing::debug!(key = %key, "Table marker left unresolved");
                self.report.markers_unresolved += 1;
                false
            }
            MarkerOutcome::NotMarker => {
                let Some(body) = shape::text_body_mut(shape) else {
                    return false;
                };
                if self.substitute_frame(body) {
                    self.report.text_shapes_rewritten += 1;
                    return true;
                }
                false
            }
        }
    }

    fn fill_table_cells(&mut self, frame: &mut Element) -> bool {
        let Some(tbl) = shape::table_mut(frame) else {
            return false;
        };

        let mut modified = false;
        for tc in table::cells_mut(tbl) {
            let Some(body) = tc.child_mut("txBody") else {
                continue;
            };
            if self.substitute_frame(body) {
                self.report.cells_rewritten += 1;
                modified = true;
            }
        }
        modified
    }

    /// Substitute a text frame's joined text, rewriting it only on change
    fn substitute_frame(&mut self, body: &mut Element) -> bool {
        let text = frame_text(body);
        let result = substitute_string(&text, self.mapping);
        if !result.changed() {
            return false;
        }
        set_frame_text(body, &result.text);
        self.report.tokens_replaced += result.replaced;
        true
    }
}
