//! Presentation template filling.
//!
//! This module provides:
//! - `{{name}}` placeholder substitution in text frames and table cells
//! - Table rebuilds from `{{TABLE:<key>}}` marker shapes (generic and
//!   financial specs)
//! - Non-destructive extension of the table tagged `quality`
//!
//! # Example
//!
//! ```ignore
//! let mapping = Mapping::from_json_slice(br#"{"client": "Acme"}"#)?;
//! let filled = fill_presentation(&template_bytes, &mapping, &FillOptions::default())?;
//! std::fs::write("filled.pptx", filled.bytes)?;
//! ```

mod filler;
mod mapping;
mod quality;
mod rebuild;
mod substitution;

pub use filler::{fill_presentation, FillOptions, FillReport, FilledPresentation};
pub use mapping::{
    render_scalar, CellText, FinancialRow, FinancialTable, GenericTable, Mapping, MappingError,
    TableKind, TableSpec,
};
pub use quality::{extend_table, extend_tagged_table, is_tagged_table, Extension};
pub use rebuild::{marker_key, rebuild_from_marker, MarkerOutcome};
pub use substitution::{substitute_string, Substitution};
