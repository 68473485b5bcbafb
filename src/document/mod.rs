//! Presentation document model.
//!
//! This module provides the pieces the filler mutates:
//! - `package`: the zip container, part lookup and slide ordering
//! - `xml`: an owned element tree parsed and written with quick-xml
//! - `shape`: shape classification, names, ids and geometry
//! - `text`: text-frame reading and wholesale rewriting
//! - `table`: DrawingML table accessors and table construction

pub mod package;
pub mod shape;
pub mod table;
pub mod text;
pub mod xml;

pub use package::Package;
pub use shape::{Geometry, ShapeKind};
pub use xml::{Element, Node, XmlDocument};

use thiserror::Error;

/// Errors raised while reading or writing a presentation package
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid presentation archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Part is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing package part: {0}")]
    MissingPart(String),

    #[error("Malformed part {part}: {reason}")]
    Malformed { part: String, reason: String },

    #[error("Text contains a character not allowed in XML: U+{0:04X}")]
    InvalidXmlChar(u32),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;
