//! Presentation package (zip container).
//!
//! Every entry is held in memory in its original archive order so that an
//! untouched part round-trips byte-for-byte. Slides are located through the
//! presentation part's slide id list and its relationships.

use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::xml::{Element, XmlDocument};
use super::{DocumentError, DocumentResult};

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";
const MEDIA_PREFIX: &str = "ppt/media/";

/// A single archive entry
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// In-memory presentation package
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Load a package from the uploaded bytes
    pub fn from_bytes(bytes: &[u8]) -> DocumentResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let is_dir = entry.is_dir();
            let mut data = Vec::new();
            if !is_dir {
                entry.read_to_end(&mut data)?;
            }
            parts.push(Part { name, data, is_dir });
        }

        let package = Self { parts };
        if package.part(PRESENTATION_PART).is_none() {
            return Err(DocumentError::MissingPart(PRESENTATION_PART.to_string()));
        }
        Ok(package)
    }

    /// Raw bytes of a part, if present
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| !p.is_dir && p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Replace the bytes of an existing part
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) -> DocumentResult<()> {
        let part = self
            .parts
            .iter_mut()
            .find(|p| !p.is_dir && p.name == name)
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))?;
        part.data = data;
        Ok(())
    }

    /// Names of all entries, in archive order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Slide part names in presentation order.
    ///
    /// Uses `p:sldIdLst` and the presentation relationships; falls back to
    /// the numeric order of `ppt/slides/slideN.xml` when either is missing.
    pub fn slide_part_names(&self) -> DocumentResult<Vec<String>> {
        if let Some(ordered) = self.slides_from_relationships()? {
            return Ok(ordered);
        }

        let mut numbered: Vec<(u32, String)> = self
            .parts
            .iter()
            .filter_map(|p| {
                let index = p
                    .name
                    .strip_prefix(SLIDE_PREFIX)?
                    .strip_suffix(".xml")?
                    .parse::<u32>()
                    .ok()?;
                Some((index, p.name.clone()))
            })
            .collect();
        numbered.sort_by_key(|(index, _)| *index);
        Ok(numbered.into_iter().map(|(_, name)| name).collect())
    }

    fn slides_from_relationships(&self) -> DocumentResult<Option<Vec<String>>> {
        let (Some(presentation), Some(rels)) =
            (self.part(PRESENTATION_PART), self.part(PRESENTATION_RELS_PART))
        else {
            return Ok(None);
        };

        let presentation = XmlDocument::parse(presentation)?;
        let Some(id_list) = presentation.root.child("sldIdLst") else {
            return Ok(None);
        };

        let rels = XmlDocument::parse(rels)?;
        let mut slides = Vec::new();
        for slide_id in id_list.children_named("sldId") {
            let Some(rel_id) = relationship_id(slide_id) else {
                continue;
            };
            let target = rels
                .root
                .children_named("Relationship")
                .find(|rel| rel.attr("Id") == Some(rel_id))
                .and_then(|rel| rel.attr("Target"));
            if let Some(target) = target {
                let name = resolve_target("ppt", target);
                if self.part(&name).is_some() {
                    slides.push(name);
                }
            }
        }
        Ok(Some(slides))
    }

    /// Serialize the package back to zip bytes
    pub fn to_bytes(&self) -> DocumentResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

        for part in &self.parts {
            if part.is_dir {
                zip.add_directory(part.name.as_str(), deflated)?;
                continue;
            }
            let options = if part.name.starts_with(MEDIA_PREFIX) {
                stored
            } else {
                deflated
            };
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

/// The `r:id` attribute of a `p:sldId`, whatever prefix the relationships
/// namespace is bound to
fn relationship_id(slide_id: &Element) -> Option<&str> {
    slide_id
        .attributes
        .iter()
        .find(|(key, _)| key.ends_with(":id"))
        .map(|(_, value)| value.as_str())
}

/// Resolve a relationship target relative to the source part's directory
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
