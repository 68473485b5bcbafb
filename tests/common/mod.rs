//! In-memory presentation fixtures shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use deck_filler::document::shape::{self, ShapeKind};
use deck_filler::document::table;
use deck_filler::document::text::frame_text;
use deck_filler::document::{Element, Package, XmlDocument};

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

pub const MEDIA_PART: &str = "ppt/media/image1.png";
pub const MEDIA_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really an image";

/// Builds a minimal but well-formed `.pptx` package
#[derive(Debug, Default)]
pub struct DeckBuilder {
    slides: Vec<String>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide holding the given shape XML, in order
    pub fn slide(mut self, shapes: &[String]) -> Self {
        self.slides.push(shapes.concat());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

        let mut add = |name: &str, body: &[u8], options: FileOptions| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body).unwrap();
        };

        add("[Content_Types].xml", self.content_types().as_bytes(), deflated);
        add("ppt/presentation.xml", self.presentation().as_bytes(), deflated);
        add(
            "ppt/_rels/presentation.xml.rels",
            self.presentation_rels().as_bytes(),
            deflated,
        );
        for (i, shapes) in self.slides.iter().enumerate() {
            let name = format!("ppt/slides/slide{}.xml", i + 1);
            add(&name, slide_xml(shapes).as_bytes(), deflated);
        }
        add(MEDIA_PART, MEDIA_BYTES, stored);

        zip.finish().unwrap().into_inner()
    }

    fn content_types(&self) -> String {
        let overrides: String = (1..=self.slides.len())
            .map(|i| {
                format!(
                    r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{overrides}</Types>"#
        )
    }

    fn presentation(&self) -> String {
        let ids: String = (1..=self.slides.len())
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 1))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS}><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#
        )
    }

    fn presentation_rels(&self) -> String {
        let rels: String = (1..=self.slides.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{i}.xml"/>"#,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        )
    }
}

fn slide_xml(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn runs_xml(runs: &[&str]) -> String {
    runs.iter()
        .map(|run| {
            format!(
                r#"<a:r><a:rPr lang="en-US" sz="1800" b="1"/><a:t>{}</a:t></a:r>"#,
                escape(run)
            )
        })
        .collect()
}

/// Text box at (x, y) with size (cx, cy); `\n` in `text` starts a paragraph
pub fn text_shape_at(id: u32, name: &str, text: &str, geometry: (i64, i64, i64, i64)) -> String {
    let (x, y, cx, cy) = geometry;
    let paragraphs: String = text
        .split('\n')
        .map(|line| format!("<a:p>{}</a:p>", runs_xml(&[line])))
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

pub fn text_shape(id: u32, name: &str, text: &str) -> String {
    text_shape_at(id, name, text, (914_400, 914_400, 4_572_000, 914_400))
}

/// Single-paragraph text box whose text is split over several runs
pub fn text_shape_runs(id: u32, name: &str, runs: &[&str]) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="457200"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:p>{}</a:p></p:txBody></p:sp>"#,
        runs_xml(runs)
    )
}

pub fn group_shape(id: u32, children: &[String]) -> String {
    format!(
        r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="{id}" name="Group {id}"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/><a:chOff x="0" y="0"/><a:chExt cx="914400" cy="914400"/></a:xfrm></p:grpSpPr>{}</p:grpSp>"#,
        children.concat()
    )
}

/// Table frame with every column 914400 wide and every row 370840 high
pub fn table_shape(id: u32, name: &str, rows: &[&[&str]]) -> String {
    let cols = rows.first().map_or(0, |row| row.len());
    let grid: String = (0..cols).map(|_| r#"<a:gridCol w="914400"/>"#).collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|text| {
                    format!(
                        r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></a:txBody><a:tcPr/></a:tc>"#,
                        runs_xml(&[text])
                    )
                })
                .collect();
            format!(r#"<a:tr h="370840">{cells}</a:tr>"#)
        })
        .collect();
    let cx = 914_400 * cols as i64;
    let cy = 370_840 * rows.len() as i64;
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="{name}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="457200" y="1828800"/><a:ext cx="{cx}" cy="{cy}"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
    )
}

/// Parsed slides of a package, in presentation order
pub fn slides(bytes: &[u8]) -> Vec<Element> {
    let package = Package::from_bytes(bytes).unwrap();
    package
        .slide_part_names()
        .unwrap()
        .iter()
        .map(|name| XmlDocument::parse(package.part(name).unwrap()).unwrap().root)
        .collect()
}

/// Top-level shapes of a slide (the tree's own properties excluded)
pub fn shapes(slide: &Element) -> Vec<&Element> {
    shape::shape_tree(slide)
        .unwrap()
        .elements()
        .filter(|el| !el.local_name().starts_with("nv") && !el.is("grpSpPr"))
        .collect()
}

/// Text of every text shape on a slide, groups included, in document order
pub fn texts(slide: &Element) -> Vec<String> {
    let mut texts = Vec::new();
    slide.visit(&mut |el: &Element| {
        if shape::kind(el) == ShapeKind::Text {
            if let Some(body) = shape::text_body(el) {
                texts.push(frame_text(body));
            }
        }
    });
    texts
}

/// Cell texts of a table frame, row by row
pub fn table_texts(frame: &Element) -> Vec<Vec<String>> {
    let tbl = shape::table(frame).unwrap();
    (0..table::row_count(tbl))
        .map(|r| {
            (0..table::column_count(tbl))
                .map(|c| table::cell_text(tbl, r, c).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// First table frame on a slide whose shape name matches
pub fn table_named<'a>(slide: &'a Element, name: &str) -> Option<&'a Element> {
    shapes(slide)
        .into_iter()
        .find(|el| shape::kind(el) == ShapeKind::Table && shape::name(el) == Some(name))
}
