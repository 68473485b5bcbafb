//! Text-frame access (`p:txBody` on shapes, `a:txBody` in table cells).
//!
//! Reading joins paragraphs with `\n` and renders `a:br` as a vertical tab,
//! so a token split across runs is still visible as one string. Writing
//! replaces every paragraph; each new paragraph borrows the paragraph and
//! run properties of the paragraph it replaces (or the last one), which keeps
//! the frame's look while dropping finer run-level formatting.

use super::xml::{Element, Node};

/// Line break inside a paragraph
pub const LINE_BREAK: char = '\u{b}';

/// Full text of a text frame
pub fn frame_text(body: &Element) -> String {
    body.children_named("p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn paragraph_text(paragraph: &Element) -> String {
    let mut text = String::new();
    for el in paragraph.elements() {
        match el.local_name() {
            "r" | "fld" => {
                if let Some(t) = el.child("t") {
                    text.push_str(&t.text());
                }
            }
            "br" => text.push(LINE_BREAK),
            _ => {}
        }
    }
    text
}

/// Formatting captured from an existing paragraph
#[derive(Debug, Clone, Default)]
struct ParagraphStyle {
    props: Option<Element>,
    run_props: Option<Element>,
    end_props: Option<Element>,
}

impl ParagraphStyle {
    fn of(paragraph: &Element) -> Self {
        let run_props = paragraph
            .elements()
            .filter(|el| el.is("r") || el.is("fld"))
            .find_map(|run| run.child("rPr").cloned());

        Self {
            props: paragraph.child("pPr").cloned(),
            run_props,
            end_props: paragraph.child("endParaRPr").cloned(),
        }
    }
}

/// Replace the whole text of a frame.
///
/// `\n` starts a new paragraph and [`LINE_BREAK`] becomes an `a:br`.
pub fn set_frame_text(body: &mut Element, text: &str) {
    let styles: Vec<ParagraphStyle> = body.children_named("p").map(ParagraphStyle::of).collect();
    let fallback_run = styles
        .iter()
        .find_map(|style| style.run_props.clone())
        .or_else(|| {
            styles
                .iter()
                .find_map(|style| style.end_props.as_ref())
                .map(|end| renamed(end, "a:rPr"))
        });

    body.remove_children_named("p");

    let default_style = ParagraphStyle::default();
    for (i, line) in text.split('\n').enumerate() {
        let style = styles.get(i).or(styles.last()).unwrap_or(&default_style);
        let run_props = style.run_props.as_ref().or(fallback_run.as_ref());
        body.children
            .push(Node::Element(build_paragraph(line, style, run_props)));
    }
}

fn build_paragraph(line: &str, style: &ParagraphStyle, run_props: Option<&Element>) -> Element {
    let mut paragraph = Element::new("a:p");
    if let Some(props) = &style.props {
        paragraph = paragraph.with_child(props.clone());
    }

    for (i, segment) in line.split(LINE_BREAK).enumerate() {
        if i > 0 {
            let mut br = Element::new("a:br");
            if let Some(props) = run_props {
                br = br.with_child(props.clone());
            }
            paragraph = paragraph.with_child(br);
        }
        if segment.is_empty() {
            continue;
        }
        let mut run = Element::new("a:r");
        if let Some(props) = run_props {
            run = run.with_child(props.clone());
        }
        run = run.with_child(Element::new("a:t").with_text(segment));
        paragraph = paragraph.with_child(run);
    }

    if let Some(end) = &style.end_props {
        paragraph = paragraph.with_child(end.clone());
    }
    paragraph
}

fn renamed(element: &Element, name: &str) -> Element {
    let mut copy = element.clone();
    copy.name = name.to_string();
    copy
}

/// Set the font size (hundredths of a point) on every run, break and
/// paragraph end mark of a frame
pub fn set_font_size(body: &mut Element, size: u32) {
    let size = size.to_string();
    for paragraph in body.children_named_mut("p") {
        let mut has_end_mark = false;
        for el in paragraph.elements_mut() {
            match el.local_name() {
                "r" | "br" | "fld" => run_props_mut(el).set_attr("sz", size.as_str()),
                "endParaRPr" => {
                    has_end_mark = true;
                    el.set_attr("sz", size.as_str());
                }
                _ => {}
            }
        }
        if !has_end_mark {
            paragraph
                .children
                .push(Node::Element(Element::new("a:endParaRPr").with_attr("sz", size.as_str())));
        }
    }
}

/// The run's `a:rPr`, inserted as the first child when absent
fn run_props_mut(run: &mut Element) -> &mut Element {
    let index = match run
        .children
        .iter()
        .position(|node| matches!(node, Node::Element(el) if el.is("rPr")))
    {
        Some(index) => index,
        None => {
            run.children.insert(0, Node::Element(Element::new("a:rPr")));
            0
        }
    };

    match &mut run.children[index] {
        Node::Element(props) => props,
        _ => unreachable!("position matched an element"),
    }
}
