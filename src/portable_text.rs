//! Portable Text (the CMS's rich-text JSON) to plain text and HTML.
//!
//! Only text blocks are rendered. Custom block types (embedded images,
//! code blocks, ...) deserialize fine but are skipped by both renderers.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// One block of Portable Text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Span>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mark_defs: Vec<MarkDef>,
}

/// An inline run of text with decorator / annotation marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
}

/// Annotation definition referenced by a span mark (links).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Block {
    fn is_text(&self) -> bool {
        self.kind == "block"
    }

    fn plain_text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }

    fn link_for(&self, mark: &str) -> Option<&str> {
        self.mark_defs
            .iter()
            .find(|d| d.key == mark && d.kind == "link")
            .and_then(|d| d.href.as_deref())
    }
}

/// Flatten blocks to plain text: spans concatenated per block, blocks
/// separated by a blank line.
pub fn to_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|b| b.is_text())
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render blocks to HTML. Consecutive list items of the same kind share one
/// `<ul>`/`<ol>`.
pub fn to_html(blocks: &[Block]) -> Markup {
    let text_blocks: Vec<&Block> = blocks.iter().filter(|b| b.is_text()).collect();
    let mut groups: Vec<(Option<&str>, Vec<&Block>)> = Vec::new();
    for block in text_blocks {
        let list = block.list_item.as_deref();
        let continues_list =
            list.is_some() && groups.last().is_some_and(|(kind, _)| *kind == list);
        match groups.last_mut() {
            Some((_, items)) if continues_list => items.push(block),
            _ => groups.push((list, vec![block])),
        }
    }

    html! {
        @for (list, items) in &groups {
            @match *list {
                Some("number") => {
                    ol { @for b in items { li { (render_spans(b)) } } }
                },
                Some(_) => {
                    ul { @for b in items { li { (render_spans(b)) } } }
                },
                None => {
                    @for b in items { (render_block(b)) }
                },
            }
        }
    }
}

fn render_block(block: &Block) -> Markup {
    let inner = render_spans(block);
    match block.style.as_deref().unwrap_or("normal") {
        "h1" => html! { h1 { (inner) } },
        "h2" => html! { h2 { (inner) } },
        "h3" => html! { h3 { (inner) } },
        "h4" => html! { h4 { (inner) } },
        "blockquote" => html! { blockquote { (inner) } },
        _ => html! { p { (inner) } },
    }
}

fn render_spans(block: &Block) -> Markup {
    html! {
        @for span in &block.children {
            (render_span(block, span))
        }
    }
}

/// Wrap the span text in one element per mark, innermost first.
fn render_span(block: &Block, span: &Span) -> Markup {
    let mut out = html! { (span.text) };
    for mark in span.marks.iter().rev() {
        out = match mark.as_str() {
            "strong" => html! { strong { (out) } },
            "em" => html! { em { (out) } },
            "code" => html! { code { (out) } },
            "underline" => html! { u { (out) } },
            "strike-through" => html! { s { (out) } },
            other => match block.link_for(other) {
                Some(href) => html! { a href=(href) { (out) } },
                None => out,
            },
        };
    }
    out
}
