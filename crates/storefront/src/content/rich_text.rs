//! Rich text blocks: plain-text extraction and HTML rendering.
//!
//! Span formatting (bold, links) is ignored; block text is always escaped.

use std::fmt::Write as _;

use serde::Deserialize;

/// A block of structured text as delivered by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichTextBlock {
    /// Block type (`paragraph`, `heading2`, `list-item`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl RichTextBlock {
    #[must_use]
    pub fn new(kind: &str, text: &str) -> Self {
        Self {
            kind: kind.to_string(),
            text: text.to_string(),
        }
    }

    #[must_use]
    pub fn paragraph(text: &str) -> Self {
        Self::new("paragraph", text)
    }
}

/// Text of all blocks, separated by spaces.
#[must_use]
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render blocks to HTML.
///
/// Consecutive list items are grouped into a single `<ul>` or `<ol>`.
/// Unknown block types render as paragraphs.
#[must_use]
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list {
            if let Some(tag) = open_list {
                let _ = write!(html, "</{tag}>");
            }
            if let Some(tag) = list {
                let _ = write!(html, "<{tag}>");
            }
            open_list = list;
        }

        let text = escape_html(&block.text);
        let tag = match block.kind.as_str() {
            "heading1" => "h1",
            "heading2" => "h2",
            "heading3" => "h3",
            "heading4" => "h4",
            "heading5" => "h5",
            "heading6" => "h6",
            "preformatted" => "pre",
            "list-item" | "o-list-item" => "li",
            _ => "p",
        };
        let _ = write!(html, "<{tag}>{text}</{tag}>");
    }

    if let Some(tag) = open_list {
        let _ = write!(html, "</{tag}>");
    }

    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '\n' => escaped.push_str("<br />"),
            _ => escaped.push(c),
        }
    }
    escaped
}
