// src/utils/html.rs

//! Visible-text rendering for parsed HTML.
//!
//! Approximates what a browser shows for an element: block-level children
//! start new lines, table cells are tab separated, whitespace inside a line
//! is collapsed, and script/style content is never rendered.

use scraper::{ElementRef, Html, Node, Selector};

use super::text::normalize_whitespace;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "tfoot", "thead",
    "tr", "ul",
];

const HIDDEN_TAGS: &[&str] = &["head", "noscript", "script", "style", "template"];

/// Render the visible text of an element, one rendered line per `\n`.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut buf = String::new();
    render(element, &mut buf);

    buf.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(element: ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(&text.replace(['\n', '\r'], " ")),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_TAGS.contains(&name) {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };

                let block = BLOCK_TAGS.contains(&name);
                if block {
                    buf.push('\n');
                }
                render(child_ref, buf);
                if block {
                    buf.push('\n');
                } else if name == "td" || name == "th" {
                    buf.push('\t');
                }
            }
            _ => {}
        }
    }
}

/// Visible text of the whole document body (falls back to the root element).
pub fn body_text(document: &Html) -> String {
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next());

    match body {
        Some(body) => inner_text(body),
        None => inner_text(document.root_element()),
    }
}

/// Trimmed `<title>` text of the document, if any.
pub fn document_title(document: &Html) -> Option<String> {
    let sel = Selector::parse("title").ok()?;
    let title = document.select(&sel).next()?;
    let text = normalize_whitespace(&title.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}
