// src/utils/text.rs
use scraper::{ElementRef, Html};

// Elements that start a new line when flattened. Keeping line structure matters:
// risk segmentation anchors bullets, numbered items and headings at line starts.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4",
    "h5", "h6", "hr", "li", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "title"];

/// Returns true when the document looks like HTML/XHTML rather than plain text.
pub fn looks_like_html(content: &str) -> bool {
    content.trim_start().starts_with('<')
}

/// Flattens an HTML filing document into plain text.
/// Block elements become line breaks, script/style content is dropped and
/// non-breaking spaces are normalized. Blank-line runs collapse to one.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    flatten_element(document.root_element(), &mut raw);
    normalize_lines(&raw.replace('\u{a0}', " "))
}

// Block elements are fenced by line breaks on both sides, so trailing text
// after a closed block starts its own line.
fn flatten_element(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }
    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        line_break(out);
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            flatten_element(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
    if block {
        line_break(out);
    }
}

fn line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Converts a downloaded primary document into filing text, flattening HTML when needed.
pub fn document_to_text(content: &str) -> String {
    if looks_like_html(content) {
        html_to_text(content)
    } else {
        normalize_lines(content)
    }
}

fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = true;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !previous_blank {
                out.push('\n');
            }
            previous_blank = true;
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = false;
    }
    out.trim_end().to_string()
}

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
