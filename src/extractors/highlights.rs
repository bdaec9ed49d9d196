// src/extractors/highlights.rs
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_HIGHLIGHTS: usize = 5;
/// Sentences past this index are never inspected.
pub const SENTENCE_SCAN_WINDOW: usize = 100;
const MIN_HIGHLIGHT_CHARS: usize = 50;

const PERFORMANCE_TERMS: &[&str] = &[
    "increased",
    "decreased",
    "grew",
    "declined",
    "improved",
    "deteriorated",
    "revenue",
    "profit",
    "margin",
    "growth",
    "performance",
];

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("Failed to compile SENTENCE_SPLIT_RE"));

fn is_highlight(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    PERFORMANCE_TERMS.iter().any(|term| lower.contains(term))
        && sentence.chars().count() > MIN_HIGHLIGHT_CHARS
}

/// Picks up to five performance-related sentences from MD&A text, in source order.
pub fn extract_highlights(mda_text: &str) -> Vec<String> {
    let mut highlights = Vec::with_capacity(MAX_HIGHLIGHTS);

    for sentence in SENTENCE_SPLIT_RE.split(mda_text).take(SENTENCE_SCAN_WINDOW) {
        if is_highlight(sentence) {
            highlights.push(sentence.trim().to_string());
            if highlights.len() >= MAX_HIGHLIGHTS {
                break;
            }
        }
    }

    tracing::debug!("Selected {} MD&A highlights", highlights.len());
    highlights
}
