// src/extractors/risk.rs
//! Segmentation of a risk-factors section into candidate risk statements.
//!
//! Three independent heuristics run over the same text and their survivors are
//! concatenated in heuristic order. They may overlap; nothing is deduplicated.

use once_cell::sync::Lazy;
use regex::Regex;

/// Only the first N matches of each heuristic are considered.
pub const MAX_MATCHES_PER_PATTERN: usize = 20;

/// Candidates must be strictly longer than this (in characters) to survive.
pub const MIN_STATEMENT_CHARS: usize = 50;

// --- Regex Patterns (Lazy Static) ---
// Lines starting with a bullet glyph, dash or asterisk.
static BULLET_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*[•·\-*]\s*([^\n]+)").expect("Failed to compile BULLET_LINE_RE")
});

// Lines of the form "12. text".
static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s*([^\n]+)").expect("Failed to compile NUMBERED_LINE_RE")
});

// Capitalized sentences mentioning risk vocabulary (case-sensitive), up to the first terminator.
static RISK_SENTENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*([A-Z][^.!?]*(?:Risk|Uncertain|Threat|Challenge)[^.!?]*[.!?])")
        .expect("Failed to compile RISK_SENTENCE_RE")
});

fn collect_candidates(re: &Regex, risk_text: &str) -> Vec<String> {
    re.captures_iter(risk_text)
        .take(MAX_MATCHES_PER_PATTERN)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|candidate| candidate.chars().count() > MIN_STATEMENT_CHARS)
        .map(|candidate| candidate.trim().to_string())
        .collect()
}

/// Bullet-prefixed lines (`•`, `·`, `-`, `*`).
pub fn bullet_candidates(risk_text: &str) -> Vec<String> {
    collect_candidates(&BULLET_LINE_RE, risk_text)
}

/// Numbered-list lines (`<n>. text`).
pub fn numbered_candidates(risk_text: &str) -> Vec<String> {
    collect_candidates(&NUMBERED_LINE_RE, risk_text)
}

/// Line-leading sentences containing "Risk", "Uncertain", "Threat" or "Challenge".
pub fn sentence_candidates(risk_text: &str) -> Vec<String> {
    collect_candidates(&RISK_SENTENCE_RE, risk_text)
}

/// Splits risk-factors text into candidate statements: bullets, then numbered
/// items, then risk sentences.
pub fn segment(risk_text: &str) -> Vec<String> {
    let bullets = bullet_candidates(risk_text);
    let numbered = numbered_candidates(risk_text);
    let sentences = sentence_candidates(risk_text);
    tracing::debug!(
        "Risk segmentation: {} bullet, {} numbered, {} sentence candidates",
        bullets.len(),
        numbered.len(),
        sentences.len()
    );

    let mut candidates = bullets;
    candidates.extend(numbered);
    candidates.extend(sentences);
    candidates
}
