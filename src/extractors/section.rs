// src/extractors/section.rs

// --- Imports ---
use regex::{Regex, RegexBuilder};
use serde::Serialize;

// --- Section Catalogue ---
/// The 10-K sections this service knows how to carve out of full filing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Business,
    RiskFactors,
    Mda,
}

impl SectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Business => "Business",
            SectionKind::RiskFactors => "Risk Factors",
            SectionKind::Mda => "Management Discussion & Analysis",
        }
    }

    /// (start marker, end marker) pair delimiting the section.
    pub fn markers(&self) -> (&'static str, &'static str) {
        match self {
            SectionKind::Business => ("item 1", "item 1a"),
            SectionKind::RiskFactors => ("item 1a", "item 1b"),
            SectionKind::Mda => ("item 7", "item 7a"),
        }
    }
}

// --- Data Structures ---
/// A named span of filing text. Empty text means the section was not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub text: String,
}

impl Section {
    pub fn from_filing(kind: SectionKind, filing_text: &str) -> Self {
        let (start_marker, end_marker) = kind.markers();
        let text = extract_section(filing_text, start_marker, end_marker);
        tracing::debug!("Extracted section '{}' ({} bytes)", kind.name(), text.len());
        Section {
            name: kind.name().to_string(),
            text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// --- Marker Matching ---
/// Builds the case-insensitive marker pattern. The marker is matched literally and
/// swallows any trailing run of periods, whitespace and hyphens ("Item 1." / "Item 1 -").
fn marker_pattern(marker: &str) -> Option<Regex> {
    let pattern = format!(r"{}[.\s\-]*", regex::escape(marker));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Could not compile section marker '{}': {}", marker, e);
            None
        }
    }
}

/// Returns the trimmed text between the first start-marker match and the first
/// end-marker match after it (or end of text). Missing start marker yields "".
pub fn extract_section(text: &str, start_marker: &str, end_marker: &str) -> String {
    let Some(start_re) = marker_pattern(start_marker) else {
        return String::new();
    };
    let Some(start_match) = start_re.find(text) else {
        tracing::trace!("Start marker '{}' not found", start_marker);
        return String::new();
    };

    let start_idx = start_match.end();
    // End search is restricted to positions after the start boundary, so an end
    // marker appearing earlier in the document is ignored.
    let end_idx = marker_pattern(end_marker)
        .and_then(|end_re| end_re.find_at(text, start_idx))
        .map(|m| m.start())
        .unwrap_or(text.len());

    text[start_idx..end_idx].trim().to_string()
}
