// src/extractors/mod.rs
pub mod classify;
pub mod diff;
pub mod highlights;
pub mod risk;
pub mod section;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use classify::{Category, RiskEntry, Severity};
pub use diff::{compare_sections, DiffResult};
pub use highlights::extract_highlights;
#[allow(unused_imports)]
pub use section::{extract_section, Section, SectionKind};
