// src/edgar/mod.rs
//! Filing store: where company metadata and filing text come from.
//!
//! The text-analysis extractors never talk to a store directly; reports resolve
//! a filing through a [`FilingStore`] and hand plain text to the extractors.

pub mod client;
pub mod memory;
pub mod models;

use crate::utils::error::EdgarError;
use models::{CompanyMatch, FilingInfo, FilingText};

pub use client::EdgarClient;
pub use memory::MemoryFilingStore;

pub trait FilingStore {
    /// Resolves a ticker or CIK to a company.
    async fn resolve_company(&self, query: &str) -> Result<CompanyMatch, EdgarError>;

    /// Lists filings for a company, most recent first, optionally restricted to one form type.
    async fn list_filings(
        &self,
        cik: &str,
        form_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<FilingInfo>, EdgarError>;

    async fn get_filing(&self, cik: &str, accession_number: &str)
        -> Result<FilingInfo, EdgarError>;

    /// Fetches the plain text of the filing's primary document.
    async fn fetch_text(&self, filing: &FilingInfo) -> Result<FilingText, EdgarError>;

    /// Picks the requested filing, or the latest filing of `form_type` when no
    /// accession number is given.
    async fn resolve_filing(
        &self,
        cik: &str,
        accession_number: Option<&str>,
        form_type: &str,
    ) -> Result<FilingInfo, EdgarError> {
        if let Some(accession) = accession_number {
            return self.get_filing(cik, accession).await;
        }
        self.list_filings(cik, Some(form_type), 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EdgarError::NoFilings {
                cik: cik.to_string(),
                form_type: form_type.to_string(),
            })
    }
}

/// Pads a numeric CIK to the 10-digit form EDGAR uses. Returns None for non-numeric input.
pub fn normalize_cik(cik: &str) -> Option<String> {
    let cik = cik.trim();
    if cik.is_empty() || !cik.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u64 = cik.parse().ok()?;
    Some(format!("{:010}", number))
}
