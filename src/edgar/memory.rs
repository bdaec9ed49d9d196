// src/edgar/memory.rs
use std::path::Path;

use crate::edgar::models::{CompanyMatch, FilingInfo, FilingText};
use crate::edgar::FilingStore;
use crate::utils::error::EdgarError;
use crate::utils::text::document_to_text;

/// CIK assigned to filings loaded from local files.
pub const LOCAL_CIK: &str = "local";

/// Filing store over filings already held in memory (local files, fixtures).
#[derive(Debug, Clone, Default)]
pub struct MemoryFilingStore {
    filings: Vec<FilingText>,
}

impl MemoryFilingStore {
    pub fn new(filings: Vec<FilingText>) -> Self {
        Self { filings }
    }

    /// Loads filing documents (HTML or plain text) from disk. Each file becomes one
    /// filing under [`LOCAL_CIK`], keyed by its file stem and dated by its mtime.
    pub fn from_files<P: AsRef<Path>>(paths: &[P], form_type: &str) -> std::io::Result<Self> {
        let mut filings = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)?;
            let modified: chrono::DateTime<chrono::Utc> = std::fs::metadata(path)?.modified()?.into();
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            tracing::info!("Loaded local filing {} ({} bytes)", path.display(), content.len());
            filings.push(FilingText {
                info: FilingInfo {
                    accession_number: stem.clone(),
                    filing_date: modified.format("%Y-%m-%d").to_string(),
                    form_type: form_type.to_string(),
                    ticker: String::new(),
                    company_name: stem,
                    cik: LOCAL_CIK.to_string(),
                    primary_doc: path.display().to_string(),
                },
                text: document_to_text(&content),
            });
        }
        Ok(Self::new(filings))
    }

    pub fn filings(&self) -> &[FilingText] {
        &self.filings
    }

    fn infos_for<'a>(&'a self, cik: &'a str) -> impl Iterator<Item = &'a FilingInfo> + 'a {
        self.filings
            .iter()
            .map(|f| &f.info)
            .filter(move |info| info.cik == cik || info.ticker.eq_ignore_ascii_case(cik))
    }
}

impl FilingStore for MemoryFilingStore {
    async fn resolve_company(&self, query: &str) -> Result<CompanyMatch, EdgarError> {
        self.infos_for(query)
            .next()
            .map(|info| CompanyMatch {
                cik: info.cik.clone(),
                name: info.company_name.clone(),
                ticker: Some(info.ticker.clone()).filter(|t| !t.is_empty()),
            })
            .ok_or_else(|| EdgarError::CompanyNotFound(query.to_string()))
    }

    async fn list_filings(
        &self,
        cik: &str,
        form_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<FilingInfo>, EdgarError> {
        let mut filings: Vec<FilingInfo> = self
            .infos_for(cik)
            .filter(|info| form_type.map_or(true, |form| info.form_type.eq_ignore_ascii_case(form)))
            .cloned()
            .collect();
        // Most recent first; stable so same-day filings keep insertion order
        filings.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
        filings.truncate(limit);
        Ok(filings)
    }

    async fn get_filing(&self, cik: &str, accession_number: &str) -> Result<FilingInfo, EdgarError> {
        self.infos_for(cik)
            .find(|info| info.accession_number == accession_number)
            .cloned()
            .ok_or_else(|| EdgarError::FilingNotFound(accession_number.to_string()))
    }

    async fn fetch_text(&self, filing: &FilingInfo) -> Result<FilingText, EdgarError> {
        self.filings
            .iter()
            .find(|f| f.info.cik == filing.cik && f.info.accession_number == filing.accession_number)
            .cloned()
            .ok_or_else(|| EdgarError::FilingNotFound(filing.accession_number.clone()))
    }
}
