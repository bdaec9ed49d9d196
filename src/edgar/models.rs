// src/edgar/models.rs
#![allow(non_snake_case)]
use serde::{Deserialize, Serialize};

/// Structure representing the EDGAR company submission index
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
/// Only the fields this service reads are declared; serde ignores the rest.
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented list of recent filings, one vector per attribute.
#[derive(Debug, Default, Deserialize)]
pub struct FilingsList {
    pub accessionNumber: Vec<String>,
    pub filingDate: Vec<String>,
    pub form: Vec<String>,
    pub primaryDocument: Vec<String>,
}

/// A company resolved from a ticker or CIK query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyMatch {
    pub cik: String,
    pub name: String,
    pub ticker: Option<String>,
}

/// Metadata for one filing, as returned by the filing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: String,
    pub primary_doc: String,
}

impl FilingInfo {
    /// Constructs the URL to access the primary document of this filing
    pub fn primary_doc_url(&self) -> String {
        let acc_no_dashes = self.accession_number.replace('-', "");
        let cik = self.cik.trim_start_matches('0');
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            cik, acc_no_dashes, self.primary_doc
        )
    }

    /// Human-readable provenance, e.g. "10-K - 2023-11-03".
    pub fn source(&self) -> String {
        format!("{} - {}", self.form_type, self.filing_date)
    }
}

/// Full plain text of a filing plus its metadata. Never mutated once fetched.
#[derive(Debug, Clone)]
pub struct FilingText {
    pub info: FilingInfo,
    pub text: String,
}

impl FilingText {
    pub fn accession_number(&self) -> &str {
        &self.info.accession_number
    }

    pub fn form_type(&self) -> &str {
        &self.info.form_type
    }
}
