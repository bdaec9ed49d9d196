// src/reports/mod.rs
//! Report builders: glue between the filing store and the text extractors.
//!
//! Each report has a pure builder over a [`FilingText`] and an async wrapper that
//! resolves the filing through a [`FilingStore`] first.

use serde::Serialize;

use crate::edgar::models::{CompanyMatch, FilingInfo, FilingText};
use crate::edgar::FilingStore;
use crate::extractors::{
    compare_sections, extract_highlights, risk, DiffResult, RiskEntry, Section, SectionKind,
};
use crate::utils::error::EdgarError;
use crate::utils::text::truncate_chars;

pub const DEFAULT_FORM_TYPE: &str = "10-K";
const MAX_DESCRIPTION_CHARS: usize = 5_000;
const MAX_MDA_CHARS: usize = 10_000;
/// Lookups are exact ticker or CIK matches.
const EXACT_MATCH_CONFIDENCE: f64 = 1.0;
/// The classified risk list is cut to this many entries.
pub const MAX_RISK_ENTRIES: usize = 20;

/// Which filing to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRequest {
    /// CIK or ticker
    pub cik: String,
    pub accession_number: Option<String>,
    pub form_type: String,
}

impl ExtractionRequest {
    pub fn latest(cik: impl Into<String>) -> Self {
        Self {
            cik: cik.into(),
            accession_number: None,
            form_type: DEFAULT_FORM_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessDescriptionReport {
    pub cik: String,
    pub company_name: String,
    pub description: String,
    pub source: String,
    pub accession_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskFactorsReport {
    pub cik: String,
    pub company_name: String,
    pub risk_factors: Vec<RiskEntry>,
    pub source: String,
    pub accession_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MdaReport {
    pub cik: String,
    pub company_name: String,
    pub mda: String,
    pub highlights: Vec<String>,
    pub source: String,
    pub accession_number: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectionChanges {
    pub business_changes: DiffResult,
    pub risk_changes: DiffResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilingComparisonReport {
    pub cik: String,
    pub company_name: String,
    pub changes: SectionChanges,
    pub filing1: String,
    pub filing2: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FilingSearchRequest {
    pub company: String,
    pub form_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Case-insensitive phrase the filing text must contain
    pub content_search: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilingSummary {
    pub accession_number: String,
    pub form: String,
    pub filing_date: String,
    pub company: String,
    pub cik: String,
    pub url: String,
}

impl From<&FilingInfo> for FilingSummary {
    fn from(info: &FilingInfo) -> Self {
        FilingSummary {
            accession_number: info.accession_number.clone(),
            form: info.form_type.clone(),
            filing_date: info.filing_date.clone(),
            company: info.company_name.clone(),
            cik: info.cik.clone(),
            url: info.primary_doc_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilingSearchReport {
    pub query: FilingSearchRequest,
    pub results: Vec<FilingSummary>,
    pub total_found: usize,
}

/// Company lookup outcome. A failed lookup is reported in-band.
#[derive(Debug, Clone, Serialize)]
pub struct CompanySearchReport {
    pub found: bool,
    pub query: String,
    #[serde(flatten)]
    pub company: Option<CompanyMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// --- Pure builders ---

pub fn business_report(filing: &FilingText) -> BusinessDescriptionReport {
    let section = Section::from_filing(SectionKind::Business, &filing.text);
    if section.is_empty() {
        tracing::warn!("No business section found in {}", filing.accession_number());
    }
    BusinessDescriptionReport {
        cik: filing.info.cik.clone(),
        company_name: filing.info.company_name.clone(),
        description: truncate_chars(&section.text, MAX_DESCRIPTION_CHARS).to_string(),
        source: filing.info.source(),
        accession_number: filing.accession_number().to_string(),
    }
}

/// Segments and classifies the risk-factors section into at most [`MAX_RISK_ENTRIES`] entries.
pub fn classify_risk_section(risk_text: &str) -> Vec<RiskEntry> {
    risk::segment(risk_text)
        .into_iter()
        .take(MAX_RISK_ENTRIES)
        .map(RiskEntry::from_statement)
        .collect()
}

pub fn risk_factors_report(filing: &FilingText) -> RiskFactorsReport {
    let section = Section::from_filing(SectionKind::RiskFactors, &filing.text);
    let risk_factors = classify_risk_section(&section.text);
    tracing::info!(
        "Classified {} risk factors for {}",
        risk_factors.len(),
        filing.accession_number()
    );
    RiskFactorsReport {
        cik: filing.info.cik.clone(),
        company_name: filing.info.company_name.clone(),
        risk_factors,
        source: filing.info.source(),
        accession_number: filing.accession_number().to_string(),
    }
}

pub fn mda_report(filing: &FilingText) -> MdaReport {
    let section = Section::from_filing(SectionKind::Mda, &filing.text);
    // Highlights come from the whole section, not the truncated copy
    let highlights = extract_highlights(&section.text);
    MdaReport {
        cik: filing.info.cik.clone(),
        company_name: filing.info.company_name.clone(),
        mda: truncate_chars(&section.text, MAX_MDA_CHARS).to_string(),
        highlights,
        source: filing.info.source(),
        accession_number: filing.accession_number().to_string(),
    }
}

pub fn comparison_report(filing1: &FilingText, filing2: &FilingText) -> FilingComparisonReport {
    let diff = |kind: SectionKind| -> DiffResult {
        let before = Section::from_filing(kind, &filing1.text);
        let after = Section::from_filing(kind, &filing2.text);
        compare_sections(&before.text, &after.text)
    };

    FilingComparisonReport {
        cik: filing2.info.cik.clone(),
        company_name: filing2.info.company_name.clone(),
        changes: SectionChanges {
            business_changes: diff(SectionKind::Business),
            risk_changes: diff(SectionKind::RiskFactors),
        },
        filing1: filing1.accession_number().to_string(),
        filing2: filing2.accession_number().to_string(),
    }
}

// --- Store-backed wrappers ---

async fn fetch_requested<S: FilingStore>(
    store: &S,
    request: &ExtractionRequest,
) -> Result<FilingText, EdgarError> {
    let info = store
        .resolve_filing(&request.cik, request.accession_number.as_deref(), &request.form_type)
        .await?;
    tracing::info!("Analyzing {} ({})", info.accession_number, info.source());
    store.fetch_text(&info).await
}

pub async fn fetch_business_report<S: FilingStore>(
    store: &S,
    request: &ExtractionRequest,
) -> Result<BusinessDescriptionReport, EdgarError> {
    Ok(business_report(&fetch_requested(store, request).await?))
}

pub async fn fetch_risk_factors_report<S: FilingStore>(
    store: &S,
    request: &ExtractionRequest,
) -> Result<RiskFactorsReport, EdgarError> {
    Ok(risk_factors_report(&fetch_requested(store, request).await?))
}

pub async fn fetch_mda_report<S: FilingStore>(
    store: &S,
    request: &ExtractionRequest,
) -> Result<MdaReport, EdgarError> {
    Ok(mda_report(&fetch_requested(store, request).await?))
}

/// Fetches both filings concurrently and diffs their business and risk sections.
pub async fn fetch_comparison_report<S: FilingStore>(
    store: &S,
    cik: &str,
    filing1_accession: &str,
    filing2_accession: &str,
) -> Result<FilingComparisonReport, EdgarError> {
    let fetch = |accession: &str| {
        let accession = accession.to_string();
        async move {
            let info = store.get_filing(cik, &accession).await?;
            store.fetch_text(&info).await
        }
    };
    let (filing1, filing2) = tokio::try_join!(fetch(filing1_accession), fetch(filing2_accession))?;
    Ok(comparison_report(&filing1, &filing2))
}

pub async fn search_company<S: FilingStore>(store: &S, query: &str) -> CompanySearchReport {
    match store.resolve_company(query).await {
        Ok(company) => CompanySearchReport {
            found: true,
            query: query.to_string(),
            company: Some(company),
            confidence: Some(EXACT_MATCH_CONFIDENCE),
            error: None,
        },
        Err(e) => {
            tracing::error!("Company search failed for '{}': {}", query, e);
            CompanySearchReport {
                found: false,
                query: query.to_string(),
                company: None,
                confidence: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn within_dates(info: &FilingInfo, request: &FilingSearchRequest) -> bool {
    // ISO dates compare correctly as strings
    let after_start = request
        .date_from
        .as_deref()
        .map_or(true, |from| info.filing_date.as_str() >= from);
    let before_end = request
        .date_to
        .as_deref()
        .map_or(true, |to| info.filing_date.as_str() <= to);
    after_start && before_end
}

/// Lists filings matching the request. With `content_search`, each candidate's text
/// is fetched and filings whose download fails are skipped.
pub async fn search_filings<S: FilingStore>(
    store: &S,
    request: FilingSearchRequest,
) -> Result<FilingSearchReport, EdgarError> {
    let candidates = store
        .list_filings(&request.company, request.form_type.as_deref(), request.limit)
        .await?;
    let needle = request.content_search.as_ref().map(|q| q.to_lowercase());

    let mut results = Vec::new();
    for info in candidates.iter().filter(|info| within_dates(info, &request)) {
        if let Some(needle) = &needle {
            match store.fetch_text(info).await {
                Ok(filing) if filing.text.to_lowercase().contains(needle.as_str()) => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("Skipping {} in content search: {}", info.accession_number, e);
                    continue;
                }
            }
        }
        results.push(FilingSummary::from(info));
    }

    Ok(FilingSearchReport {
        total_found: results.len(),
        results,
        query: request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::memory::tests::filing;
    use crate::edgar::memory::LOCAL_CIK;
    use crate::edgar::MemoryFilingStore;
    use crate::extractors::{Category, Severity};

    const FILING_2022: &str = "\
Item 1. Business
We design and sell widgets to industrial customers worldwide.
Item 1A. Risk Factors
• A cyber attack on our systems could have a material adverse effect on our operations.
• Changes in customer demand may negatively impact our quarterly revenue and margins.
Item 1B. Unresolved Staff Comments
None.
Item 7. Management's Discussion and Analysis of Results.
Revenue increased 12% compared with the prior year due to strong widget demand. \
Gross margin improved to 41% because of lower component costs across our plants. \
We opened a new office.
Item 7A. Quantitative and Qualitative Disclosures About Market Risk
Interest rates.";

    const FILING_2023: &str = "\
Item 1. Business
We design and sell widgets and widget accessories to industrial and retail customers worldwide, \
and we recently entered the services business.
Item 1A. Risk Factors
• A cyber attack on our systems could have a material adverse effect on our operations.
• Changes in customer demand may negatively impact our quarterly revenue and margins.
Item 1B. Unresolved Staff Comments
None.";

    fn store() -> MemoryFilingStore {
        MemoryFilingStore::new(vec![
            filing("acc-2022", "10-K", "2022-02-01", FILING_2022),
            filing("acc-2023", "10-K", "2023-02-01", FILING_2023),
        ])
    }

    #[test]
    fn test_business_report_uses_latest_filing() {
        let report =
            tokio_test::block_on(fetch_business_report(&store(), &ExtractionRequest::latest("ACME")))
                .unwrap();
        assert_eq!(report.accession_number, "acc-2023");
        assert_eq!(report.source, "10-K - 2023-02-01");
        assert!(report.description.starts_with("Business\nWe design and sell widgets and widget"));
        assert!(!report.description.contains("Risk Factors"));
    }

    #[test]
    fn test_risk_report_classifies_bullets() {
        let report = risk_factors_report(&filing("acc-2022", "10-K", "2022-02-01", FILING_2022));
        let summary: Vec<(Category, Severity)> = report
            .risk_factors
            .iter()
            .map(|entry| (entry.category, entry.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Category::Cybersecurity, Severity::High),
                (Category::Market, Severity::Medium),
            ]
        );
    }

    #[test]
    fn test_risk_list_is_capped() {
        let text: String = (0..30)
            .map(|i| format!("\n- Supply chain disruption number {} could delay our production schedules.", i))
            .chain((0..10).map(|i| format!("\n{}. Credit markets may tighten and restrict our liquidity in period {}.", i + 1, i)))
            .collect();
        let entries = classify_risk_section(&text);
        assert_eq!(entries.len(), MAX_RISK_ENTRIES);
        assert!(entries.iter().all(|e| e.category == Category::Operational));
    }

    #[test]
    fn test_mda_report_highlights() {
        let request = ExtractionRequest {
            cik: "0000000042".to_string(),
            accession_number: Some("acc-2022".to_string()),
            form_type: DEFAULT_FORM_TYPE.to_string(),
        };
        let report = tokio_test::block_on(fetch_mda_report(&store(), &request)).unwrap();
        assert_eq!(
            report.highlights,
            vec![
                "Revenue increased 12% compared with the prior year due to strong widget demand",
                "Gross margin improved to 41% because of lower component costs across our plants",
            ]
        );
        assert!(report.mda.starts_with("Management's Discussion and Analysis"));
    }

    #[test]
    fn test_missing_sections_degrade_to_empty() {
        // FILING_2023 has no Item 7
        let report = mda_report(&filing("acc-2023", "10-K", "2023-02-01", FILING_2023));
        assert!(report.mda.is_empty());
        assert!(report.highlights.is_empty());
    }

    #[test]
    fn test_comparison_report() {
        let report = tokio_test::block_on(fetch_comparison_report(
            &store(),
            "0000000042",
            "acc-2022",
            "acc-2023",
        ))
        .unwrap();
        assert_eq!(report.filing1, "acc-2022");
        assert_eq!(report.filing2, "acc-2023");
        assert!(report.changes.business_changes.significant);
        assert!(report.changes.business_changes.length_delta > 0);
        assert_eq!(report.changes.risk_changes.length_delta, 0);
        assert!(!report.changes.risk_changes.significant);
    }

    #[test]
    fn test_comparison_with_unknown_filing_fails() {
        let result = tokio_test::block_on(fetch_comparison_report(
            &store(),
            "0000000042",
            "acc-2022",
            "acc-missing",
        ));
        assert!(matches!(result, Err(EdgarError::FilingNotFound(_))));
    }

    #[test]
    fn test_search_filters_dates_and_content() {
        let request = FilingSearchRequest {
            company: "ACME".to_string(),
            form_type: Some("10-K".to_string()),
            content_search: Some("SERVICES BUSINESS".to_string()),
            limit: 10,
            ..Default::default()
        };
        let report = tokio_test::block_on(search_filings(&store(), request)).unwrap();
        assert_eq!(report.total_found, 1);
        assert_eq!(report.results[0].accession_number, "acc-2023");

        let dated = FilingSearchRequest {
            company: "ACME".to_string(),
            date_to: Some("2022-12-31".to_string()),
            limit: 10,
            ..Default::default()
        };
        let report = tokio_test::block_on(search_filings(&store(), dated)).unwrap();
        assert_eq!(report.total_found, 1);
        assert_eq!(report.results[0].accession_number, "acc-2022");
    }

    #[test]
    fn test_company_search_reports_failure_in_band() {
        let found = tokio_test::block_on(search_company(&store(), "acme"));
        assert!(found.found);
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["name"], "Acme Corp");
        assert_eq!(json["confidence"], 1.0);
        assert!(json.get("error").is_none());

        let missing = tokio_test::block_on(search_company(&store(), "nobody"));
        assert!(!missing.found);
        let json = serde_json::to_value(&missing).unwrap();
        assert!(json.get("confidence").is_none());
        assert!(missing.error.unwrap().contains("nobody"));
    }

    #[test]
    fn test_search_local_files_by_their_form() {
        let dir = std::env::temp_dir().join(format!("sec_insights_search_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("q1.txt");
        std::fs::write(&path, "Item 7. Quarterly results.").unwrap();

        let store = MemoryFilingStore::from_files(&[&path], "10-Q").unwrap();
        let request = FilingSearchRequest {
            company: LOCAL_CIK.to_string(),
            form_type: Some("10-Q".to_string()),
            limit: 10,
            ..Default::default()
        };
        let report = tokio_test::block_on(search_filings(&store, request)).unwrap();
        assert_eq!(report.total_found, 1);
        assert_eq!(report.results[0].accession_number, "q1");
        assert_eq!(report.results[0].form, "10-Q");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
