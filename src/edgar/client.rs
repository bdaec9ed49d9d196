// src/edgar/client.rs
use crate::edgar::models::{CompanyMatch, CompanySubmission, FilingInfo, FilingText};
use crate::edgar::{normalize_cik, FilingStore};
use crate::utils::error::EdgarError;
use crate::utils::text::document_to_text;
use reqwest::header;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "sec_insights/0.1 (contact@example.com)";
// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
const DEFAULT_REQUEST_DELAY_MS: u64 = 150;

const ENV_USER_AGENT: &str = "SEC_API_USER_AGENT";
const ENV_REQUEST_DELAY_MS: &str = "EDGAR_REQUEST_DELAY_MS";

const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// EDGAR client settings, read from the environment.
#[derive(Debug, Clone)]
pub struct EdgarClientConfig {
    pub user_agent: String,
    pub request_delay: Duration,
}

impl EdgarClientConfig {
    pub fn from_env() -> Self {
        let user_agent = std::env::var(ENV_USER_AGENT).unwrap_or_else(|_| {
            tracing::warn!(
                "{} not set; using placeholder User-Agent. SEC may reject requests.",
                ENV_USER_AGENT
            );
            DEFAULT_USER_AGENT.to_string()
        });
        let delay_ms = std::env::var(ENV_REQUEST_DELAY_MS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_DELAY_MS);

        Self {
            user_agent,
            request_delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Filing store backed by SEC EDGAR.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
    config: EdgarClientConfig,
}

impl EdgarClient {
    pub fn new(config: EdgarClientConfig) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str()) // SEC requires an identifying User-Agent
            .timeout(Duration::from_secs(60))
            .build()?;
        tracing::debug!("Using User-Agent: {}", config.user_agent);
        Ok(Self { http, config })
    }

    /// GETs a URL after the rate-limit delay and maps EDGAR's error statuses.
    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        // --- Basic Rate Limiting ---
        tokio::time::sleep(self.config.request_delay).await;

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json,application/xml,text/html,text/plain,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::FilingNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }
        Ok(response)
    }

    /// Downloads a specific filing document from its URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        let body = self.get(url).await?.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Looks up a ticker in SEC's company ticker list.
    pub async fn lookup_ticker(&self, ticker: &str) -> Result<CompanyMatch, EdgarError> {
        let json: serde_json::Value = self.get(COMPANY_TICKERS_URL).await?.json().await?;
        find_ticker(&json, ticker)
    }

    /// Fetches the company submission data for a given (10-digit) CIK
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("https://data.sec.gov/submissions/CIK{}.json", cik);
        let submission: CompanySubmission = self.get(&url).await?.json().await?;
        Ok(submission)
    }

    async fn cik_for(&self, cik_or_ticker: &str) -> Result<String, EdgarError> {
        match normalize_cik(cik_or_ticker) {
            Some(cik) => Ok(cik),
            None => Ok(self.lookup_ticker(cik_or_ticker).await?.cik),
        }
    }
}

impl FilingStore for EdgarClient {
    async fn resolve_company(&self, query: &str) -> Result<CompanyMatch, EdgarError> {
        match normalize_cik(query) {
            Some(cik) => {
                let submission = self.get_company_submissions(&cik).await?;
                Ok(CompanyMatch {
                    cik,
                    name: submission.name,
                    ticker: submission.tickers.into_iter().next(),
                })
            }
            None => self.lookup_ticker(query).await,
        }
    }

    async fn list_filings(
        &self,
        cik: &str,
        form_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<FilingInfo>, EdgarError> {
        let cik = self.cik_for(cik).await?;
        let submission = self.get_company_submissions(&cik).await?;
        let filings = select_filings(&submission, &cik, form_type, limit)?;
        tracing::info!("Found {} filings for CIK {} (form {:?})", filings.len(), cik, form_type);
        Ok(filings)
    }

    async fn get_filing(&self, cik: &str, accession_number: &str) -> Result<FilingInfo, EdgarError> {
        let cik = self.cik_for(cik).await?;
        let submission = self.get_company_submissions(&cik).await?;
        let recent = &submission.filings.recent;
        let index = recent
            .accessionNumber
            .iter()
            .position(|acc| acc == accession_number)
            .ok_or_else(|| EdgarError::FilingNotFound(accession_number.to_string()))?;
        filing_at(&submission, &cik, index)
    }

    async fn fetch_text(&self, filing: &FilingInfo) -> Result<FilingText, EdgarError> {
        let document = self.download_filing_doc(&filing.primary_doc_url()).await?;
        let text = document_to_text(&document);
        tracing::info!(
            "Flattened {} ({} bytes) to {} bytes of text",
            filing.accession_number,
            document.len(),
            text.len()
        );
        Ok(FilingText {
            info: filing.clone(),
            text,
        })
    }
}

/// Finds a ticker in the `company_tickers.json` payload (an object of
/// `{"cik_str", "ticker", "title"}` records).
fn find_ticker(json: &serde_json::Value, ticker: &str) -> Result<CompanyMatch, EdgarError> {
    let wanted = ticker.trim().to_uppercase();
    let companies = json
        .as_object()
        .ok_or_else(|| EdgarError::Parse("Invalid JSON structure".to_string()))?;

    for company in companies.values() {
        let company_ticker = company.get("ticker").and_then(|t| t.as_str()).unwrap_or_default();
        if company_ticker.to_uppercase() != wanted {
            continue;
        }
        let cik_num = company
            .get("cik_str")
            .and_then(|c| c.as_u64())
            .ok_or_else(|| EdgarError::Parse("Invalid CIK format".to_string()))?;
        let name = company
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        return Ok(CompanyMatch {
            cik: format!("{:010}", cik_num),
            name,
            ticker: Some(wanted),
        });
    }

    Err(EdgarError::CompanyNotFound(ticker.to_string()))
}

fn filing_at(submission: &CompanySubmission, cik: &str, i: usize) -> Result<FilingInfo, EdgarError> {
    let recent = &submission.filings.recent;
    let missing = |what: &str| EdgarError::Parse(format!("Missing {} for filing #{}", what, i));

    Ok(FilingInfo {
        accession_number: recent.accessionNumber.get(i).ok_or_else(|| missing("accession number"))?.clone(),
        filing_date: recent.filingDate.get(i).ok_or_else(|| missing("filing date"))?.clone(),
        form_type: recent.form.get(i).ok_or_else(|| missing("form type"))?.clone(),
        ticker: submission.tickers.first().cloned().unwrap_or_default(),
        company_name: submission.name.clone(),
        cik: cik.to_string(),
        primary_doc: recent.primaryDocument.get(i).ok_or_else(|| missing("primary document"))?.clone(),
    })
}

/// Selects up to `limit` recent filings, optionally of one form type, in EDGAR's
/// (most recent first) order.
pub fn select_filings(
    submission: &CompanySubmission,
    cik: &str,
    form_type: Option<&str>,
    limit: usize,
) -> Result<Vec<FilingInfo>, EdgarError> {
    let recent = &submission.filings.recent;
    let mut filings = Vec::new();

    for (i, form) in recent.form.iter().enumerate() {
        if filings.len() >= limit {
            break;
        }
        if form_type.is_some_and(|wanted| !form.eq_ignore_ascii_case(wanted)) {
            continue;
        }
        filings.push(filing_at(submission, cik, i)?);
    }

    Ok(filings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::models::{Filings, FilingsList};

    fn submission() -> CompanySubmission {
        CompanySubmission {
            name: "Apple Inc.".to_string(),
            tickers: vec!["AAPL".to_string()],
            filings: Filings {
                recent: FilingsList {
                    accessionNumber: vec!["acc-3".into(), "acc-2".into(), "acc-1".into()],
                    filingDate: vec!["2023-11-03".into(), "2023-08-04".into(), "2022-10-28".into()],
                    form: vec!["10-K".into(), "10-Q".into(), "10-K".into()],
                    primaryDocument: vec!["k23.htm".into(), "q23.htm".into(), "k22.htm".into()],
                },
            },
        }
    }

    #[test]
    fn test_select_filings_by_form() {
        let filings = select_filings(&submission(), "0000320193", Some("10-k"), 10).unwrap();
        let accessions: Vec<&str> = filings.iter().map(|f| f.accession_number.as_str()).collect();
        assert_eq!(accessions, vec!["acc-3", "acc-1"]);
        assert_eq!(filings[0].filing_date, "2023-11-03");
        assert_eq!(filings[1].primary_doc, "k22.htm");
        assert_eq!(filings[0].ticker, "AAPL");
    }

    #[test]
    fn test_select_filings_respects_limit() {
        let filings = select_filings(&submission(), "0000320193", None, 2).unwrap();
        assert_eq!(filings.len(), 2);
        assert_eq!(filings[1].form_type, "10-Q");
    }

    #[test]
    fn test_select_filings_reports_ragged_columns() {
        let mut broken = submission();
        broken.filings.recent.primaryDocument.pop();
        let result = select_filings(&broken, "0000320193", Some("10-K"), 10);
        assert!(matches!(result, Err(EdgarError::Parse(_))));
    }

    #[test]
    fn test_find_ticker() {
        let json = serde_json::json!({
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
        });
        let company = find_ticker(&json, "msft").unwrap();
        assert_eq!(company.cik, "0000789019");
        assert_eq!(company.name, "MICROSOFT CORP");
        assert_eq!(company.ticker.as_deref(), Some("MSFT"));

        assert!(matches!(find_ticker(&json, "ZZZZ"), Err(EdgarError::CompanyNotFound(_))));
    }
}
