// src/utils/error.rs
use thiserror::Error;

// Errors only come from the filing store, storage and CLI layers.
// The text-analysis extractors are total and never produce one.
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("SEC Rate limit likely exceeded")]
    RateLimited,

    #[error("Could not find company for '{0}'")]
    CompanyNotFound(String),

    #[error("Could not find specified filing: {0}")]
    FilingNotFound(String),

    #[error("No {form_type} filings found for CIK {cik}")]
    NoFilings { cik: String, form_type: String },

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filings_message_names_form_and_cik() {
        let err = EdgarError::NoFilings {
            cik: "0000320193".to_string(),
            form_type: "10-K".to_string(),
        };
        assert_eq!(err.to_string(), "No 10-K filings found for CIK 0000320193");
    }

    #[test]
    fn edgar_errors_convert_into_app_error() {
        let app: AppError = EdgarError::RateLimited.into();
        assert!(matches!(app, AppError::Edgar(EdgarError::RateLimited)));
        assert_eq!(
            app.to_string(),
            "EDGAR interaction failed: SEC Rate limit likely exceeded"
        );
    }
}
