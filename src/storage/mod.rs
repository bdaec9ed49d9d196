// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::utils::error::StorageError;

/// On-disk envelope around a saved report.
#[derive(Serialize)]
struct SavedReport<'a, T: Serialize> {
    kind: &'a str,
    cik: &'a str,
    accession_number: &'a str,
    saved_at: String,
    report: &'a T,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves a report as pretty JSON under `<base>/<cik>/<accession>/<kind>.json`.
    pub fn save_report<T: Serialize>(
        &self,
        kind: &str,
        cik: &str,
        accession_number: &str,
        report: &T,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self
            .base_dir
            .join(sanitize_component(cik))
            .join(sanitize_component(accession_number));
        fs::create_dir_all(&target_dir)?;

        let file_path = target_dir.join(format!("{}.json", sanitize_component(kind)));

        let envelope = SavedReport {
            kind,
            cik,
            accession_number,
            saved_at: chrono::Utc::now().to_rfc3339(),
            report,
        };
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json)?;
        tracing::info!("Saved {} report to {}", kind, file_path.display());

        Ok(file_path)
    }
}

/// Keeps path components to a safe character set.
fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_report_writes_envelope() {
        let dir = std::env::temp_dir().join(format!("sec_insights_storage_{}", std::process::id()));
        let storage = StorageManager::new(&dir).unwrap();

        let report = serde_json::json!({ "highlights": ["Revenue grew"] });
        let path = storage
            .save_report("mda", "0000320193", "0000320193-23-000106", &report)
            .unwrap();

        assert_eq!(
            path,
            dir.join("0000320193").join("0000320193-23-000106").join("mda.json")
        );
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["kind"], "mda");
        assert_eq!(saved["report"]["highlights"][0], "Revenue grew");
        assert!(chrono::DateTime::parse_from_rfc3339(saved["saved_at"].as_str().unwrap()).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("../etc"), "___etc");
        assert_eq!(sanitize_component("acc-1_x"), "acc-1_x");
        assert_eq!(sanitize_component(""), "_");
    }
}
