// src/extractors/classify.rs
//! Rule-based topic and severity classification of risk statements.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Cybersecurity,
    Regulatory,
    Market,
    Financial,
    Operational,
    Technology,
    Environmental,
    General,
}

/// Ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Category keyword table. Scanned top to bottom and the first hit wins,
/// so the row order is part of the classification contract.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Cybersecurity, &["cyber", "data breach", "security", "hack"]),
    (Category::Regulatory, &["regulation", "compliance", "legal", "law"]),
    (Category::Market, &["market", "competition", "demand", "customer"]),
    (Category::Financial, &["financial", "credit", "liquidity", "debt"]),
    (Category::Operational, &["operation", "supply", "manufacturing", "production"]),
    (Category::Technology, &["technology", "innovation", "obsolete", "intellectual property"]),
    (Category::Environmental, &["climate", "environmental", "sustainability", "carbon"]),
];

const HIGH_SEVERITY_TERMS: &[&str] = &["material adverse", "significant harm", "substantial loss"];
const MEDIUM_SEVERITY_TERMS: &[&str] = &["adverse", "negative", "impact"];

/// A classified risk statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskEntry {
    #[serde(rename = "risk")]
    pub raw_text: String,
    pub category: Category,
    pub severity: Severity,
}

impl RiskEntry {
    pub fn from_statement(statement: impl Into<String>) -> Self {
        let raw_text = statement.into();
        let (category, severity) = classify(&raw_text);
        RiskEntry {
            raw_text,
            category,
            severity,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Plain substring containment over the lower-cased statement ("law" hits "flawless").
pub fn categorize(statement: &str) -> Category {
    let lower = statement.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

pub fn assess_severity(statement: &str) -> Severity {
    let lower = statement.to_lowercase();
    if contains_any(&lower, HIGH_SEVERITY_TERMS) {
        Severity::High
    } else if contains_any(&lower, MEDIUM_SEVERITY_TERMS) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub fn classify(statement: &str) -> (Category, Severity) {
    (categorize(statement), assess_severity(statement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_category_in_table_order_wins() {
        let statement = "A cyber incident could weaken our market position.";
        assert_eq!(categorize(statement), Category::Cybersecurity);
    }

    #[test]
    fn test_each_category_is_reachable() {
        assert_eq!(categorize("Hackers may target us"), Category::Cybersecurity);
        assert_eq!(categorize("New REGULATION may apply"), Category::Regulatory);
        assert_eq!(categorize("Customer churn may rise"), Category::Market);
        assert_eq!(categorize("Our debt levels are high"), Category::Financial);
        assert_eq!(categorize("Supply shortages may occur"), Category::Operational);
        assert_eq!(categorize("Our products may become obsolete"), Category::Technology);
        assert_eq!(categorize("Climate events may disrupt us"), Category::Environmental);
        assert_eq!(categorize("We may not achieve our goals"), Category::General);
    }

    #[test]
    fn test_substring_matches_inside_unrelated_words() {
        // "law" inside "flawless" still counts
        assert_eq!(categorize("Our record is not flawless"), Category::Regulatory);
    }

    #[test]
    fn test_high_severity_takes_precedence() {
        let statement = "This could have a material adverse and negative effect.";
        assert_eq!(assess_severity(statement), Severity::High);
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(assess_severity("We could suffer SUBSTANTIAL LOSS."), Severity::High);
        assert_eq!(assess_severity("This may impact results."), Severity::Medium);
        assert_eq!(assess_severity("Results may be adverse."), Severity::Medium);
        assert_eq!(assess_severity("We may not achieve our goals."), Severity::Low);
        assert!(Severity::High < Severity::Medium && Severity::Medium < Severity::Low);
    }

    #[test]
    fn test_empty_statement_is_general_low() {
        assert_eq!(classify(""), (Category::General, Severity::Low));
    }

    #[test]
    fn test_risk_entry_serializes_with_display_names() {
        let entry = RiskEntry::from_statement("A data breach could cause significant harm to our brand.");
        assert_eq!(entry.category, Category::Cybersecurity);
        assert_eq!(entry.severity, Severity::High);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["risk"], "A data breach could cause significant harm to our brand.");
        assert_eq!(json["category"], "Cybersecurity");
        assert_eq!(json["severity"], "High");
    }

    #[test]
    fn test_classification_is_idempotent() {
        let statement = "Competition and demand shifts may have an adverse impact.";
        assert_eq!(classify(statement), classify(statement));
    }
}
