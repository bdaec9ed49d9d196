// src/extractors/diff.rs
use serde::Serialize;

/// Relative length change (against the first text) above which a change is significant.
pub const SIGNIFICANT_CHANGE_RATIO: f64 = 0.1;

/// Coarse magnitude-of-change signal between two versions of a section.
/// Equal-length rewrites register as unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    #[serde(rename = "length_change")]
    pub length_delta: i64,
    #[serde(rename = "significant_change")]
    pub significant: bool,
}

/// Compares two section texts by character count. Not symmetric: the
/// threshold is relative to `text1`.
pub fn compare_sections(text1: &str, text2: &str) -> DiffResult {
    let len1 = text1.chars().count() as i64;
    let len2 = text2.chars().count() as i64;
    let length_delta = len2 - len1;
    let significant = (length_delta.abs() as f64) > (len1 as f64) * SIGNIFICANT_CHANGE_RATIO;

    DiffResult {
        length_delta,
        significant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_relative_to_first_text() {
        let a = "a".repeat(100);
        let b = "b".repeat(90);

        // 10 is not more than 10% of 100, but is more than 10% of 90
        let forward = compare_sections(&a, &b);
        let backward = compare_sections(&b, &a);
        assert_eq!(forward, DiffResult { length_delta: -10, significant: false });
        assert_eq!(backward, DiffResult { length_delta: 10, significant: true });
        assert_ne!(forward.significant, backward.significant);
    }

    #[test]
    fn test_short_versus_long() {
        let forward = compare_sections("short", "a very very very long text");
        let backward = compare_sections("a very very very long text", "short");
        assert_eq!(forward.length_delta, 21);
        assert_eq!(backward.length_delta, -21);
        assert!(forward.significant);
        assert!(backward.significant);
        assert_eq!(forward, compare_sections("short", "a very very very long text"));
    }

    #[test]
    fn test_empty_baseline() {
        assert!(compare_sections("", "x").significant);
        assert_eq!(
            compare_sections("", ""),
            DiffResult { length_delta: 0, significant: false }
        );
    }

    #[test]
    fn test_equal_length_rewrite_is_not_significant() {
        let result = compare_sections("abcdefghij", "zyxwvutsrq");
        assert_eq!(result, DiffResult { length_delta: 0, significant: false });
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(compare_sections("é", "éé").length_delta, 1);
    }

    #[test]
    fn test_serializes_with_change_field_names() {
        let json = serde_json::to_value(compare_sections("abc", "abcdef")).unwrap();
        assert_eq!(json["length_change"], 3);
        assert_eq!(json["significant_change"], true);
    }
}
