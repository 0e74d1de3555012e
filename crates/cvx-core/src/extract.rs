//! Technology detection over arbitrary JSON.
//!
//! The value is serialized to compact JSON, lowercased, and scanned for
//! every alias in the [`catalog`](crate::catalog) dictionary. Matching is
//! plain substring search: keys, values and punctuation all take part, and
//! an alias embedded in an unrelated word still counts (`"go"` inside
//! `"google"`).

use serde_json::Value;
use std::collections::BTreeSet;

use crate::catalog;

/// Canonical tags whose aliases occur anywhere in `content`.
///
/// `null` yields the empty set.
pub fn extract_technologies(content: &Value) -> BTreeSet<String> {
    if content.is_null() {
        return BTreeSet::new();
    }
    let blob = content.to_string().to_lowercase();
    detect_in_text(&blob)
}

/// Same as [`extract_technologies`] for an optional payload.
pub fn extract_from(content: Option<&Value>) -> BTreeSet<String> {
    content.map(extract_technologies).unwrap_or_default()
}

/// Scan an already-lowercased text blob.
fn detect_in_text(blob: &str) -> BTreeSet<String> {
    catalog::patterns()
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| blob.contains(alias)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags(v: &Value) -> Vec<String> {
        extract_technologies(v).into_iter().collect()
    }

    #[test]
    fn test_null_is_empty() {
        assert!(extract_technologies(&Value::Null).is_empty());
        assert!(extract_from(None).is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let found = extract_technologies(&json!({"skills": ["DOCKER", "Kubernetes"]}));
        assert!(found.contains("docker"));
        assert!(found.contains("kubernetes"));
    }

    #[test]
    fn test_no_duplicate_tags() {
        let found = extract_technologies(&json!("node.js and nodejs and node"));
        assert_eq!(found.iter().filter(|t| *t == "nodejs").count(), 1);
        assert!(found.contains("javascript"));
    }

    #[test]
    fn test_keys_are_scanned() {
        let found = extract_technologies(&json!({"python": null}));
        assert!(found.contains("python"));
    }

    #[test]
    fn test_substring_false_positive_kept() {
        // "mongo" contains "go"
        let found = extract_technologies(&json!(["mongo"]));
        assert!(found.contains("mongodb"));
        assert!(found.contains("go"));
    }

    #[test]
    fn test_plain_text_without_aliases() {
        // "{}" and "[]" serialize without any alias substring
        assert!(tags(&json!({})).is_empty());
        assert!(tags(&json!([])).is_empty());
        assert!(tags(&json!(42)).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let v = json!({"habilidades": ["React", "AWS", "PostgreSQL"]});
        assert_eq!(extract_technologies(&v), extract_technologies(&v));
    }

    #[test]
    fn test_nested_values() {
        let v = json!({
            "experiencia": [{"empresa": "Acme", "stack": {"db": "postgres"}}]
        });
        assert!(extract_technologies(&v).contains("postgresql"));
    }
}
