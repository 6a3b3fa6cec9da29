//! Display terms from taxonomy fields.
//!
//! A taxonomy field holds terms; each term may carry its ancestor chain
//! (nearest first). Extraction optionally lists ancestors ahead of each
//! term, drops repeats, then prefixes every label. Prefixing runs last so
//! the dedup only sees raw labels.

use crate::types::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Ancestors, nearest first.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub parents: Vec<Map<String, Value>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Term {
    pub fn label(&self, attr: &str) -> Option<String> {
        attribute_label(&self.attributes, attr)
    }
}

fn attribute_label(attributes: &Map<String, Value>, attr: &str) -> Option<String> {
    match attributes.get(attr)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// How to read labels out of a taxonomy field.
#[derive(Debug, Clone, PartialEq)]
pub struct TermOptions {
    /// Attribute holding the display label.
    pub attr: String,
    /// How many ancestors to list ahead of each term.
    pub parent_depth: usize,
    pub prefix: String,
}

impl Default for TermOptions {
    fn default() -> Self {
        Self {
            attr: "title".to_string(),
            parent_depth: 0,
            prefix: String::new(),
        }
    }
}

/// Ordered, deduplicated, prefixed labels for every term in `field`.
pub fn extract_terms(field: Option<&TaxonomyField>, options: &TermOptions) -> Vec<String> {
    let Some(field) = field else {
        return Vec::new();
    };

    let mut labels = Vec::new();
    for term in &field.terms {
        if options.parent_depth > 0 {
            for parent in term.parents.iter().take(options.parent_depth) {
                labels.extend(attribute_label(parent, &options.attr));
            }
        }
        match term.label(&options.attr) {
            Some(label) => labels.push(label),
            None => debug!(attr = %options.attr, "term has no display attribute"),
        }
    }

    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .map(|label| format!("{}{label}", options.prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(json: &str) -> TaxonomyField {
        serde_json::from_str(json).unwrap()
    }

    fn depth(parent_depth: usize) -> TermOptions {
        TermOptions {
            parent_depth,
            ..TermOptions::default()
        }
    }

    #[test]
    fn absent_field_is_empty() {
        assert!(extract_terms(None, &TermOptions::default()).is_empty());
    }

    #[test]
    fn field_without_terms_is_empty() {
        let f = field("{}");
        assert!(extract_terms(Some(&f), &TermOptions::default()).is_empty());
    }

    #[test]
    fn plain_terms_in_order() {
        let f = field(r#"{"terms": [{"title": "Nature"}, {"title": "Urban"}]}"#);
        assert_eq!(extract_terms(Some(&f), &TermOptions::default()), ["Nature", "Urban"]);
    }

    #[test]
    fn parents_ignored_at_depth_zero() {
        let f = field(r#"{"terms": [{"title": "Oak", "parents": [{"title": "Trees"}]}]}"#);
        assert_eq!(extract_terms(Some(&f), &depth(0)), ["Oak"]);
    }

    #[test]
    fn parents_nearest_first_limited_by_depth() {
        let f = field(
            r#"{"terms": [{"title": "Oak",
                "parents": [{"title": "Trees"}, {"title": "Plants"}, {"title": "Life"}]}]}"#,
        );
        assert_eq!(extract_terms(Some(&f), &depth(2)), ["Trees", "Plants", "Oak"]);
    }

    #[test]
    fn shared_ancestor_appears_once() {
        let f = field(
            r#"{"terms": [
                {"title": "Oak", "parents": [{"title": "Trees"}]},
                {"title": "Pine", "parents": [{"title": "Trees"}]}
            ]}"#,
        );
        assert_eq!(extract_terms(Some(&f), &depth(1)), ["Trees", "Oak", "Pine"]);
    }

    #[test]
    fn prefix_applied_after_dedup() {
        let f = field(r#"{"terms": [{"title": "a"}, {"title": "a"}, {"title": "b"}]}"#);
        let options = TermOptions {
            prefix: "tag-".into(),
            ..TermOptions::default()
        };
        assert_eq!(extract_terms(Some(&f), &options), ["tag-a", "tag-b"]);
    }

    #[test]
    fn null_parents_and_terms_are_skipped() {
        let f = field(r#"{"terms": [{"title": "Oak", "parents": null}, {"title": "Pine"}]}"#);
        assert_eq!(extract_terms(Some(&f), &depth(2)), ["Oak", "Pine"]);
        assert!(extract_terms(Some(&field(r#"{"terms": null}"#)), &depth(1)).is_empty());
    }

    #[test]
    fn custom_attribute_and_non_string_values() {
        let f = field(r#"{"terms": [{"slug": "x", "title": "X"}, {"slug": 7}, {"title": "none"}]}"#);
        let options = TermOptions {
            attr: "slug".into(),
            ..TermOptions::default()
        };
        assert_eq!(extract_terms(Some(&f), &options), ["x", "7"]);
    }
}
