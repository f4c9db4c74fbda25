//! Record type stored in the JSON file
//!
//! The store is schema-light: only the addressing key and the two counters
//! are modeled. Every other field a record carries (title, content, author,
//! tags, ...) is captured in a flattened map and passed through writes
//! byte-for-byte unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One blog-post entry in the JSON store, keyed by slug
///
/// Counters default to zero when absent from the file, so hand-seeded
/// records that omit them still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRecord {
    /// Unique human-readable identifier, the store's addressing key
    pub slug: String,
    /// View counter
    #[serde(default)]
    pub views: u64,
    /// Like counter (non-negative by construction)
    #[serde(default)]
    pub likes: u64,
    /// All remaining fields, preserved but not interpreted by the store
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlogRecord {
    /// Create a record with zeroed counters and no passthrough fields
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            views: 0,
            likes: 0,
            extra: Map::new(),
        }
    }

    /// Builder-style setter for a passthrough field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counters_default_to_zero() {
        let record: BlogRecord =
            serde_json::from_value(json!({"slug": "hello-world", "title": "Hello"})).unwrap();
        assert_eq!(record.slug, "hello-world");
        assert_eq!(record.views, 0);
        assert_eq!(record.likes, 0);
        assert_eq!(record.extra.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_passthrough_fields_survive_roundtrip() {
        let original = json!({
            "slug": "club-trip",
            "views": 12,
            "likes": 3,
            "title": "Club Trip",
            "author": "maria",
            "tags": ["travel", "photos"],
        });
        let record: BlogRecord = serde_json::from_value(original.clone()).unwrap();
        let reencoded = serde_json::to_value(&record).unwrap();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn test_new_has_empty_extras() {
        let record = BlogRecord::new("fresh-post");
        assert_eq!(record.views, 0);
        assert_eq!(record.likes, 0);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_with_field() {
        let record = BlogRecord::new("fresh-post").with_field("title", json!("Fresh Post"));
        assert_eq!(record.extra.get("title"), Some(&json!("Fresh Post")));
    }
}
