//! Core domain types: documents, patches, search requests and results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AvSearchError, Result};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One article or video record as returned by the search index.
///
/// There is no fixed schema: enrichers read the fields they need and add
/// their own. The only field with identity meaning is `uuid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a document from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AvSearchError::parse(format!(
                "expected a JSON object for a document, got: {other}"
            ))),
        }
    }

    /// The document identity, if present.
    pub fn uuid(&self) -> Option<&str> {
        self.str_field("uuid")
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field as a string slice (absent or non-string → `None`).
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// A field as an array slice (absent or non-array → empty).
    pub fn array_field(&self, key: &str) -> &[Value] {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Overwrite every field named in `patch`.
    pub fn apply(&mut self, patch: Patch) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Field assignments produced by a single enricher.
///
/// Enrichers never mutate the document they are given; the orchestrator
/// merges their patches once every step has succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style assignment.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Assign a field; a later assignment to the same key wins.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Fold `other` into this patch; `other` wins on shared keys.
    pub fn merge(&mut self, other: Patch) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ---------------------------------------------------------------------------
// Search requests and results
// ---------------------------------------------------------------------------

/// A backend search request.
///
/// `query` holds the backend query clause; every other field (`size`,
/// `sort`, `from`, ...) lives in `params` and is passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn size(self, size: u64) -> Self {
        self.param("size", Value::from(size))
    }

    pub fn offset(self, from: u64) -> Self {
        self.param("from", Value::from(from))
    }

    pub fn sort(self, sort: Value) -> Self {
        self.param("sort", sort)
    }

    /// Set an arbitrary pass-through parameter.
    pub fn param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Raw backend search output: the page of documents plus the backend's
/// total hit count, which may exceed `documents.len()`.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    pub documents: Vec<Document>,
    pub total: Option<u64>,
}

/// Enriched search output returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub items: Vec<Document>,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Enrichment options
// ---------------------------------------------------------------------------

/// Result ordering for related-article lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Options bag handed to every enricher; only some enrichers read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Maximum number of related articles to fetch.
    pub result_size: Option<usize>,
    /// Ordering of related articles by publish date.
    pub result_order: Option<SortOrder>,
}

impl EnrichOptions {
    pub fn with_result_size(mut self, size: usize) -> Self {
        self.result_size = Some(size);
        self
    }

    pub fn with_result_order(mut self, order: SortOrder) -> Self {
        self.result_order = Some(order);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_from_non_object_fails() {
        let err = Document::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn patch_application_overwrites_fields() {
        let mut doc = Document::from_value(json!({"uuid": "u1", "title": "old"})).unwrap();
        doc.apply(Patch::new().with("title", "new").with("authors", json!([])));

        assert_eq!(doc.str_field("title"), Some("new"));
        assert_eq!(doc.get("authors"), Some(&json!([])));
        assert_eq!(doc.uuid(), Some("u1"));
    }

    #[test]
    fn patch_merge_prefers_later() {
        let mut first = Patch::new().with("bodyHTML", "a").with("images", json!([]));
        first.merge(Patch::new().with("bodyHTML", "b"));
        assert_eq!(first.get("bodyHTML"), Some(&json!("b")));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn search_request_flattens_params() {
        let req = SearchRequest::new()
            .with_query(json!({"match_all": {}}))
            .size(5)
            .sort(json!(["_score"]));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"query": {"match_all": {}}, "size": 5, "sort": ["_score"]})
        );

        let parsed: SearchRequest = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn search_request_without_query_omits_it() {
        let value = serde_json::to_value(SearchRequest::new().size(1)).unwrap();
        assert_eq!(value, json!({"size": 1}));
    }

    #[test]
    fn document_fixture_parses() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/article.fixture.json")
            .expect("read fixture");
        let doc: Document = serde_json::from_str(&fixture).expect("deserialize fixture");
        assert_eq!(doc.uuid(), Some("b3f8a0a2-1d4e-11e6-b197-a4af20d5575e"));
        assert_eq!(doc.str_field("type"), Some("article"));
        assert!(!doc.array_field("annotations").is_empty());
    }
}
