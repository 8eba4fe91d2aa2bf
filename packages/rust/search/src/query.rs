//! Base-filter wrapping for caller-supplied queries.

use std::sync::LazyLock;

use serde_json::{Value, json};

use avsearch_shared::{DEFAULT_COLLECTION_ID, SearchRequest};

/// Base filter for the default collection, built once per process.
static DEFAULT_BASE_FILTER: LazyLock<Value> =
    LazyLock::new(|| base_filter(DEFAULT_COLLECTION_ID));

/// Restricts every query to one collection and to `article`/`video` documents.
///
/// The filter is built at construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct QueryAdapter {
    base: Value,
}

impl QueryAdapter {
    /// Adapter for a specific collection annotation id.
    pub fn new(collection_id: &str) -> Self {
        if collection_id == DEFAULT_COLLECTION_ID {
            return Self::default();
        }
        Self {
            base: base_filter(collection_id),
        }
    }

    /// The mandatory filter clause.
    pub fn base_filter(&self) -> &Value {
        &self.base
    }

    /// Combine `request` with the base filter.
    ///
    /// A present `query` is joined conjunctively (`bool.must`) with the base
    /// filter; an absent one is replaced by the base filter alone. All other
    /// request fields pass through untouched.
    pub fn build(&self, request: Option<SearchRequest>) -> SearchRequest {
        let mut request = request.unwrap_or_default();

        request.query = Some(match request.query.take() {
            Some(user_query) => json!({
                "bool": {
                    "must": [self.base.clone(), user_query]
                }
            }),
            None => self.base.clone(),
        });

        request
    }
}

impl Default for QueryAdapter {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_FILTER.clone(),
        }
    }
}

fn base_filter(collection_id: &str) -> Value {
    json!({
        "constant_score": {
            "filter": {
                "bool": {
                    "must": [
                        { "term": { "annotations.id": collection_id } }
                    ],
                    "should": [
                        { "term": { "type": "article" } },
                        { "term": { "type": "video" } }
                    ],
                    "minimum_should_match": 1
                }
            }
        }
    })
}
