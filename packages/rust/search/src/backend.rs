//! The search index contract.

use async_trait::async_trait;

use avsearch_shared::{Document, Result, SearchHits, SearchRequest};

/// A content index that can run searches and point lookups.
///
/// Implementations report failures as errors and never retry; callers see
/// backend errors unchanged.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a search and return the page of raw documents plus the
    /// backend's total hit count.
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits>;

    /// Fetch one document by uuid. A missing document is `Ok(None)`.
    async fn get(&self, uuid: &str) -> Result<Option<Document>>;
}
