//! Article lookups: search, by uuid and by url.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument};

use avsearch_enrichers::EnricherSet;
use avsearch_search::{QueryAdapter, SearchBackend, encode_non_ascii};
use avsearch_shared::{
    AppConfig, Document, EnrichOptions, EnrichmentConfig, Result, SearchRequest, SearchResults,
};

use crate::pipeline::Pipeline;

/// Enrichment options per lookup kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Passed to the list pipeline for every search result.
    pub list: EnrichOptions,
    /// Passed to the single-item pipeline for lookups by uuid.
    pub by_uuid: EnrichOptions,
    /// Passed to the single-item pipeline for lookups by url.
    pub by_url: EnrichOptions,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self::from(&EnrichmentConfig::default())
    }
}

impl From<&EnrichmentConfig> for ServiceOptions {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            list: EnrichOptions::default().with_result_size(config.list_series_size),
            by_uuid: EnrichOptions::default().with_result_order(config.uuid_series_order),
            by_url: EnrichOptions::default().with_result_order(config.url_series_order),
        }
    }
}

impl From<&AppConfig> for ServiceOptions {
    fn from(config: &AppConfig) -> Self {
        Self::from(&config.enrichment)
    }
}

/// Search and lookup operations returning enriched articles.
///
/// Holds no per-request state; one instance can serve concurrent callers.
pub struct ArticleService {
    backend: Arc<dyn SearchBackend>,
    queries: QueryAdapter,
    list: Pipeline,
    single_item: Pipeline,
    options: ServiceOptions,
}

impl ArticleService {
    /// Service using the standard enrichers.
    pub fn new(backend: Arc<dyn SearchBackend>, queries: QueryAdapter, options: ServiceOptions) -> Self {
        let enrichers = EnricherSet::standard(backend.clone(), queries.clone());
        Self::with_enrichers(backend, queries, &enrichers, options)
    }

    /// Service with a caller-supplied enricher set.
    pub fn with_enrichers(
        backend: Arc<dyn SearchBackend>,
        queries: QueryAdapter,
        enrichers: &EnricherSet,
        options: ServiceOptions,
    ) -> Self {
        Self {
            backend,
            queries,
            list: Pipeline::list(enrichers),
            single_item: Pipeline::single_item(enrichers),
            options,
        }
    }

    /// Service configured from `config`: collection filter and enrichment options.
    pub fn from_config(config: &AppConfig, backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            backend,
            QueryAdapter::new(&config.search.collection_id),
            ServiceOptions::from(config),
        )
    }

    /// Run `request` (restricted to the collection) and enrich every hit.
    #[instrument(skip_all)]
    pub async fn search_articles(&self, request: Option<SearchRequest>) -> Result<SearchResults> {
        let request = self.queries.build(request);
        let hits = self.backend.search(&request).await?;

        let mut items = hits.documents;
        let total = if items.is_empty() {
            0
        } else {
            hits.total.unwrap_or(0)
        };

        self.list.enrich_all(&mut items, &self.options.list).await?;

        info!(returned = items.len(), total, "search complete");
        Ok(SearchResults { items, total })
    }

    /// Fetch one article by uuid and enrich it.
    #[instrument(skip(self))]
    pub async fn get_article_by_uuid(&self, uuid: &str) -> Result<Option<Document>> {
        let Some(mut doc) = self.backend.get(uuid).await? else {
            debug!("article not found");
            return Ok(None);
        };

        self.single_item.enrich(&mut doc, &self.options.by_uuid).await?;
        Ok(Some(doc))
    }

    /// Find the article whose `webUrl` matches `url` and enrich it.
    #[instrument(skip(self))]
    pub async fn get_article_by_url(&self, url: &str) -> Result<Option<Document>> {
        let request = self.queries.build(Some(
            SearchRequest::new()
                .with_query(json!({ "wildcard": { "webUrl": encode_non_ascii(url) } }))
                .size(1)
                .sort(json!(["_score"])),
        ));

        let hits = self.backend.search(&request).await?;
        let Some(mut doc) = hits.documents.into_iter().next() else {
            debug!("article not found");
            return Ok(None);
        };

        self.single_item.enrich(&mut doc, &self.options.by_url).await?;
        Ok(Some(doc))
    }
}
