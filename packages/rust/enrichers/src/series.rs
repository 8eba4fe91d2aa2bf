//! Series membership and sibling articles.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use avsearch_search::{QueryAdapter, SearchBackend};
use avsearch_shared::{Document, EnrichOptions, Patch, Result, SearchRequest, SortOrder};

use crate::Enricher;
use crate::annotations::annotations;

/// Sibling articles fetched when the caller gives no size.
const DEFAULT_SERIES_SIZE: usize = 10;

/// Sets `series` to the document's series and its other articles, or `null`
/// when the document belongs to no series.
///
/// Honors `result_size` and `result_order` from the options.
pub struct SeriesEnricher {
    backend: Arc<dyn SearchBackend>,
    queries: QueryAdapter,
}

impl SeriesEnricher {
    pub fn new(backend: Arc<dyn SearchBackend>, queries: QueryAdapter) -> Self {
        Self { backend, queries }
    }

    fn series_request(&self, series_id: &str, opts: &EnrichOptions) -> SearchRequest {
        let size = opts.result_size.unwrap_or(DEFAULT_SERIES_SIZE);
        let order = opts.result_order.unwrap_or(SortOrder::Desc);

        // One extra hit so the current article can be dropped without coming up short
        self.queries.build(Some(
            SearchRequest::new()
                .with_query(json!({ "term": { "annotations.id": series_id } }))
                .size((size as u64).saturating_add(1))
                .sort(json!([{ "publishedDate": { "order": order.as_str() } }])),
        ))
    }
}

#[async_trait]
impl Enricher for SeriesEnricher {
    fn name(&self) -> &'static str {
        "series"
    }

    async fn enrich(&self, doc: &Document, opts: &EnrichOptions) -> Result<Patch> {
        let anns = annotations(doc);
        let Some(series) = anns.iter().find(|a| a.is_kind("SERIES")) else {
            return Ok(Patch::new().with("series", Value::Null));
        };

        let request = self.series_request(&series.id, opts);
        let hits = self.backend.search(&request).await?;

        let current = doc.uuid();
        let size = opts.result_size.unwrap_or(DEFAULT_SERIES_SIZE);
        let articles: Vec<Value> = hits
            .documents
            .iter()
            .filter(|d| current.is_none() || d.uuid() != current)
            .take(size)
            .map(article_summary)
            .collect();

        debug!(series = %series.id, articles = articles.len(), "series loaded");

        // `total` counts siblings, so the current article comes off when it was a hit
        let includes_current = current.is_some() && hits.documents.iter().any(|d| d.uuid() == current);
        let total = hits
            .total
            .unwrap_or(hits.documents.len() as u64)
            .saturating_sub(u64::from(includes_current));
        Ok(Patch::new().with(
            "series",
            json!({
                "id": series.id,
                "prefLabel": series.pref_label,
                "articles": articles,
                "total": total,
            }),
        ))
    }
}

fn article_summary(doc: &Document) -> Value {
    json!({
        "uuid": doc.get("uuid"),
        "title": doc.get("title"),
        "webUrl": doc.get("webUrl"),
        "publishedDate": doc.get("publishedDate"),
    })
}
