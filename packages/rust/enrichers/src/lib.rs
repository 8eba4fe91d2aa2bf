//! Document enrichers and the registry that holds them.
//!
//! Each enricher derives one facet of an article (authors, images, series,
//! ...) and reports it as a [`Patch`]. Enrichers never mutate the document
//! they read; the pipeline in `avsearch-core` decides when patches land.

mod annotations;
mod authors;
mod body_html;
mod categorization;
mod embed;
mod images;
mod primary_theme;
mod series;
mod summaries;
mod text;
mod title;
mod web_url;

use std::sync::Arc;

use async_trait::async_trait;

use avsearch_search::{QueryAdapter, SearchBackend};
use avsearch_shared::{Document, EnrichOptions, Patch, Result};

pub use authors::AuthorsEnricher;
pub use body_html::BodyHtmlEnricher;
pub use categorization::CategorizationEnricher;
pub use embed::EmbedEnricher;
pub use images::ImagesEnricher;
pub use primary_theme::PrimaryThemeEnricher;
pub use series::SeriesEnricher;
pub use summaries::SummariesEnricher;
pub use title::TitleEnricher;
pub use web_url::WebUrlEnricher;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A stateless transform that derives one facet of a document.
///
/// `enrich` reads `doc` and returns the fields to set. An error aborts the
/// enrichment of the whole document.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Human-readable enricher name for tracing and errors.
    fn name(&self) -> &'static str;

    /// Compute this enricher's fields for `doc`.
    async fn enrich(&self, doc: &Document, opts: &EnrichOptions) -> Result<Patch>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One instance of every enricher, shared by the pipeline variants.
///
/// Fields are public so callers can swap an individual enricher.
#[derive(Clone)]
pub struct EnricherSet {
    pub categorization: Arc<dyn Enricher>,
    pub series: Arc<dyn Enricher>,
    pub web_url: Arc<dyn Enricher>,
    pub body_html: Arc<dyn Enricher>,
    pub images: Arc<dyn Enricher>,
    pub embed: Arc<dyn Enricher>,
    pub summaries: Arc<dyn Enricher>,
    pub authors: Arc<dyn Enricher>,
    pub primary_theme: Arc<dyn Enricher>,
    pub title: Arc<dyn Enricher>,
}

impl EnricherSet {
    /// The built-in enrichers. `backend` and `queries` serve series lookups.
    pub fn standard(backend: Arc<dyn SearchBackend>, queries: QueryAdapter) -> Self {
        Self {
            categorization: Arc::new(CategorizationEnricher),
            series: Arc::new(SeriesEnricher::new(backend, queries)),
            web_url: Arc::new(WebUrlEnricher),
            body_html: Arc::new(BodyHtmlEnricher),
            images: Arc::new(ImagesEnricher),
            embed: Arc::new(EmbedEnricher),
            summaries: Arc::new(SummariesEnricher),
            authors: Arc::new(AuthorsEnricher),
            primary_theme: Arc::new(PrimaryThemeEnricher),
            title: Arc::new(TitleEnricher),
        }
    }
}
