//! Display title normalization.

use async_trait::async_trait;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;
use crate::text::{collapse_whitespace, strip_tags};

/// Sets `title` to the plain-text title (falling back to `headline`).
pub struct TitleEnricher;

#[async_trait]
impl Enricher for TitleEnricher {
    fn name(&self) -> &'static str {
        "title"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let raw = doc
            .str_field("title")
            .filter(|t| !t.trim().is_empty())
            .or_else(|| doc.str_field("headline"))
            .unwrap_or_default();

        Ok(Patch::new().with("title", collapse_whitespace(&strip_tags(raw))))
    }
}
