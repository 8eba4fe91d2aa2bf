//! Per-document enrichment pipeline and batch runner.
//!
//! A pipeline has two parts that start together for each document:
//! - independent enrichers, each reading the same snapshot of the input
//! - a chain of dependent enrichers, run strictly in order on a private
//!   working copy so each step sees the output of the steps before it
//!
//! Everything for one document is polled inside one task. Patches land on
//! the document only after every step succeeded: independent patches first
//! in registration order, then the accumulated chain patch.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use avsearch_enrichers::{Enricher, EnricherSet};
use avsearch_shared::{Document, EnrichOptions, Patch, Result};

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// An ordered set of enrichers applied to one document at a time.
#[derive(Clone)]
pub struct Pipeline {
    name: &'static str,
    independent: Vec<Arc<dyn Enricher>>,
    chain: Vec<Arc<dyn Enricher>>,
}

impl Pipeline {
    pub fn builder(name: &'static str) -> PipelineBuilder {
        PipelineBuilder {
            name,
            independent: Vec::new(),
            chain: Vec::new(),
        }
    }

    /// Variant for search results: body-HTML → images → summaries.
    pub fn list(set: &EnricherSet) -> Self {
        Self::with_independent(Self::builder("list"), set)
            .chain(set.body_html.clone())
            .chain(set.images.clone())
            .chain(set.summaries.clone())
            .build()
    }

    /// Variant for direct lookups: body-HTML → images → embed → summaries.
    pub fn single_item(set: &EnricherSet) -> Self {
        Self::with_independent(Self::builder("single_item"), set)
            .chain(set.body_html.clone())
            .chain(set.images.clone())
            .chain(set.embed.clone())
            .chain(set.summaries.clone())
            .build()
    }

    fn with_independent(builder: PipelineBuilder, set: &EnricherSet) -> PipelineBuilder {
        builder
            .independent(set.categorization.clone())
            .independent(set.series.clone())
            .independent(set.web_url.clone())
            .independent(set.authors.clone())
            .independent(set.primary_theme.clone())
            .independent(set.title.clone())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of the independent enrichers, in merge order.
    pub fn independent_names(&self) -> Vec<&'static str> {
        self.independent.iter().map(|e| e.name()).collect()
    }

    /// Names of the chained enrichers, in execution order.
    pub fn chain_names(&self) -> Vec<&'static str> {
        self.chain.iter().map(|e| e.name()).collect()
    }

    /// Enrich one document in place.
    ///
    /// Fails with the first enricher error; the document is then left
    /// exactly as it was passed in.
    #[instrument(skip_all, fields(pipeline = self.name, uuid = doc.uuid().unwrap_or_default()))]
    pub async fn enrich(&self, doc: &mut Document, opts: &EnrichOptions) -> Result<()> {
        let snapshot: &Document = doc;

        let (independent, chained) = futures::try_join!(
            try_join_all(
                self.independent
                    .iter()
                    .map(|enricher| run_step(enricher.as_ref(), snapshot, opts))
            ),
            self.run_chain(snapshot, opts),
        )?;

        for patch in independent {
            doc.apply(patch);
        }
        doc.apply(chained);

        debug!("document enriched");
        Ok(())
    }

    /// Enrich every document concurrently, in place.
    ///
    /// Any single failure fails the whole batch.
    #[instrument(skip_all, fields(pipeline = self.name, documents = docs.len()))]
    pub async fn enrich_all(&self, docs: &mut [Document], opts: &EnrichOptions) -> Result<()> {
        let count = docs.len();
        try_join_all(docs.iter_mut().map(|doc| self.enrich(doc, opts))).await?;

        info!(documents = count, "batch enriched");
        Ok(())
    }

    /// Run the chain on a working copy and return the combined patch.
    async fn run_chain(&self, snapshot: &Document, opts: &EnrichOptions) -> Result<Patch> {
        let mut accumulated = Patch::new();
        if self.chain.is_empty() {
            return Ok(accumulated);
        }

        let mut working = snapshot.clone();
        for step in &self.chain {
            let patch = run_step(step.as_ref(), &working, opts).await?;
            working.apply(patch.clone());
            accumulated.merge(patch);
        }

        Ok(accumulated)
    }
}

async fn run_step(enricher: &dyn Enricher, doc: &Document, opts: &EnrichOptions) -> Result<Patch> {
    debug!(enricher = enricher.name(), "running enricher");
    enricher.enrich(doc, opts).await.inspect_err(|e| {
        warn!(enricher = enricher.name(), error = %e, "enricher failed");
    })
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Registers the enrichers of a [`Pipeline`].
pub struct PipelineBuilder {
    name: &'static str,
    independent: Vec<Arc<dyn Enricher>>,
    chain: Vec<Arc<dyn Enricher>>,
}

impl PipelineBuilder {
    /// Add an enricher that runs concurrently with everything else.
    pub fn independent(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.independent.push(enricher);
        self
    }

    /// Append a step to the sequential chain.
    pub fn chain(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.chain.push(enricher);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            name: self.name,
            independent: self.independent,
            chain: self.chain,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
