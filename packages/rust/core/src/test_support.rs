//! Scripted enrichers and backends for orchestration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Barrier;

use avsearch_enrichers::{Enricher, EnricherSet};
use avsearch_search::SearchBackend;
use avsearch_shared::{
    AvSearchError, Document, EnrichOptions, Patch, Result, SearchHits, SearchRequest,
};

pub fn doc(value: Value) -> Document {
    Document::from_value(value).expect("object")
}

/// Ordered record of what the scripted enrichers did.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Appends `[name]` to `body`, yielding between its start and end events.
pub struct MarkerEnricher {
    name: &'static str,
    log: EventLog,
}

impl MarkerEnricher {
    pub fn new(name: &'static str, log: EventLog) -> Self {
        Self { name, log }
    }
}

#[async_trait]
impl Enricher for MarkerEnricher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        self.log.push(format!("start {}", self.name));
        tokio::task::yield_now().await;
        let body = format!("{}[{}]", doc.str_field("body").unwrap_or_default(), self.name);
        self.log.push(format!("end {}", self.name));
        Ok(Patch::new().with("body", body))
    }
}

/// Sets `field` to a fixed value and records the options it received.
pub struct SetFieldEnricher {
    name: &'static str,
    field: &'static str,
    value: Value,
    log: Option<EventLog>,
}

impl SetFieldEnricher {
    pub fn new(name: &'static str, field: &'static str, value: Value) -> Self {
        Self {
            name,
            field,
            value,
            log: None,
        }
    }

    fn logged(name: &'static str, log: EventLog) -> Self {
        Self {
            name,
            field: name,
            value: json!(name),
            log: Some(log),
        }
    }
}

#[async_trait]
impl Enricher for SetFieldEnricher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn enrich(&self, _doc: &Document, opts: &EnrichOptions) -> Result<Patch> {
        if let Some(log) = &self.log {
            log.push(format!("options {} size={:?}", self.name, opts.result_size));
        }
        Ok(Patch::new().with(self.field, self.value.clone()))
    }
}

/// Fails for every document, or only for the one with a given uuid.
pub struct FailingEnricher {
    name: &'static str,
    only_uuid: Option<&'static str>,
}

impl FailingEnricher {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            only_uuid: None,
        }
    }

    pub fn only_for(name: &'static str, uuid: &'static str) -> Self {
        Self {
            name,
            only_uuid: Some(uuid),
        }
    }
}

#[async_trait]
impl Enricher for FailingEnricher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        match self.only_uuid {
            Some(uuid) if doc.uuid() != Some(uuid) => Ok(Patch::new()),
            _ => Err(AvSearchError::enrichment(self.name, "scripted failure")),
        }
    }
}

/// Waits on a shared barrier, then sets `name` to `true`.
pub struct BarrierEnricher {
    name: &'static str,
    barrier: Arc<Barrier>,
}

impl BarrierEnricher {
    pub fn new(name: &'static str, barrier: Arc<Barrier>) -> Self {
        Self { name, barrier }
    }
}

#[async_trait]
impl Enricher for BarrierEnricher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn enrich(&self, _doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        self.barrier.wait().await;
        Ok(Patch::new().with(self.name, true))
    }
}

/// An [`EnricherSet`] of scripted enrichers: independent slots set a field
/// named after themselves, chain slots append markers to `body`.
pub fn marker_set(log: &EventLog) -> EnricherSet {
    let field = |name| -> Arc<dyn Enricher> { Arc::new(SetFieldEnricher::logged(name, log.clone())) };
    let marker = |name| -> Arc<dyn Enricher> { Arc::new(MarkerEnricher::new(name, log.clone())) };

    EnricherSet {
        categorization: field("categorization"),
        series: field("series"),
        web_url: field("web_url"),
        body_html: marker("body_html"),
        images: marker("images"),
        embed: marker("embed"),
        summaries: marker("summaries"),
        authors: field("authors"),
        primary_theme: field("primary_theme"),
        title: field("title"),
    }
}

/// Backend returning canned hits and recording every request.
pub struct StubBackend {
    hits: Vec<Document>,
    total: Option<u64>,
    stored: Option<Document>,
    fail: bool,
    requests: Mutex<Vec<SearchRequest>>,
    lookups: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn with_hits(hits: Vec<Document>, total: Option<u64>) -> Arc<Self> {
        Arc::new(Self {
            hits,
            total,
            stored: None,
            fail: false,
            requests: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn with_stored(doc: Document) -> Arc<Self> {
        Arc::new(Self {
            hits: Vec::new(),
            total: None,
            stored: Some(doc),
            fail: false,
            requests: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            hits: Vec::new(),
            total: None,
            stored: None,
            fail: true,
            requests: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for StubBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(AvSearchError::Backend("HTTP 503: cluster unavailable".into()));
        }
        Ok(SearchHits {
            documents: self.hits.clone(),
            total: self.total,
        })
    }

    async fn get(&self, uuid: &str) -> Result<Option<Document>> {
        self.lookups.lock().unwrap().push(uuid.to_string());
        if self.fail {
            return Err(AvSearchError::Backend("HTTP 503: cluster unavailable".into()));
        }
        Ok(self.stored.clone().filter(|d| d.uuid() == Some(uuid)))
    }
}
