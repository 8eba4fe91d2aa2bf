//! Elasticsearch HTTP backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use avsearch_shared::{AvSearchError, Document, Result, SearchHits, SearchRequest};

use crate::backend::SearchBackend;

/// User-Agent string for backend requests.
const USER_AGENT: &str = concat!("avsearch/", env!("CARGO_PKG_VERSION"));

/// Error bodies are truncated to this many bytes in error messages.
const MAX_ERROR_BODY: usize = 200;

/// Connection settings for [`ElasticBackend`].
#[derive(Debug, Clone)]
pub struct ElasticOptions {
    /// Cluster base URL, e.g. `http://localhost:9200`.
    pub endpoint: String,
    /// Index to search.
    pub index: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Sent as `Authorization: ApiKey <key>` when present.
    pub api_key: Option<String>,
}

/// [`SearchBackend`] backed by the Elasticsearch REST API.
pub struct ElasticBackend {
    client: Client,
    endpoint: Url,
    index: String,
    api_key: Option<String>,
}

impl ElasticBackend {
    /// Build a backend with its own HTTP client.
    pub fn new(opts: ElasticOptions) -> Result<Self> {
        let endpoint = Url::parse(&opts.endpoint).map_err(|e| {
            AvSearchError::config(format!("invalid search endpoint '{}': {e}", opts.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(AvSearchError::config(format!(
                "search endpoint is not a base URL: {endpoint}"
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| AvSearchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            index: opts.index,
            api_key: opts.api_key,
        })
    }

    /// Endpoint URL with `segments` appended as encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AvSearchError::config(format!("search endpoint is not a base URL: {}", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(reqwest::header::AUTHORIZATION, format!("ApiKey {key}")),
            None => request,
        }
    }
}

#[async_trait]
impl SearchBackend for ElasticBackend {
    #[instrument(skip_all, fields(index = %self.index))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits> {
        let url = self.url(&[self.index.as_str(), "_search"])?;
        let response = self
            .authorize(self.client.post(url.clone()).json(request))
            .send()
            .await
            .map_err(|e| AvSearchError::Network(format!("{url}: {e}")))?;

        let body = read_json(&url, ensure_success(&url, response).await?).await?;
        let hits = parse_search_hits(&body)?;

        debug!(
            returned = hits.documents.len(),
            total = ?hits.total,
            "search complete"
        );

        Ok(hits)
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn get(&self, uuid: &str) -> Result<Option<Document>> {
        let url = self.url(&[self.index.as_str(), "_doc", uuid])?;
        let response = self
            .authorize(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| AvSearchError::Network(format!("{url}: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("document not found");
            return Ok(None);
        }

        let body = read_json(&url, ensure_success(&url, response).await?).await?;
        if body.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(None);
        }

        match body.get("_source") {
            Some(source) => Document::from_value(source.clone()).map(Some),
            None => Err(AvSearchError::parse(format!("{url}: response has no _source"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Turn a non-2xx response into a backend error carrying a body snippet.
async fn ensure_success(url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let end = floor_char_boundary(&body, MAX_ERROR_BODY);
    Err(AvSearchError::Backend(format!(
        "{url}: HTTP {status}: {}",
        &body[..end]
    )))
}

async fn read_json(url: &Url, response: Response) -> Result<Value> {
    response
        .json::<Value>()
        .await
        .map_err(|e| AvSearchError::parse(format!("{url}: invalid JSON response: {e}")))
}

/// Extract `_source` documents and the total from a `_search` response.
fn parse_search_hits(body: &Value) -> Result<SearchHits> {
    let hits = body
        .get("hits")
        .ok_or_else(|| AvSearchError::parse("search response has no hits section"))?;

    // `hits.total` is a bare number on older clusters and `{ value, relation }` on newer ones.
    let total = match hits.get("total") {
        Some(Value::Object(obj)) => obj.get("value").and_then(Value::as_u64),
        Some(other) => other.as_u64(),
        None => None,
    };

    let documents = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .map(Document::from_value)
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(SearchHits { documents, total })
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
