//! Canonical web URL.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;

/// Base for content without a stored web URL.
const CONTENT_BASE: &str = "https://www.ft.com/content/";

/// Sets `webUrl` (https, falling back to the content page for the uuid) and
/// `webPath` (path and query of that URL).
pub struct WebUrlEnricher;

#[async_trait]
impl Enricher for WebUrlEnricher {
    fn name(&self) -> &'static str {
        "web_url"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let stored = doc
            .str_field("webUrl")
            .and_then(|raw| Url::parse(raw.trim()).ok());

        let url = match stored {
            Some(mut url) => {
                if url.scheme() == "http" {
                    let _ = url.set_scheme("https");
                }
                Some(url)
            }
            None => doc
                .uuid()
                .and_then(|uuid| Url::parse(&format!("{CONTENT_BASE}{uuid}")).ok()),
        };

        let patch = match url {
            Some(url) => {
                let path = match url.query() {
                    Some(query) => format!("{}?{query}", url.path()),
                    None => url.path().to_string(),
                };
                Patch::new().with("webUrl", url.to_string()).with("webPath", path)
            }
            None => Patch::new()
                .with("webUrl", Value::Null)
                .with("webPath", Value::Null),
        };

        Ok(patch)
    }
}
