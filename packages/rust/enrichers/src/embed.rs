//! Third-party media embeds.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::{Captures, Regex};
use serde_json::{Value, json};

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;

/// Detects YouTube and Twitter links in `bodyHTML`, lists them in `embeds`
/// and marks each anchor up as an embed placeholder.
pub struct EmbedEnricher;

#[async_trait]
impl Enricher for EmbedEnricher {
    fn name(&self) -> &'static str {
        "embed"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r#"(?is)<a\b[^>]*?\bhref="([^"]+)"[^>]*>.*?</a>"#).expect("valid regex")
        });

        let body = doc.str_field("bodyHTML").unwrap_or_default();
        let mut embeds: Vec<Value> = Vec::new();

        let rewritten = ANCHOR_RE.replace_all(body, |caps: &Captures<'_>| {
            let anchor = &caps[0];
            let href = &caps[1];
            match classify(href) {
                Some((kind, id)) => {
                    embeds.push(json!({ "type": kind, "id": id, "url": href }));
                    format!(
                        r#"<div class="av-embed" data-embed-type="{kind}" data-embed-id="{id}">{anchor}</div>"#
                    )
                }
                None => anchor.to_string(),
            }
        });

        Ok(Patch::new()
            .with("bodyHTML", rewritten.into_owned())
            .with("embeds", embeds))
    }
}

/// Recognize an embeddable link, returning `(type, id)`.
fn classify(href: &str) -> Option<(&'static str, String)> {
    static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?:youtube\.com/(?:watch\?(?:[^#]*?&(?:amp;)?)?v=|embed/)|youtu\.be/)([A-Za-z0-9_-]{11})")
            .expect("valid regex")
    });
    static TWITTER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?:^|[/.])(?:twitter|x)\.com/[A-Za-z0-9_]+/status(?:es)?/(\d+)").expect("valid regex")
    });

    if let Some(caps) = YOUTUBE_RE.captures(href) {
        return Some(("youtube", caps[1].to_string()));
    }
    TWITTER_RE
        .captures(href)
        .map(|caps| ("twitter", caps[1].to_string()))
}
