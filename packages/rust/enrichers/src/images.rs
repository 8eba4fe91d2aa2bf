//! Image metadata extraction and image-service rewriting.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use serde_json::{Value, json};
use url::form_urlencoded::byte_serialize;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;

/// Image service endpoint for raw source URLs.
const IMAGE_SERVICE: &str = "https://www.ft.com/__origami/service/image/v2/images/raw/";

/// Width requested for inline body images.
const BODY_IMAGE_WIDTH: u32 = 700;

/// Collects `images` from `mainImage` and the body, and rewrites body image
/// sources through the image service.
pub struct ImagesEnricher;

#[async_trait]
impl Enricher for ImagesEnricher {
    fn name(&self) -> &'static str {
        "images"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        static IMG_SEL: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse("img").expect("valid selector"));

        let body = doc.str_field("bodyHTML").unwrap_or_default();
        let mut images = Vec::new();

        if let Some(main) = doc.get("mainImage").filter(|m| m.get("url").is_some()) {
            images.push(json!({
                "url": main.get("url").cloned(),
                "alt": main.get("alt").cloned(),
                "width": main.get("width").cloned(),
                "height": main.get("height").cloned(),
            }));
        }

        let fragment = Html::parse_fragment(body);
        for img in fragment.select(&IMG_SEL) {
            let el = img.value();
            let Some(src) = el.attr("src").filter(|s| !s.is_empty()) else {
                continue;
            };

            images.push(json!({
                "url": src,
                "alt": el.attr("alt"),
                "width": dimension(el.attr("width")),
                "height": dimension(el.attr("height")),
            }));
        }

        Ok(Patch::new()
            .with("images", images)
            .with("bodyHTML", rewrite_sources(body)))
    }
}

/// Route every absolute `img` source in the raw markup through the image service.
fn rewrite_sources(body: &str) -> String {
    static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
        // Group 1 is everything up to the value, group 2/3 the double/single quoted value
        Regex::new(r#"(?i)(<img\b[^>]*?\ssrc\s*=\s*)(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid regex")
    });

    IMG_SRC_RE
        .replace_all(body, |caps: &Captures<'_>| {
            let raw = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            match service_url(&decode_entities(raw)) {
                Some(url) => format!(r#"{}"{url}""#, &caps[1]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Decode the character references that can appear in a URL attribute.
fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn dimension(attr: Option<&str>) -> Value {
    attr.and_then(|v| v.trim().parse::<u64>().ok())
        .map(Value::from)
        .unwrap_or(Value::Null)
}

/// Image-service URL for an absolute http(s) source not already served by it.
fn service_url(src: &str) -> Option<String> {
    let is_absolute = src.starts_with("http://") || src.starts_with("https://");
    if !is_absolute || src.starts_with(IMAGE_SERVICE) {
        return None;
    }
    let encoded: String = byte_serialize(src.as_bytes()).collect();
    Some(format!(
        "{IMAGE_SERVICE}{encoded}?source=alphaville&width={BODY_IMAGE_WIDTH}"
    ))
}
