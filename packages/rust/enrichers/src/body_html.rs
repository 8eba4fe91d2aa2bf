//! Body markup rendering.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;

/// Canonical page for linked content.
const CONTENT_BASE: &str = "https://www.ft.com/content/";

/// Fields holding body markup, most rendered first.
const BODY_FIELDS: [&str; 3] = ["bodyHTML", "bodyXML", "body"];

/// Renders the stored body into `bodyHTML`.
///
/// First step of the body chain: later steps read `bodyHTML`.
pub struct BodyHtmlEnricher;

#[async_trait]
impl Enricher for BodyHtmlEnricher {
    fn name(&self) -> &'static str {
        "body_html"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let source = BODY_FIELDS
            .iter()
            .find_map(|field| doc.str_field(field))
            .unwrap_or_default();

        Ok(Patch::new().with("bodyHTML", render_body(source)))
    }
}

/// Convert stored body XML into displayable HTML.
pub(crate) fn render_body(xml: &str) -> String {
    static BODY_TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)</?body\b[^>]*>").expect("valid regex"));
    static RELATED_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<ft-related\b.*?</ft-related>").expect("valid regex")
    });
    static CONTENT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
        // Captures the trailing uuid of the content url and the link text
        Regex::new(
            r#"(?is)<ft-content\b[^>]*?\burl="[^"]*?/([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})"[^>]*>(.*?)</ft-content>"#,
        )
        .expect("valid regex")
    });

    let html = BODY_TAG_RE.replace_all(xml, "");
    let html = RELATED_RE.replace_all(&html, "");
    let html = CONTENT_LINK_RE.replace_all(&html, |caps: &regex::Captures<'_>| {
        format!(r#"<a href="{CONTENT_BASE}{}">{}</a>"#, &caps[1], &caps[2])
    });

    html.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{doc, fixture_article};
    use serde_json::json;

    #[tokio::test]
    async fn renders_fixture_body() {
        let patch = BodyHtmlEnricher
            .enrich(&fixture_article(), &EnrichOptions::default())
            .await
            .unwrap();
        let html = patch.get("bodyHTML").unwrap().as_str().unwrap();

        assert!(html.starts_with("<p>Some links"));
        assert!(!html.contains("<body>"));
        assert!(!html.contains("ft-related"));
        assert!(html.contains(
            r#"<a href="https://www.ft.com/content/0a5e6e5c-1d3b-11e6-b286-cddde55ca122">the earlier post</a>"#
        ));
    }

    #[tokio::test]
    async fn prefers_rendered_html() {
        let d = doc(json!({"bodyHTML": "<p>rendered</p>", "bodyXML": "<body><p>xml</p></body>"}));
        let patch = BodyHtmlEnricher.enrich(&d, &EnrichOptions::default()).await.unwrap();
        assert_eq!(patch.get("bodyHTML"), Some(&json!("<p>rendered</p>")));
    }

    #[tokio::test]
    async fn missing_body_renders_empty() {
        let patch = BodyHtmlEnricher
            .enrich(&doc(json!({})), &EnrichOptions::default())
            .await
            .unwrap();
        assert_eq!(patch.get("bodyHTML"), Some(&json!("")));
    }

    #[test]
    fn content_without_uuid_is_left_alone() {
        let xml = r#"<p><ft-content url="http://api.ft.com/things/abc">x</ft-content></p>"#;
        assert_eq!(render_body(xml), xml);
    }
}
