//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use serde::Serialize;
use tracing::info;

use avsearch_core::ArticleService;
use avsearch_search::{ElasticBackend, ElasticOptions};
use avsearch_shared::{
    AppConfig, AvSearchError, SearchRequest, init_config, load_config, load_config_from, resolve_api_key,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Search and enrich articles from the content index.
#[derive(Parser)]
#[command(
    name = "avsearch",
    version,
    about = "Search the content index and print enriched articles as JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.avsearch/avsearch.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the search endpoint from the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Override the index name from the config file.
    #[arg(long, global = true)]
    pub index: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Search articles and enrich every result.
    Search {
        /// Query DSL clause as JSON, combined with the collection filter.
        #[arg(short, long)]
        query: Option<String>,

        /// Number of results to return.
        #[arg(long)]
        size: Option<u64>,

        /// Offset of the first result.
        #[arg(long)]
        from: Option<u64>,
    },

    /// Fetch one article by uuid.
    Get {
        /// Article uuid.
        uuid: String,
    },

    /// Fetch one article by its web URL.
    Url {
        /// Article URL; non-ASCII characters are percent-encoded.
        url: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "avsearch=info",
        1 => "avsearch=debug",
        _ => "avsearch=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&cli),
        },
        _ => {
            let output = cmd_lookup(&cli).await?;
            println!("{output}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Run a search or lookup and render the result as pretty JSON.
/// A missing article renders as `null`.
async fn cmd_lookup(cli: &Cli) -> Result<String> {
    let service = build_service(cli)?;

    match &cli.command {
        Command::Search { query, size, from } => {
            let request = search_request(query.as_deref(), *size, *from)?;
            to_json(&service.search_articles(request).await?)
        }
        Command::Get { uuid } => to_json(&service.get_article_by_uuid(uuid).await?),
        Command::Url { url } => to_json(&service.get_article_by_url(url).await?),
        Command::Config { .. } => Err(eyre!("config commands do not query the index")),
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the config file and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(endpoint) = &cli.endpoint {
        config.search.endpoint = endpoint.clone();
    }
    if let Some(index) = &cli.index {
        config.search.index = index.clone();
    }

    Ok(config)
}

fn build_service(cli: &Cli) -> Result<ArticleService> {
    let config = resolve_config(cli)?;
    let backend = ElasticBackend::new(ElasticOptions {
        endpoint: config.search.endpoint.clone(),
        index: config.search.index.clone(),
        timeout_secs: config.search.timeout_secs,
        api_key: resolve_api_key(&config),
    })?;

    info!(
        endpoint = %config.search.endpoint,
        index = %config.search.index,
        "using search backend"
    );
    Ok(ArticleService::from_config(&config, Arc::new(backend)))
}

/// Build the search request from command-line flags; `None` when no flag was given.
fn search_request(query: Option<&str>, size: Option<u64>, from: Option<u64>) -> Result<Option<SearchRequest>> {
    if query.is_none() && size.is_none() && from.is_none() {
        return Ok(None);
    }

    let mut request = SearchRequest::new();
    if let Some(raw) = query {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| AvSearchError::validation(format!("--query must be valid JSON: {e}")))?;
        if !value.is_object() {
            return Err(AvSearchError::validation("--query must be a JSON object").into());
        }
        request = request.with_query(value);
    }
    if let Some(size) = size {
        request = request.size(size);
    }
    if let Some(from) = from {
        request = request.offset(from);
    }

    Ok(Some(request))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_flags() {
        let cli = Cli::parse_from([
            "avsearch", "-vv", "--log-format", "json", "search", "--query", r#"{"match_all":{}}"#,
            "--size", "5",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        match cli.command {
            Command::Search { query, size, from } => {
                assert_eq!(query.as_deref(), Some(r#"{"match_all":{}}"#));
                assert_eq!(size, Some(5));
                assert_eq!(from, None);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn no_search_flags_means_no_request() {
        assert!(search_request(None, None, None).unwrap().is_none());
    }

    #[test]
    fn search_request_from_flags() {
        let request = search_request(Some(r#"{"term":{"type":"video"}}"#), Some(3), Some(6))
            .unwrap()
            .unwrap();
        assert_eq!(request.query, Some(json!({"term": {"type": "video"}})));
        assert_eq!(request.params.get("size"), Some(&json!(3)));
        assert_eq!(request.params.get("from"), Some(&json!(6)));
    }

    #[test]
    fn rejects_malformed_query() {
        for raw in ["{not json", "[1, 2]"] {
            let err = search_request(Some(raw), None, None).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<AvSearchError>(),
                Some(AvSearchError::Validation { .. })
            ));
        }
    }

    #[tokio::test]
    async fn get_unknown_id_renders_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/_doc/not-found-id"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = server.uri();
        let cli = Cli::parse_from([
            "avsearch", "--config", "../../fixtures/avsearch.toml", "--endpoint", endpoint.as_str(),
            "get", "not-found-id",
        ]);

        assert_eq!(cmd_lookup(&cli).await.unwrap(), "null");
    }

    #[test]
    fn flags_override_config_file() {
        let cli = Cli::parse_from([
            "avsearch", "--config", "../../fixtures/avsearch.toml", "--index", "staging", "config",
            "show",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.search.endpoint, "http://search.internal:9200");
        assert_eq!(config.search.index, "staging");
        assert_eq!(config.enrichment.list_series_size, 5);
    }
}
