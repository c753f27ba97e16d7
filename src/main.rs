use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tweetsent::config::{Config, SummaryStyle};
use tweetsent::search::client::HttpSearchClient;
use tweetsent::search::SearchBackend;
use tweetsent::{logging, report, runtime};

#[derive(Parser, Debug)]
#[command(name = "tweetsent")]
#[command(about = "Search tweets and see how they feel", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: <config dir>/tweetsent/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the sentiment search server
    #[arg(short, long)]
    server: Option<String>,

    /// How to draw the word-frequency summary
    #[arg(long, value_enum)]
    summary: Option<SummaryStyle>,

    /// Run this search right away
    #[arg(short, long)]
    query: Option<String>,

    /// Print the results of --query to stdout instead of starting the UI
    #[arg(short, long, requires = "query")]
    print: bool,

    /// Log level filter, e.g. "debug" or "tweetsent=trace"
    #[arg(long)]
    log_level: Option<String>,
}

fn load_config(cli: &Cli, path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(style) = cli.summary {
        config.ui.summary_style = style;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

fn config_origin(path: Option<&Path>) -> String {
    match path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("defaults (no file at {})", path.display()),
        None => "defaults".to_string(),
    }
}

/// Same rule as the interactive search: a blank query never reaches the
/// server.
fn headless_query(query: Option<&str>) -> Result<&str> {
    match query {
        Some(query) if !query.trim().is_empty() => Ok(query),
        _ => bail!("--print needs a non-empty --query"),
    }
}

async fn print_once(config: &Config, query: &str) -> Result<()> {
    let client = HttpSearchClient::new(&config.server).context("Failed to build HTTP client")?;
    let response = client.search(query).await.with_context(|| {
        format!("Search for {:?} against {} failed", query, config.server.search_url())
    })?;
    print!("{}", report::format_report(query, &response));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().or_else(Config::default_path);
    // Log settings come from the config, so nothing logged while loading it
    // is kept; where it came from is reported once the subscriber is up.
    let config = load_config(&cli, config_path.as_deref())?;

    if let Some(path) = logging::init(&config.logging) {
        tracing::info!(
            log_file = %path.display(),
            config = %config_origin(config_path.as_deref()),
            server = %config.server.search_url(),
            "tweetsent starting"
        );
    }

    if cli.print {
        let query = headless_query(cli.query.as_deref())?;
        return print_once(&config, query).await;
    }

    runtime::run(config, cli.query).await
}
