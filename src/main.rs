//! Linkcache main entry point
//!
//! This is the command-line interface for the Linkcache link harvester.

use anyhow::{bail, Context};
use clap::Parser;
use linkcache::config::{load_config_with_hash, CacheBackend, Config};
use linkcache::output::{generate_html_report, ReportEntry};
use linkcache::{Coordinator, CrawlOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkcache: a cache-first page link harvester
///
/// Fetches each URL, lists the targets of its anchors, and caches the result
/// so the next request for the same URL is answered without the network.
#[derive(Parser, Debug)]
#[command(name = "linkcache")]
#[command(version = "1.0.0")]
#[command(about = "A cache-first page link harvester", long_about = None)]
struct Cli {
    /// URLs to crawl; each is handled concurrently
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Use the paying tier's shorter retry backoff
    #[arg(long)]
    paying: bool,

    /// Keep the cache in memory only, ignoring the configured backend
    #[arg(long)]
    memory: bool,

    /// Write an HTML result page to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.memory {
        config.cache.backend = CacheBackend::Memory;
    }

    let coordinator =
        Coordinator::from_config(&config).context("failed to initialize the crawler")?;

    let entries = crawl_all(&coordinator, cli.urls, cli.paying).await?;

    for entry in &entries {
        print_outcome(&entry.url, &entry.outcome);
    }

    if let Some(path) = &cli.report {
        generate_html_report(&entries, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    let failures = entries.iter().filter(|e| !e.outcome.is_success()).count();
    if failures > 0 {
        bail!("{} of {} crawls failed", failures, entries.len());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkcache=info,warn"),
            1 => EnvFilter::new("linkcache=debug,info"),
            2 => EnvFilter::new("linkcache=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs every URL on its own task and collects the outcomes in input order
async fn crawl_all(
    coordinator: &Coordinator,
    urls: Vec<String>,
    paying: bool,
) -> anyhow::Result<Vec<ReportEntry>> {
    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                let outcome = coordinator.handle_crawl(&url, paying).await;
                ReportEntry { url, outcome }
            })
        })
        .collect();

    let mut entries = Vec::with_capacity(handles.len());
    for handle in handles {
        entries.push(handle.await.context("crawl task panicked")?);
    }
    Ok(entries)
}

fn print_outcome(url: &str, outcome: &CrawlOutcome) {
    match outcome {
        CrawlOutcome::Completed(result) => {
            let links = result.content.matches("<br>").count();
            if result.from_cache {
                println!("{}: {} links (from cache)", url, links);
            } else {
                println!(
                    "{}: {} links (crawled in {:.3}s)",
                    url, links, result.elapsed_seconds
                );
            }
        }
        CrawlOutcome::Failed(failure) => {
            println!(
                "{}: failed after {:.3}s: {}",
                url, failure.elapsed_seconds, failure.reason
            );
        }
    }
}
