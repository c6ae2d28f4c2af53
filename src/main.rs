//! corpress main entry point
//!
//! This is the command-line interface for building corpora from WordPress
//! REST APIs.

use anyhow::{bail, Context};
use clap::Parser;
use corpress::config::{load_config, Config};
use corpress::{Pipeline, RunReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// corpress: build text corpora from a WordPress site's REST API
///
/// corpress finds the site's REST endpoint for posts or pages, downloads
/// every page of results with a pause between requests, and converts the
/// records into text files or a CSV table.
#[derive(Parser, Debug)]
#[command(name = "corpress")]
#[command(version)]
#[command(about = "Build text corpora from WordPress REST APIs", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without any requests
    #[arg(long, conflicts_with_all = ["resolve_only", "build_only"])]
    dry_run: bool,

    /// Resolve the REST endpoint, print it and exit
    #[arg(long, conflicts_with_all = ["dry_run", "build_only"])]
    resolve_only: bool,

    /// Build the corpus from previously downloaded JSON pages
    #[arg(long, conflicts_with_all = ["dry_run", "resolve_only"])]
    build_only: bool,

    /// Print the run report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.json {
        config.output.show_report = false;
    }

    let pipeline = Pipeline::new(config).context("Failed to build HTTP client")?;

    if cli.resolve_only {
        let endpoint = pipeline.resolve().await?;
        println!("{} ({})", endpoint, endpoint.source);
        return Ok(());
    }

    let report = if cli.build_only {
        pipeline.build_only()?
    } else {
        pipeline.run().await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    finish(&report)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "corpress=info,warn",
            1 => "corpress=debug,info",
            _ => "corpress=trace,debug",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== corpress Dry Run ===\n");

    println!("Site:");
    println!("  URL: {}", config.site.url);
    println!("  Content type: {}", config.site.content_type);
    println!("  Headers: {}", config.site.headers.len());

    println!("\nRequests:");
    println!("  Delay between requests: {}s", config.request.delay_seconds.max(1));
    match config.request.max_pages {
        Some(max_pages) => println!("  Max pages: {}", max_pages),
        None => println!("  Max pages: all"),
    }
    println!("  Timeout: {}s", config.request.timeout_seconds);
    for (key, value) in config.query_params() {
        println!("  Param: {}={}", key, value);
    }

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    for (label, path) in [
        ("JSON", &config.output.json_path),
        ("Corpus", &config.output.corpus_path),
        ("Table", &config.output.table_path),
    ] {
        if let Some(path) = path {
            println!("  {}: {}", label, path.display());
        }
    }
    println!("  Include title: {}", config.output.include_title);

    println!("\n✓ Configuration is valid");
}

fn finish(report: &RunReport) -> anyhow::Result<()> {
    if report.succeeded() {
        tracing::info!(
            "Corpus created with {} texts",
            report.corpus_texts_count
        );
        Ok(())
    } else {
        bail!("Run stopped before the corpus was created; see the log for details")
    }
}
