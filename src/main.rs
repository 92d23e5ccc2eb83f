//! Listing Harvester main entry point
//!
//! This is the command-line interface for the resumable catalog harvester.

use clap::Parser;
use listing_harvester::config::{load_config_with_hash, Config};
use listing_harvester::crawler::run_crawl;
use listing_harvester::output::print_summary;
use listing_harvester::state::{JsonStateStore, StateStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing Harvester: a resumable real-estate catalog crawler
///
/// Walks the catalog one page at a time, appends every listing to a CSV
/// dataset and remembers the next page to visit, so running it again picks up
/// where the last run stopped.
#[derive(Parser, Debug)]
#[command(name = "listing-harvester")]
#[command(version)]
#[command(about = "A resumable real-estate catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start again from the first page, ignoring the saved cursor
    #[arg(long)]
    fresh: bool,

    /// Show the configuration and the saved cursor without crawling
    #[arg(long, conflicts_with = "fresh")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(&config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvester=info,warn"),
            1 => EnvFilter::new("listing_harvester=debug,info"),
            2 => EnvFilter::new("listing_harvester=trace,debug"),
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

/// Handles the --dry-run mode: shows what a crawl would do
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Listing Harvester Dry Run ===\n");

    println!("Catalog:");
    println!("  URL template: {}", config.catalog.url_template);
    println!("  Page limit: {}", config.catalog.max_pages);
    println!("  Settle window: {}ms", config.catalog.settle_ms);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Cursor file: {}", config.output.state_path);
    println!("  Dataset: {}", config.output.dataset_path);

    let store = JsonStateStore::new(&config.output.state_path);
    match store.peek()? {
        Some(state) => println!("\n✓ Would resume from {}", state),
        None => println!("\n✓ No cursor file yet, would start from page 1"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    if fresh {
        tracing::info!("Starting fresh crawl (resetting the saved cursor)");
        JsonStateStore::new(&config.output.state_path).reset()?;
    }

    match run_crawl(config).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            if !summary.reached_end() {
                println!("\nRun again to continue from page {}", summary.next_page);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
