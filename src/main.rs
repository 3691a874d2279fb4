// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse and validate command-line arguments (any problem -> exit code 1)
// 2. Crawl the site, collecting image URLs
// 3. Download the collected images once the crawl has fully finished
// 4. Print what was saved and exit with code 0
//
// Individual fetch or write failures are logged and never change the exit
// code. Only argument validation (1) and internal setup errors (2) do: an
// HTTP client that cannot be built, or a report that cannot be serialized.
// =============================================================================

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::warn;

use spider::cli::Cli;
use spider::config::CrawlConfig;
use spider::crawl::Crawler;
use spider::download::{DownloadResult, Downloader};
use spider::extract::HtmlExtractor;
use spider::fetch::HttpFetcher;
use spider::logging;

/// Exit code after a completed run
const EXIT_OK: i32 = 0;
/// Exit code for bad arguments
const EXIT_USAGE: i32 = 1;
/// Exit code when setup fails before the crawl can start
const EXIT_INTERNAL: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also come through here, on stdout
            let _ = e.print();
            std::process::exit(if e.use_stderr() { EXIT_USAGE } else { EXIT_OK });
        }
    };

    logging::init_logging();

    if cli.depth_without_recursion() {
        warn!("a depth was given without -r; proceeding without recursive crawl");
    }

    let json = cli.json;
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    std::process::exit(exit_code(run(&config, json).await));
}

// Maps the outcome of a run that got past argument validation to an exit code
fn exit_code(outcome: Result<()>) -> i32 {
    match outcome {
        Ok(()) => EXIT_OK,
        Err(e) => {
            tracing::error!("{:#}", e);
            EXIT_INTERNAL
        }
    }
}

async fn run(config: &CrawlConfig, json: bool) -> Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(config.timeout)?);

    let crawler = Crawler::new(config, Arc::clone(&fetcher), HtmlExtractor::new());
    let summary = crawler.run().await;

    let downloader = Downloader::new(fetcher, &config.save_dir);
    let saved = downloader.download_all(&summary.images).await;

    print_results(&saved, summary.pages_visited, summary.images.len(), json)
}

// Prints the saved images either as a table or JSON
fn print_results(saved: &[DownloadResult], pages: usize, found: usize, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(saved)?);
        return Ok(());
    }

    println!("{:<60} {}", "IMAGE", "SAVED AS");
    println!("{}", "=".repeat(100));

    for result in saved {
        // Truncate long URLs so the columns stay aligned
        let url_display = if result.source_url.chars().count() > 57 {
            let head: String = result.source_url.chars().take(57).collect();
            format!("{}...", head)
        } else {
            result.source_url.clone()
        };

        println!("{:<60} {}", url_display, result.local_path.display());
    }

    println!();
    println!("Summary:");
    println!("   Pages crawled: {}", pages);
    println!("   Images found:  {}", found);
    println!("   Images saved:  {}", saved.len());

    Ok(())
}
