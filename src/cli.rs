// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   spider [-r] [-l DEPTH] [-p PATH] <URL>
//
// Parsing is clap's job; turning the parsed arguments into a CrawlConfig
// (and rejecting seeds we cannot crawl) happens in `Cli::into_config`.
// Every failure at this stage is a usage error and ends the process with
// exit code 1 before anything is fetched.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::{
    CrawlConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_SAVE_DIR, DEFAULT_TIMEOUT_SECS,
};
use crate::crawl::SiteScope;

#[derive(Parser, Debug)]
#[command(
    name = "spider",
    version,
    about = "Crawl a website and download the images it references",
    long_about = "spider fetches a page, collects every <img> it references and saves the images \
                  to a local directory. With -r it also follows links on the same host, up to \
                  -l hops away from the starting page. Existing files are never overwritten."
)]
pub struct Cli {
    /// URL of the page to start from (e.g., https://example.com)
    pub url: String,

    /// Follow links on the same host recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Maximum number of link hops from the starting page (default: 5)
    ///
    /// Only meaningful together with -r.
    #[arg(short = 'l', long = "level", value_name = "DEPTH")]
    pub level: Option<usize>,

    /// Directory to save images into
    #[arg(short = 'p', long = "path", value_name = "PATH", default_value = DEFAULT_SAVE_DIR)]
    pub path: PathBuf,

    /// Maximum number of page fetches in flight at once
    #[arg(
        short = 'c',
        long,
        default_value_t = DEFAULT_CONCURRENCY as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub concurrency: u32,

    /// Per-request timeout in seconds
    #[arg(
        short = 't',
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Print the list of saved images as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Argument problems clap cannot catch on its own.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("cannot crawl '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },
}

impl Cli {
    /// Validates the seed and builds the run configuration.
    pub fn into_config(self) -> Result<CrawlConfig, UsageError> {
        let scope = SiteScope::from_seed(&self.url).map_err(|e| UsageError::InvalidSeed {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let mut config = CrawlConfig::new(self.url, scope);
        config.recursive = self.recursive;
        config.max_depth = self.level.unwrap_or(DEFAULT_MAX_DEPTH);
        config.save_dir = self.path;
        config.concurrency = self.concurrency as usize;
        config.timeout = Duration::from_secs(self.timeout);

        Ok(config)
    }

    /// A depth was given but recursion was not asked for.
    pub fn depth_without_recursion(&self) -> bool {
        self.level.is_some() && !self.recursive
    }
}
