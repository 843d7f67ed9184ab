// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every flag maps onto either the CrawlJob (what to crawl) or CrawlOptions
// (how to crawl it). Defaults come from the library constants so the CLI
// and the library can never disagree.
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};
use site_audit::analyze::ParserKind;
use site_audit::crawl::{
    CrawlJob, CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_MAX_PAGES, DEFAULT_USER_AGENT,
};
use site_audit::Severity;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "site-audit",
    version,
    about = "Crawl a website, audit on-page SEO and find orphaned pages",
    long_about = "site-audit crawls a website breadth-first, checks every page against a fixed \
                  set of SEO rules and reports pages that no other page on the site links to. \
                  It's meant for CI pipelines as much as for ad hoc audits."
)]
pub struct Cli {
    /// Log every page as it is crawled (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a site and audit every page
    ///
    /// Example: site-audit crawl https://example.com --max-pages 100
    Crawl(CrawlArgs),
}

#[derive(clap::Args, Debug)]
pub struct CrawlArgs {
    /// Website URL to start from (e.g., https://example.com)
    pub start_url: String,

    /// Maximum number of pages to visit
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Record external links on each page (they are never crawled)
    #[arg(long)]
    pub follow_external: bool,

    /// Number of pages fetched in parallel
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Minimum delay between fetch starts, in milliseconds (0 disables it)
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Stop the whole crawl after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// How HTML is read: regex patterns or a full DOM parse
    #[arg(long, value_enum, default_value_t = ParserArg::Pattern)]
    pub parser: ParserArg,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// With --json, print every result instead of the first 20
    #[arg(long)]
    pub full: bool,

    /// Also write the full report (with the link graph) to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Exit with code 1 when any issue at or above this severity is found
    #[arg(long, value_enum, default_value_t = FailOn::Critical)]
    pub fail_on: FailOn,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserArg {
    Pattern,
    Dom,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Low,
    Medium,
    High,
    Critical,
    /// Always exit 0 unless something went wrong
    Never,
}

impl FailOn {
    pub fn threshold(self) -> Option<Severity> {
        match self {
            FailOn::Low => Some(Severity::Low),
            FailOn::Medium => Some(Severity::Medium),
            FailOn::High => Some(Severity::High),
            FailOn::Critical => Some(Severity::Critical),
            FailOn::Never => None,
        }
    }
}

impl CrawlArgs {
    pub fn job(&self) -> CrawlJob {
        CrawlJob::new(self.start_url.clone())
            .with_max_pages(self.max_pages)
            .with_follow_external(self.follow_external)
    }

    pub fn options(&self) -> CrawlOptions {
        CrawlOptions {
            concurrency: self.concurrency,
            politeness_delay: Duration::from_millis(self.delay_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            deadline: self.deadline_secs.map(Duration::from_secs),
            parser: match self.parser {
                ParserArg::Pattern => ParserKind::Pattern,
                ParserArg::Dom => ParserKind::Dom,
            },
        }
    }
}
