// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Run the crawl through the library
// 4. Print a table or JSON, optionally save the full report to a file
// 5. Exit with proper code (0 = clean, 1 = issues at/above --fail-on, 2 = error)
//
// The binary is the "calling service" for the crawl engine: it validates
// nothing itself, owns output/persistence, and leaves everything else to
// site_audit::crawl_with().
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use site_audit::{crawl_with, CrawlReport, PageResult, Severity};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of results shown in the JSON preview.
const PREVIEW_LIMIT: usize = 20;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole anyhow context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable.
// RUST_LOG wins over --verbose when it is set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "site_audit=debug" } else { "site_audit=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    let job = args.job();
    let options = args.options();
    info!(start_url = job.start_url.as_str(), max_pages = job.max_pages, "auditing site");

    let report = crawl_with(job, options).await?;

    if let Some(path) = &args.output {
        save_report(&report, path)?;
        info!(path = %path.display(), "full report written");
    }

    print_results(&report, args.json, args.full)?;

    let failing = args
        .fail_on
        .threshold()
        .map(|threshold| report.count_at_least(threshold))
        .unwrap_or(0);

    if failing > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Persists the full report plus the link graph as pretty JSON.
fn save_report(report: &CrawlReport, path: &std::path::Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;

    let document = serde_json::json!({
        "report": report,
        "linkGraph": report.link_graph(),
    });
    serde_json::to_writer_pretty(BufWriter::new(file), &document)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

// Prints the results either as a table or JSON
fn print_results(report: &CrawlReport, json: bool, full: bool) -> Result<()> {
    if json {
        let output = if full {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string_pretty(&report.preview(PREVIEW_LIMIT))?
        };
        println!("{}", output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(report: &CrawlReport) {
    println!(
        "{:<60} {:<7} {:<7} {:<7} {:<10}",
        "URL", "STATUS", "WORDS", "ISSUES", "WORST"
    );
    println!("{}", "=".repeat(95));

    for page in &report.results {
        println!(
            "{:<60} {:<7} {:<7} {:<7} {:<10}",
            truncate(&page.url, 57),
            format_status(page),
            page.word_count,
            page.issues.len(),
            page.worst_severity().map(|s| s.as_str()).unwrap_or("-"),
        );
    }
    println!();

    if !report.orphaned_pages.is_empty() {
        println!("🔗 Orphaned pages (no internal links point here):");
        for page in &report.orphaned_pages {
            println!("   {}", page.url);
        }
        println!();
    }

    let summary = &report.summary;
    println!("📊 Summary:");
    println!("   📄 Pages: {}", summary.total_pages);
    println!("   ⚠️  Pages with issues: {}", summary.pages_with_issues);
    println!("   🔗 Orphaned pages: {}", summary.orphaned_page_count);
    println!("   📝 Avg words: {:.0}", summary.avg_word_count);
    println!("   ⏱️  Avg load time: {:.0}ms", summary.avg_load_time_ms);
    println!("   📋 Total issues: {}", summary.total_issues);
    for severity in Severity::ALL {
        let count = summary.issue_breakdown.get(&severity).copied().unwrap_or(0);
        println!("      {:<9} {}", severity.as_str(), count);
    }
    if report.stats.skipped_non_html > 0 {
        println!("   ⏭️  Skipped (not HTML): {}", report.stats.skipped_non_html);
    }
    if report.stats.cancelled {
        println!("   ⛔ Crawl stopped early; results are partial");
    }
}

// Truncate long URLs for display, on a char boundary
fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        format!("{}...", url.chars().take(max).collect::<String>())
    } else {
        url.to_string()
    }
}

fn format_status(page: &PageResult) -> String {
    if page.status_code == 0 {
        "FAILED".to_string()
    } else {
        page.status_code.to_string()
    }
}
