// src/crawl/engine.rs
// =============================================================================
// This module implements the site crawl: a bounded breadth-first traversal.
//
// How it works:
// 1. The frontier starts with the normalized start URL
// 2. Up to `concurrency` URLs are taken off the frontier and fetched
// 3. Each finished fetch is analyzed (SEO rules + link extraction)
// 4. Internal links are offered back to the frontier
// 5. Repeat until the frontier is empty or `max_pages` URLs were visited
// 6. Orphan detection and the summary run once over all results
//
// Failure isolation:
// - A fetch error becomes a degraded PageResult (status 0, one critical
//   issue). The loop keeps going.
// - A non-HTML response counts as visited but produces no result.
//
// Concurrency:
// - Only this loop touches the frontier, so "take next URL and mark it
//   visited" can never race, even with many fetches in flight.
// - max_pages is checked against the visited count before every dispatch,
//   so it is a hard cap.
// - A shared throttle spaces fetch starts by the politeness delay.
//
// Rust concepts:
// - FuturesUnordered: a set of futures polled together, yielding results
//   in completion order
// - tokio::select!: wait for whichever happens first (a fetch finishing,
//   cancellation, the deadline)
// =============================================================================

use super::throttle::Throttle;
use super::{normalize, CrawlJob, CrawlOptions, Frontier};
use crate::analyze::{analyze_with, HtmlSignals, LinkExtractor};
use crate::error::CrawlError;
use crate::fetch::{FetchedPage, Fetcher};
use crate::report::{CrawlReport, CrawlStats, PageResult};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// One crawl. Owns every piece of mutable crawl state; nothing is global,
/// so independent crawlers can run side by side.
pub struct Crawler {
    job: CrawlJob,
    start_url: String,
    options: CrawlOptions,
    fetcher: Fetcher,
    extractor: Box<dyn HtmlSignals>,
    links: LinkExtractor,
    frontier: Frontier,
}

impl Crawler {
    /// Validates the job and prepares the HTTP client.
    ///
    /// Job-level problems (bad start URL, zero page budget) surface here,
    /// before any request is made.
    pub fn new(job: CrawlJob, options: CrawlOptions) -> Result<Self, CrawlError> {
        let start = job.validate()?;
        let fetcher = Fetcher::new(&options)?;
        let start_url = normalize(start.as_str());

        Ok(Crawler {
            links: LinkExtractor::new(&start, job.follow_external),
            frontier: Frontier::new(&start_url),
            extractor: options.parser.extractor(),
            start_url,
            job,
            options,
            fetcher,
        })
    }

    /// Runs the crawl to completion, or until `cancel` fires or the deadline
    /// passes. Fetches still in flight at that point are dropped and never
    /// reach the report.
    pub async fn run(self, cancel: CancellationToken) -> CrawlReport {
        let Crawler {
            job,
            start_url,
            options,
            fetcher,
            extractor,
            links,
            mut frontier,
        } = self;

        let throttle = Throttle::new(options.politeness_delay);
        let concurrency = options.concurrency.max(1);
        let deadline_after = options.deadline;
        let deadline = async move {
            match deadline_after {
                Some(after) => tokio::time::sleep(after).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut results: Vec<PageResult> = Vec::new();
        let mut stats = CrawlStats::default();
        let mut in_flight = FuturesUnordered::new();

        info!(
            start_url = start_url.as_str(),
            max_pages = job.max_pages,
            concurrency,
            "starting crawl"
        );

        loop {
            // Top up the worker pool
            while in_flight.len() < concurrency && frontier.visited_len() < job.max_pages {
                let Some(url) = frontier.next() else {
                    break;
                };
                debug!(url = url.as_str(), "dispatching fetch");
                let fetcher = &fetcher;
                let throttle = &throttle;
                in_flight.push(async move {
                    throttle.wait().await;
                    let outcome = fetcher.fetch(&url).await;
                    (url, outcome)
                });
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    warn!(in_flight = in_flight.len(), "crawl cancelled");
                    stats.cancelled = true;
                    break;
                }
                _ = &mut deadline => {
                    warn!(in_flight = in_flight.len(), "crawl deadline reached");
                    stats.cancelled = true;
                    break;
                }
                Some((url, outcome)) = in_flight.next() => match outcome {
                    Ok(page) if !page.is_html() => {
                        debug!(
                            url = url.as_str(),
                            content_type = page.content_type.as_str(),
                            "skipping non-HTML page"
                        );
                        stats.skipped_non_html += 1;
                    }
                    Ok(page) => {
                        let result = page_result(url, page, &*extractor, &links);
                        for link in &result.internal_links {
                            frontier.offer(link);
                        }
                        debug!(
                            url = result.url.as_str(),
                            status = result.status_code,
                            issues = result.issues.len(),
                            queued = frontier.queued_len(),
                            "analyzed page"
                        );
                        results.push(result);
                    }
                    Err(error) => {
                        warn!(url = url.as_str(), %error, "failed to fetch page");
                        results.push(PageResult::failed(url, &error));
                    }
                },
            }
        }
        drop(in_flight);

        stats.pages_visited = frontier.visited_len();
        info!(
            pages = results.len(),
            visited = stats.pages_visited,
            skipped = stats.skipped_non_html,
            dropped = frontier.queued_len(),
            cancelled = stats.cancelled,
            "crawl finished"
        );

        CrawlReport::build(start_url, results, stats)
    }
}

// Turns a fetched HTML page into its PageResult.
fn page_result(
    url: String,
    page: FetchedPage,
    extractor: &dyn HtmlSignals,
    links: &LinkExtractor,
) -> PageResult {
    let analysis = analyze_with(extractor, &page.body, page.load_time_ms);
    let signals = analysis.signals;
    let base = link_base(&url, &page.final_url);
    if base != page.final_url {
        debug!(
            url = url.as_str(),
            final_url = page.final_url.as_str(),
            "redirected off origin, resolving links on the requested origin"
        );
    }
    let page_links = links.extract(&base, &signals.hrefs);

    PageResult {
        url,
        status_code: page.status_code,
        title: signals.title.unwrap_or_default(),
        meta_description: signals.meta_description.unwrap_or_default(),
        h1: signals.h1,
        h2_count: signals.h2_count,
        h3_count: signals.h3_count,
        word_count: signals.word_count,
        internal_links: page_links.internal,
        external_links: page_links.external,
        image_count: signals.image_count,
        images_missing_alt: signals.images_missing_alt,
        canonical: signals.canonical,
        robots_meta: signals.robots_meta,
        has_viewport: signals.has_viewport,
        load_time_ms: page.load_time_ms,
        content_type: page.content_type,
        issues: analysis.issues,
    }
}

// Base URL for a page's relative links.
//
// A same-origin redirect keeps the URL the server answered from, trailing
// slash included, so `post` on `/blog/` resolves to `/blog/post`. A redirect
// to another origin (http -> https, apex -> www) keeps the landed path but
// puts it back on the requested origin, so `/about` stays an internal link.
fn link_base(requested: &str, final_url: &str) -> String {
    let (Ok(requested_url), Ok(landed)) = (Url::parse(requested), Url::parse(final_url)) else {
        return requested.to_string();
    };
    if landed.origin() == requested_url.origin() {
        return landed.into();
    }

    let mut path = landed.path().to_string();
    if let Some(query) = landed.query() {
        path.push('?');
        path.push_str(query);
    }
    requested_url
        .join(&path)
        .map(String::from)
        .unwrap_or_else(|_| requested_url.into())
}

/// Crawls with default engine options.
pub async fn crawl(job: CrawlJob) -> Result<CrawlReport, CrawlError> {
    crawl_with(job, CrawlOptions::default()).await
}

pub async fn crawl_with(job: CrawlJob, options: CrawlOptions) -> Result<CrawlReport, CrawlError> {
    let crawler = Crawler::new(job, options)?;
    Ok(crawler.run(CancellationToken::new()).await)
}
