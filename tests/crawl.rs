// tests/crawl.rs
// =============================================================================
// End-to-end crawl tests against a local mockito server.
//
// Every test builds a tiny website out of mocks, crawls it with the real
// engine (real reqwest client, real frontier) and checks the report. No test
// touches the internet.
// =============================================================================

use mockito::{Matcher, Server, ServerGuard};
use site_audit::analyze::ParserKind;
use site_audit::{crawl_with, CrawlJob, CrawlOptions, Crawler, IssueKind, Severity};
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn options(concurrency: usize) -> CrawlOptions {
    CrawlOptions {
        concurrency,
        politeness_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        ..CrawlOptions::default()
    }
}

fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        r#"<html><head><title>{}</title>
        <meta name="viewport" content="width=device-width"></head>
        <body><h1>{}</h1>{}</body></html>"#,
        title, title, anchors
    )
}

async fn serve_html(
    server: &mut ServerGuard,
    path: &str,
    status: usize,
    body: String,
) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create_async()
        .await
}

fn start(server: &ServerGuard) -> String {
    format!("{}/", server.url())
}

#[tokio::test]
async fn test_three_page_site_has_no_orphans() {
    let mut server = Server::new_async().await;
    // A -> B, C; B -> nothing; C -> A
    let _a = serve_html(&mut server, "/", 200, html_page("Home", &["/b", "/c"])).await;
    let _b = serve_html(&mut server, "/b", 200, html_page("Dead end", &[])).await;
    let _c = serve_html(&mut server, "/c", 200, html_page("Loop back", &["/"])).await;

    let report = crawl_with(CrawlJob::new(start(&server)), options(1)).await.unwrap();

    let urls: Vec<_> = report.results.iter().map(|p| p.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            start(&server),
            format!("{}/b", server.url()),
            format!("{}/c", server.url()),
        ]
    );
    assert!(report.orphaned_pages.is_empty());
    assert_eq!(report.summary.orphaned_page_count, 0);
    assert_eq!(report.summary.total_pages, 3);
}

#[tokio::test]
async fn test_max_pages_one_follows_no_links() {
    let mut server = Server::new_async().await;
    let links: Vec<String> = (0..10).map(|i| format!("/page-{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    let _home = serve_html(&mut server, "/", 200, html_page("Home", &link_refs)).await;
    let never = server
        .mock("GET", Matcher::Regex(r"^/page-".to_string()))
        .expect(0)
        .create_async()
        .await;

    let job = CrawlJob::new(start(&server)).with_max_pages(1);
    let report = crawl_with(job, options(4)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].internal_links.len(), 10);
    assert_eq!(report.stats.pages_visited, 1);
    never.assert_async().await;
}

#[tokio::test]
async fn test_page_budget_is_a_hard_cap_under_concurrency() {
    let mut server = Server::new_async().await;
    let links: Vec<String> = (0..12).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    let _home = serve_html(&mut server, "/", 200, html_page("Home", &link_refs)).await;
    let mut mocks = Vec::new();
    for link in &links {
        mocks.push(serve_html(&mut server, link, 200, html_page(link, &link_refs)).await);
    }

    let job = CrawlJob::new(start(&server)).with_max_pages(5);
    let report = crawl_with(job, options(4)).await.unwrap();

    assert_eq!(report.results.len(), 5);
    assert_eq!(report.stats.pages_visited, 5);
    let unique: HashSet<_> = report.results.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn test_server_error_page_is_still_analyzed() {
    let mut server = Server::new_async().await;
    let _home = serve_html(
        &mut server,
        "/",
        500,
        "<html><head><title>Server Error</title></head><body><h1>Oops</h1></body></html>"
            .to_string(),
    )
    .await;

    let report = crawl_with(CrawlJob::new(start(&server)), options(1)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.status_code, 500);
    assert_eq!(page.title, "Server Error");
    assert_eq!(page.h1, vec!["Oops".to_string()]);
    assert!(page.issues.iter().any(|i| i.kind == IssueKind::TitleTooShort));
    assert!(page.issues.iter().all(|i| i.kind != IssueKind::FetchFailed));
}

#[tokio::test]
async fn test_unreachable_start_url_yields_one_degraded_result() {
    // Nothing listens on port 1, so the connection is refused
    let report = crawl_with(CrawlJob::new("http://127.0.0.1:1/"), options(1))
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.status_code, 0);
    assert_eq!(page.word_count, 0);
    assert_eq!(page.issues.len(), 1);
    assert_eq!(page.issues[0].severity, Severity::Critical);
    assert_eq!(page.issues[0].kind, IssueKind::FetchFailed);

    // The start URL is never an orphan, even with no links at all
    assert!(report.orphaned_pages.is_empty());
    assert_eq!(report.summary.issue_breakdown[&Severity::Critical], 1);
}

#[tokio::test]
async fn test_non_html_pages_are_visited_but_not_reported() {
    let mut server = Server::new_async().await;
    let _home = serve_html(
        &mut server,
        "/",
        200,
        html_page("Home", &["/report.pdf", "/about"]),
    )
    .await;
    let _about = serve_html(&mut server, "/about", 200, html_page("About", &["/"])).await;
    let pdf = server
        .mock("GET", "/report.pdf")
        .with_header("content-type", "application/pdf")
        .with_body("%PDF-1.4")
        .expect(1)
        .create_async()
        .await;

    let report = crawl_with(CrawlJob::new(start(&server)), options(2)).await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.stats.skipped_non_html, 1);
    assert_eq!(
        report.stats.pages_visited,
        report.results.len() + report.stats.skipped_non_html
    );
    assert!(report.results.iter().all(|p| !p.url.ends_with(".pdf")));
    pdf.assert_async().await;
}

#[tokio::test]
async fn test_equivalent_urls_are_crawled_once() {
    let mut server = Server::new_async().await;
    let _home = serve_html(
        &mut server,
        "/",
        200,
        html_page("Home", &["/a", "/a/", "/a#part", "#top", "mailto:x@example.com"]),
    )
    .await;
    let a = server
        .mock("GET", "/a")
        .with_header("content-type", "text/html")
        .with_body(html_page("A", &["/", "/a"]))
        .expect(1)
        .create_async()
        .await;

    let report = crawl_with(CrawlJob::new(start(&server)), options(4)).await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].internal_links, vec![format!("{}/a", server.url())]);
    a.assert_async().await;
}

#[tokio::test]
async fn test_external_links_are_recorded_but_never_crawled() {
    let mut server = Server::new_async().await;
    let _home = serve_html(
        &mut server,
        "/",
        200,
        html_page("Home", &["https://elsewhere.example/x", "/local"]),
    )
    .await;
    let _local = serve_html(&mut server, "/local", 200, html_page("Local", &[])).await;

    let job = CrawlJob::new(start(&server)).with_follow_external(true);
    let report = crawl_with(job, options(1)).await.unwrap();
    assert_eq!(report.results.len(), 2);
    assert_eq!(
        report.results[0].external_links,
        vec!["https://elsewhere.example/x".to_string()]
    );

    let report = crawl_with(CrawlJob::new(start(&server)), options(1)).await.unwrap();
    assert!(report.results[0].external_links.is_empty());
}

#[tokio::test]
async fn test_dom_parser_produces_the_same_crawl() {
    let mut server = Server::new_async().await;
    let _a = serve_html(&mut server, "/", 200, html_page("Home", &["/b"])).await;
    let _b = serve_html(&mut server, "/b", 200, html_page("B", &["/"])).await;

    let dom_options = CrawlOptions {
        parser: ParserKind::Dom,
        ..options(1)
    };
    let pattern = crawl_with(CrawlJob::new(start(&server)), options(1)).await.unwrap();
    let dom = crawl_with(CrawlJob::new(start(&server)), dom_options).await.unwrap();

    assert_eq!(pattern.results.len(), dom.results.len());
    for (p, d) in pattern.results.iter().zip(&dom.results) {
        assert_eq!(p.url, d.url);
        assert_eq!(p.title, d.title);
        assert_eq!(p.internal_links, d.internal_links);
        assert_eq!(p.issues.len(), d.issues.len());
    }
}

#[tokio::test]
async fn test_cancelled_crawl_reports_nothing_partial() {
    let mut server = Server::new_async().await;
    let _home = serve_html(&mut server, "/", 200, html_page("Home", &[])).await;

    let token = CancellationToken::new();
    token.cancel();
    let crawler = Crawler::new(CrawlJob::new(start(&server)), options(1)).unwrap();
    let report = crawler.run(token).await;

    assert!(report.stats.cancelled);
    assert!(report.results.is_empty());
    assert_eq!(report.summary.total_pages, 0);
    assert_eq!(report.summary.avg_load_time_ms, 0.0);
}

#[tokio::test]
async fn test_invalid_job_is_rejected() {
    let result = crawl_with(CrawlJob::new("ftp://example.com"), options(1)).await;
    assert!(matches!(result, Err(site_audit::CrawlError::InvalidJob(_))));
}

#[tokio::test]
async fn test_redirect_to_another_origin_keeps_crawling() {
    let mut origin = Server::new_async().await;
    let mut landing = Server::new_async().await;
    let _moved = origin
        .mock("GET", "/")
        .with_status(301)
        .with_header("location", &start(&landing))
        .create_async()
        .await;
    let _home = serve_html(&mut landing, "/", 200, html_page("Home", &["/about"])).await;
    let about = serve_html(&mut origin, "/about", 200, html_page("About", &[])).await;

    let report = crawl_with(CrawlJob::new(start(&origin)), options(1)).await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].url, start(&origin));
    assert_eq!(report.results[0].title, "Home");
    assert_eq!(
        report.results[0].internal_links,
        vec![format!("{}/about", origin.url())]
    );
    assert!(report.results[0].external_links.is_empty());
    assert_eq!(report.results[1].title, "About");
    about.assert_async().await;
}

#[tokio::test]
async fn test_deadline_stops_the_crawl_and_drops_in_flight_pages() {
    let mut server = Server::new_async().await;
    let _slow = server
        .mock("GET", "/")
        .with_header("content-type", "text/html")
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1500));
            w.write_all(html_page("Too late", &[]).as_bytes())
        })
        .create_async()
        .await;

    let deadline_options = CrawlOptions {
        deadline: Some(Duration::from_millis(50)),
        ..options(1)
    };
    let report = crawl_with(CrawlJob::new(start(&server)), deadline_options)
        .await
        .unwrap();

    assert!(report.stats.cancelled);
    assert_eq!(report.stats.pages_visited, 1);
    assert!(report.results.is_empty());
    assert_eq!(report.summary.total_pages, 0);
}

#[tokio::test]
async fn test_timed_out_page_yields_one_degraded_result() {
    let mut server = Server::new_async().await;
    let _slow = server
        .mock("GET", "/")
        .with_header("content-type", "text/html")
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1000));
            w.write_all(html_page("Too late", &[]).as_bytes())
        })
        .create_async()
        .await;

    let timeout_options = CrawlOptions {
        request_timeout: Duration::from_millis(100),
        ..options(1)
    };
    let report = crawl_with(CrawlJob::new(start(&server)), timeout_options)
        .await
        .unwrap();

    assert!(!report.stats.cancelled);
    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.status_code, 0);
    assert_eq!(page.issues.len(), 1);
    assert_eq!(page.issues[0].severity, Severity::Critical);
    assert_eq!(page.issues[0].kind, IssueKind::FetchFailed);
    assert!(page.issues[0].message.contains("timed out"));
}
