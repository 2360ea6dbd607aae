//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use portal_crawler::config::Config;
use portal_crawler::crawler::{run_crawl, Coordinator};
use portal_crawler::output::load_summary;
use portal_crawler::state::{CrawlPhase, PageOutcome};
use portal_crawler::storage::{load_records, load_run};
use portal_crawler::url::{normalize_url, PageKind};
use portal_crawler::CrawlerError;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server, writing into `temp`
fn create_test_config(server: &MockServer, temp: &TempDir) -> Config {
    let mut config = Config::for_site(&format!("{}/", server.uri()));
    config.crawler.request_delay_ms = 0;
    config.crawler.sitemap_delay_ms = 0;
    config.crawler.sitemap_timeout_secs = 5;
    config.crawler.page_timeout_secs = 5;

    let out = |name: &str| temp.path().join(name).to_string_lossy().into_owned();
    config.output.pages_dir = out("pages");
    config.output.index_path = out("index.db");
    config.output.summary_path = out("summary.md");
    config.output.log_path = out("crawler.log");
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/xml")
}

async fn mount_page(server: &MockServer, at: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html_page(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn read_log(temp: &TempDir) -> String {
    std::fs::read_to_string(temp.path().join("crawler.log")).unwrap_or_default()
}

#[tokio::test]
async fn test_single_step_end_to_end() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    // No sitemap: the server answers 404
    mount_page(
        &server,
        "/",
        r#"<a href="/post-1">Post</a><a href="/image.png">Image</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/post-1/", "post", 0).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    coordinator.seed().await.unwrap();
    assert_eq!(coordinator.seed_count(), 1);

    let outcome = coordinator.step().await.unwrap();
    assert_eq!(outcome, Some(PageOutcome::Processed { id: 1 }));

    assert_eq!(coordinator.visited_count(), 1);
    assert_eq!(
        coordinator.frontier_snapshot(),
        vec![normalize_url(&format!("{}/post-1", server.uri()))]
    );

    let records = coordinator.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.url, format!("{}/", server.uri()));
    assert_eq!(record.file, "index.html");
    assert_eq!(record.path, "/");
    assert_eq!(record.kind, PageKind::Index);
    assert!(record.from_sitemap);
    assert_eq!(record.links_found, 2);
    assert_eq!(record.new_links_added, 1);

    let stored = std::fs::read_to_string(temp.path().join("pages").join("index.html")).unwrap();
    assert!(stored.contains("/post-1"));
}

#[tokio::test]
async fn test_sitemap_index_with_failing_sub_sitemap() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>{base}/sitemap-a.xml</loc></sitemap>
                <sitemap><loc>{base}/sitemap-b.xml</loc></sitemap>
            </sitemapindex>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-a.xml"))
        .respond_with(xml(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>{base}/one</loc></url>
                <url><loc>{base}/two/</loc></url>
                <url><loc>{base}/three?utm=x</loc></url>
            </urlset>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-b.xml"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    coordinator.seed().await.unwrap();

    assert_eq!(coordinator.seed_count(), 4);
    let queued: HashSet<String> = coordinator
        .frontier_snapshot()
        .into_iter()
        .map(|u| u.into_string())
        .collect();
    for expected in ["/", "/one/", "/two/", "/three/"] {
        assert!(
            queued.contains(&format!("{}{}", base, expected)),
            "missing seed {}",
            expected
        );
    }

    let log = read_log(&temp);
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("sitemap-b.xml"));
    assert!(!log.contains("sitemap-a.xml"));
}

#[tokio::test]
async fn test_missing_sitemap_is_logged_and_crawl_continues() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(&server, "/", "home", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.seed_count, 1);
    assert_eq!(report.records.len(), 1);
    assert!(read_log(&temp).contains("404"));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a><a href="/d">D</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a/", "a", 1).await;
    for unreached in ["/b/", "/c/", "/d/"] {
        mount_page(&server, unreached, "never", 0).await;
    }

    let mut config = create_test_config(&server, &temp);
    config.crawler.max_pages = 2;

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.queue_remaining, 3);
}

#[tokio::test]
async fn test_url_variants_fetched_once() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r##"
            <a href="/x">1</a>
            <a href="/x/">2</a>
            <a href="/x?ref=nav">3</a>
            <a href="/x#comments">4</a>
            <a href="/y">5</a>
        "##,
        1,
    )
    .await;
    mount_page(&server, "/x/", r#"<a href="/">Home</a><a href="/y/">Y</a>"#, 1).await;
    mount_page(&server, "/y/", r#"<a href="/x">X</a>"#, 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.queue_remaining, 0);

    let root = &report.records[0];
    assert_eq!(root.links_found, 2);
    assert_eq!(root.new_links_added, 2);
    assert_eq!(report.records[1].new_links_added, 0);
}

#[tokio::test]
async fn test_host_and_extension_filters() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"
            <a href="http://other.invalid/page">Elsewhere</a>
            <a href="/files/report.PDF">Report</a>
            <a href="/style.css">CSS</a>
            <a href="/ok">OK</a>
        "#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/report.PDF"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/ok/", "fine", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![format!("{}/", server.uri()), format!("{}/ok/", server.uri())]
    );
    assert_eq!(report.records[0].links_found, 4);
    assert_eq!(report.records[0].new_links_added, 1);
}

#[tokio::test]
async fn test_non_html_and_http_errors_produce_no_record() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/data">Data</a><a href="/missing">Missing</a><a href="/ok">OK</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok/", "fine", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_visited, 4);
    let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(report.records[1].url, format!("{}/ok/", server.uri()));
    assert!(!temp.path().join("pages").join("data.html").exists());
}

#[tokio::test]
async fn test_timeout_is_logged_and_skipped() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/slow">Slow</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(html_page("late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, &temp);
    config.crawler.page_timeout_secs = 1;

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.pages_visited, 2);

    let log = read_log(&temp);
    assert!(log
        .lines()
        .any(|line| line.contains("Timeout") && line.contains("/slow/")));
}

#[tokio::test]
async fn test_from_sitemap_flag() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>{base}/seeded</loc></url>
            </urlset>"#
        )))
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/found">Found</a>"#, 1).await;
    mount_page(&server, "/seeded/", r#"<a href="/found/">Found</a>"#, 1).await;
    mount_page(&server, "/found/", "leaf", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    let flags: Vec<(String, bool)> = report
        .records
        .iter()
        .map(|r| (r.path.clone(), r.from_sitemap))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("/".to_string(), true),
            ("/seeded/".to_string(), true),
            ("/found/".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_metadata_and_classification_recorded() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/author/jane">Jane</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/author/jane/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head>
                        <title>Jane Doe</title>
                        <meta name="author" content="Jane Doe">
                        <meta property="og:description" content="Columnist">
                    </head><body><a rel="category tag" href="/category/news/">News</a></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/category/news/", "news", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    let author_page = &report.records[1];
    assert_eq!(author_page.kind, PageKind::Author);
    assert_eq!(author_page.title, "Jane Doe");
    assert_eq!(author_page.author, "Jane Doe");
    assert_eq!(author_page.category, "News");
    assert_eq!(author_page.description, "Columnist");
    assert_eq!(author_page.file, "author_jane.html");
    assert_eq!(report.records[2].kind, PageKind::Category);
}

#[tokio::test]
async fn test_filename_collision_is_renamed() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/a/b">1</a><a href="/a_b">2</a>"#, 1).await;
    mount_page(&server, "/a/b/", "nested", 1).await;
    mount_page(&server, "/a_b/", "flat", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    let report = coordinator.run().await.unwrap();

    let files: Vec<&str> = report.records.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(files, vec!["index.html", "a_b.html", "a_b-2.html"]);

    let pages = temp.path().join("pages");
    assert!(std::fs::read_to_string(pages.join("a_b.html"))
        .unwrap()
        .contains("nested"));
    assert!(std::fs::read_to_string(pages.join("a_b-2.html"))
        .unwrap()
        .contains("flat"));
    assert!(read_log(&temp).contains("a_b-2.html"));
}

#[tokio::test]
async fn test_concurrent_fetches_assign_gap_free_ids() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    let links: String = (1..=10)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links, 1).await;
    for i in 1..=10 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}/", i)))
            .respond_with(
                html_page(r#"<a href="/">Home</a>"#).set_delay(Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&server, &temp);
    config.crawler.max_concurrent_fetches = 4;

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();

    let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=11).collect::<Vec<u64>>());

    let urls: HashSet<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls.len(), 11);
    assert_eq!(report.pages_visited, 11);
}

#[tokio::test]
async fn test_idle_fetch_loops_wake_for_late_links() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    // Only one URL is claimable at first; the other loops wait until /hub/
    // finishes and enqueues its links
    mount_page(&server, "/", r#"<a href="/hub">Hub</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/hub/"))
        .respond_with(
            html_page(r#"<a href="/left">L</a><a href="/right">R</a>"#)
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/left/", "left", 1).await;
    mount_page(&server, "/right/", "right", 1).await;

    let mut config = create_test_config(&server, &temp);
    config.crawler.max_concurrent_fetches = 3;

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = tokio::time::timeout(Duration::from_secs(10), coordinator.run())
        .await
        .expect("crawl did not finish")
        .unwrap();

    assert_eq!(report.records.len(), 4);
    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.queue_remaining, 0);
    let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_step_after_done_is_rejected() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_page(&server, "/", "home", 1).await;

    let mut coordinator = Coordinator::new(create_test_config(&server, &temp)).unwrap();
    coordinator.run().await.unwrap();

    let err = coordinator.step().await.unwrap_err();
    assert!(matches!(
        err,
        CrawlerError::InvalidPhase {
            expected: CrawlPhase::Running,
            actual: CrawlPhase::Done
        }
    ));
    assert!(coordinator.run().await.is_err());
}

#[tokio::test]
async fn test_run_crawl_exports_index_and_summary() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/post">Post</a>"#, 1).await;
    mount_page(&server, "/post/", "post", 1).await;

    let config = create_test_config(&server, &temp);
    let report = run_crawl(config, "cafebabe").await.unwrap();

    let index_path = temp.path().join("index.db");
    assert_eq!(load_records(&index_path).unwrap(), report.records);

    let run = load_run(&index_path).unwrap().unwrap();
    assert_eq!(run.config_hash, "cafebabe");
    assert_eq!(run.pages_visited, 2);
    assert_eq!(run.base_url, format!("{}/", server.uri()));

    let summary = load_summary(&index_path).unwrap();
    assert_eq!(summary.total_crawled, 2);
    assert_eq!(summary.from_sitemap, 1);
    assert_eq!(summary.from_links, 1);

    let markdown = std::fs::read_to_string(temp.path().join("summary.md")).unwrap();
    assert!(markdown.contains("- **Pages Crawled**: 2"));
}
