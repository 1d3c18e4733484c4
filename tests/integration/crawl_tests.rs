//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use jobscript_harvester::config::{Config, CrawlerConfig};
use jobscript_harvester::crawler::crawl;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and no backoff
fn create_test_config(page_budget: usize, concurrency: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            page_budget,
            concurrency,
            fetch_timeout_ms: 2_000,
            fetch_retries: 2,
            retry_backoff_ms: 0,
        },
        ..Config::default()
    }
}

fn html_page(body: impl Into<String>) -> ResponseTemplate {
    let body: String = body.into();
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

#[tokio::test]
async fn test_same_origin_links_followed_and_emails_collected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body>
            <a href="/about">About</a>
            <a href="mailto:x@y.com">Mail us</a>
            <p>contact: jane@example.com</p>
            <a href="https://other.com/x">Elsewhere</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(
            "<html><body>Recruiting: careers@example.com</body></html>",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(100, 5))
        .await
        .expect("Crawl failed");

    assert!(outcome.emails.contains(&"jane@example.com".to_string()));
    assert!(outcome.emails.contains(&"careers@example.com".to_string()));
    // The mailto href text itself fits the pattern
    assert!(outcome.emails.contains(&"x@y.com".to_string()));

    // Start page and /about only; the other.com link never entered the frontier
    assert_eq!(outcome.stats.pages_claimed, 2);
    assert_eq!(outcome.stats.links_enqueued, 1);
}

#[tokio::test]
async fn test_page_budget_of_one_fetches_only_start_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/a">A</a><a href="/b">B</a> hello@example.com"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/(a|b)$"))
        .respond_with(html_page("never"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(1, 5))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.emails, vec!["hello@example.com".to_string()]);
    assert_eq!(outcome.stats.pages_claimed, 1);
    assert_eq!(outcome.stats.links_enqueued, 0);
}

#[tokio::test]
async fn test_start_url_timing_out_yields_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("too late: late@example.com").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(100, 5);
    config.crawler.fetch_timeout_ms = 200;

    let outcome = crawl(&mock_server.uri(), &config)
        .await
        .expect("A failed start page is not an invocation error");

    assert!(outcome.emails.is_empty());
    assert_eq!(outcome.stats.pages_claimed, 1);
    assert_eq!(outcome.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_budget_respected_under_heavy_fan_out() {
    let mock_server = MockServer::start().await;

    let links: String = (0..50)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();

    Mock::given(method("GET"))
        .respond_with(html_page(format!("<html><body>{}</body></html>", links)))
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(10, 5))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.stats.pages_claimed, 10);

    let requests = mock_server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 10);

    // Every request hit a distinct URL
    let mut paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 10);
}

#[tokio::test]
async fn test_each_url_processed_once_and_emails_deduplicated() {
    let mock_server = MockServer::start().await;

    let page = r#"<html><body>
        <a href="/">Home</a><a href="/a">A</a><a href="/b">B</a>
        Write to team@example.com
        </body></html>"#;

    for route in ["/", "/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html_page(page))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let outcome = crawl(&mock_server.uri(), &create_test_config(100, 5))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.emails, vec!["team@example.com".to_string()]);
    assert_eq!(outcome.stats.pages_claimed, 3);
    assert_eq!(outcome.stats.pages_extracted, 3);
}

#[tokio::test]
async fn test_binary_links_never_fetched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/files/brochure.pdf">Brochure</a>
               <a href="/img/logo.PNG">Logo</a>
               <a href="/jobs">Jobs</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(html_page("jobs@example.com"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/(files|img)/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("binary", "application/pdf"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(100, 3))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.emails, vec!["jobs@example.com".to_string()]);
    assert_eq!(outcome.stats.pages_claimed, 4);
    assert_eq!(outcome.stats.binary_skipped, 2);
}

#[tokio::test]
async fn test_failing_page_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/broken">A</a><a href="/good">B</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(html_page("hr@example.com"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(100, 2))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.emails, vec!["hr@example.com".to_string()]);
    assert_eq!(outcome.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_non_html_responses_contribute_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/api/contacts">Contacts</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"email": "json@example.com", "link": "<a href=\"/hidden\">x</a>"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html_page("hidden@example.com"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(100, 5))
        .await
        .expect("Crawl failed");

    assert!(outcome.emails.is_empty());
    assert_eq!(outcome.stats.non_html, 1);
    assert_eq!(outcome.stats.pages_claimed, 2);
}

#[tokio::test]
async fn test_cross_origin_server_never_contacted() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    // Reach the second server through a different host name so the
    // origin prefix cannot accidentally match
    let other_url = other_server.uri().replace("127.0.0.1", "localhost");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(format!(
            r#"<a href="{}/x">Partner</a> owner@example.com"#,
            other_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html_page("partner@other.com"))
        .expect(0)
        .mount(&other_server)
        .await;

    let outcome = crawl(&mock_server.uri(), &create_test_config(100, 5))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.emails, vec!["owner@example.com".to_string()]);
    assert_eq!(outcome.stats.links_found, 0);
}

#[tokio::test]
async fn test_more_workers_than_pages_terminates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/only">Only</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/only"))
        .respond_with(html_page(r#"<a href="/">Back</a> last@example.com"#))
        .mount(&mock_server)
        .await;

    let config = create_test_config(100, 20);
    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        crawl(&mock_server.uri(), &config),
    )
    .await
    .expect("Crawl should terminate")
    .expect("Crawl failed");

    assert_eq!(outcome.emails, vec!["last@example.com".to_string()]);
    assert_eq!(outcome.stats.pages_claimed, 2);
}

#[tokio::test]
async fn test_invalid_start_url_is_rejected() {
    let result = crawl("definitely not a url", &create_test_config(100, 5)).await;

    let err = result.expect_err("Invalid input must fail the crawl");
    assert!(err.is_client_error());
}
