use linkcache::cache::{MemoryStore, PageCache};
use linkcache::config::{CacheBackend, Config};
use linkcache::crawler::{
    build_http_client, Coordinator, CrawlOutcome, CrawlResult, Fetcher, HttpTransport,
    RetryPolicy, SpeedTiers,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(5),
    }
}

fn http_fetcher() -> Fetcher {
    let client = build_http_client().expect("Failed to build HTTP client");
    Fetcher::new(Arc::new(HttpTransport::new(client)), fast_policy())
}

fn memory_coordinator() -> Coordinator {
    Coordinator::new(
        PageCache::new(Arc::new(MemoryStore::new()), "page:"),
        http_fetcher(),
        SpeedTiers::default(),
    )
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_fetch_extracts_links_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body>
            <a href="http://x.com">text</a>
            <a href="/relative?a=1&amp;b=2">rel</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let content = http_fetcher()
        .fetch(&format!("{}/", mock_server.uri()), 1.0)
        .await
        .expect("Fetch failed");

    assert_eq!(
        content,
        concat!(
            r#"<a href="http://x.com">http://x.com</a><br>"#,
            r#"<a href="/relative?a=1&amp;b=2">/relative?a=1&amp;b=2</a><br>"#,
        )
    );
}

#[tokio::test]
async fn test_large_page_extracted_in_full() {
    let mock_server = MockServer::start().await;

    let anchors: String = (0..5000)
        .map(|i| format!(r#"<p>filler text {i}</p><a href="/item/{i}?x=1&amp;y=2">{i}</a>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(html(&format!("<html><body>{}</body></html>", anchors)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let content = http_fetcher()
        .fetch(&format!("{}/big", mock_server.uri()), 1.0)
        .await
        .expect("Fetch failed");

    assert_eq!(content.matches("<br>").count(), 5000);
    assert!(content.starts_with(r#"<a href="/item/0?x=1&amp;y=2">/item/0?x=1&amp;y=2</a><br>"#));
    assert!(content.ends_with(r#"<a href="/item/4999?x=1&amp;y=2">/item/4999?x=1&amp;y=2</a><br>"#));
}

#[tokio::test]
async fn test_second_request_served_from_cache() {
    let mock_server = MockServer::start().await;
    let url = format!("{}/page", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(r#"<a href="/one">1</a><a href="/two">2</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = memory_coordinator();

    let first = coordinator.handle_crawl(&url, false).await;
    let fresh = match first {
        CrawlOutcome::Completed(fresh) => fresh,
        other => panic!("First crawl failed: {:?}", other),
    };
    assert!(!fresh.from_cache);
    assert_eq!(
        fresh.content,
        r#"<a href="/one">/one</a><br><a href="/two">/two</a><br>"#
    );

    let second = coordinator.handle_crawl(&url, true).await;
    assert_eq!(
        second,
        CrawlOutcome::Completed(CrawlResult {
            content: fresh.content.clone(),
            elapsed_seconds: 0.0,
            from_cache: true,
        })
    );
}

#[tokio::test]
async fn test_error_status_pages_are_still_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"<a href="/home">Back home</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let content = http_fetcher()
        .fetch(&format!("{}/missing", mock_server.uri()), 1.0)
        .await
        .expect("A 404 is not a transport failure");

    assert_eq!(content, r#"<a href="/home">/home</a><br>"#);
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/new"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html(r#"<a href="/moved">m</a>"#))
        .mount(&mock_server)
        .await;

    let content = http_fetcher()
        .fetch(&format!("{}/old", mock_server.uri()), 1.0)
        .await
        .expect("Fetch failed");

    assert_eq!(content, r#"<a href="/moved">/moved</a><br>"#);
}

#[tokio::test]
async fn test_unreachable_host_fails_after_retries() {
    // Nothing listens on port 1
    let url = "http://127.0.0.1:1/";
    let coordinator = memory_coordinator();

    let outcome = coordinator.handle_crawl(url, true).await;
    let failure = match outcome {
        CrawlOutcome::Failed(failure) => failure,
        other => panic!("Expected failure, got {:?}", other),
    };
    assert!(failure.reason.contains("max retries exceeded"));
    assert!(failure.reason.contains("4 attempts"));

    // Nothing was cached for the failed URL
    assert_eq!(coordinator.cache().get(url).expect("Cache read failed"), None);
}

#[tokio::test]
async fn test_sqlite_cache_survives_restart() {
    let mock_server = MockServer::start().await;
    let url = format!("{}/", mock_server.uri());
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/persisted">p</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.cache.backend = CacheBackend::Sqlite;
    config.cache.database_path = dir
        .path()
        .join("linkcache.db")
        .to_string_lossy()
        .into_owned();
    config.fetcher.retry_delay_ms = 5;

    {
        let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
        let outcome = coordinator.handle_crawl(&url, false).await;
        assert!(matches!(
            outcome,
            CrawlOutcome::Completed(CrawlResult { from_cache: false, .. })
        ));
    }

    let coordinator = Coordinator::from_config(&config).expect("Failed to reopen coordinator");
    let outcome = coordinator.handle_crawl(&url, false).await;
    let result = match outcome {
        CrawlOutcome::Completed(result) => result,
        other => panic!("Expected cached result, got {:?}", other),
    };
    assert!(result.from_cache);
    assert_eq!(result.content, r#"<a href="/persisted">/persisted</a><br>"#);

    let page = coordinator
        .cache()
        .get(&url)
        .expect("Cache read failed")
        .expect("Page missing from cache");
    assert!(page.age().num_seconds() < 60);
}
