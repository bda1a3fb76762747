use immo_scout::scrapers::{FetchError, HttpFetcher, PageFetcher, ScrapeParams};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn params(timeout: Duration) -> ScrapeParams {
    ScrapeParams {
        timeout,
        ..ScrapeParams::default()
    }
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/annonce/villa"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Villa à Ngor</body></html>")
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&params(Duration::from_secs(10))).unwrap();
    let body = fetcher
        .fetch(&format!("{}/annonce/villa", mock_server.uri()))
        .await
        .unwrap();

    assert!(body.contains("Villa à Ngor"));
}

#[tokio::test]
async fn test_fetch_404_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&params(Duration::from_secs(10))).unwrap();
    let result = fetcher
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;

    match result {
        Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 404),
        other => panic!("Expected HTTP 404 error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&params(Duration::from_millis(200))).unwrap();
    let result = fetcher.fetch(&format!("{}/slow", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Timeout)));
}

#[tokio::test]
async fn test_fetch_invalid_url() {
    let fetcher = HttpFetcher::new(&ScrapeParams::default()).unwrap();
    let result = fetcher.fetch("not a url").await;

    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}
