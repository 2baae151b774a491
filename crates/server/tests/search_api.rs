//! HTTP API tests against an in-process router with a mock fetcher.

#[macro_use]
mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reelhub_core::{testing::MockFetcher, FetchError};
use tower::ServiceExt;

use common::{fixtures, TestConfig, TestFixture, ADULT_PASSWORD, FAMILY_PASSWORD};

fn lost_fetcher() -> MockFetcher {
    MockFetcher::new()
        .with_records(
            "alpha",
            vec![
                fixtures::record("alpha", "1", "The Lost City"),
                fixtures::record("alpha", "2", "Lost"),
            ],
        )
        .with_records(
            "beta",
            vec![
                fixtures::record("beta", "7", "Lost in Space"),
                fixtures::record("beta", "8", " Lost "),
            ],
        )
        .with_records("night", vec![fixtures::record("night", "1", "Lost Nights")])
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new(MockFetcher::new());

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_search_returns_ranked_merged_list() {
    let fixture = TestFixture::with_config(lost_fetcher(), TestConfig::with_passwords());

    let response = fixture
        .get_with_password("/api/v1/search?keyword=Lost", FAMILY_PASSWORD)
        .await;
    assert_status!(response, StatusCode::OK);

    let body = &response.body;
    assert_eq!(body["code"], 0);
    assert_eq!(body["keyword"], "Lost");
    assert_eq!(body["total"], 3);
    assert_eq!(body["sources_queried"], 3);
    assert!(body.get("sources_failed").is_none());

    let list = body["list"].as_array().unwrap();
    assert_eq!(list[0]["title"], "Lost");
    assert_eq!(list[0]["sources"].as_array().unwrap().len(), 2);
    assert_eq!(list[1]["title"], "Lost in Space");
    assert_eq!(list[2]["title"], "The Lost City");
}

#[tokio::test]
async fn test_search_wd_alias() {
    let fixture = TestFixture::new(lost_fetcher());

    let response = fixture.get("/api/v1/search?wd=lost%20in").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["keyword"], "lost in");

    let fetches = fixture.fetcher.recorded_fetches().await;
    assert!(fetches.iter().all(|f| f.keyword == "lost in"));
}

#[tokio::test]
async fn test_search_empty_keyword_is_bad_request() {
    let fixture = TestFixture::new(lost_fetcher());

    for path in ["/api/v1/search", "/api/v1/search?keyword=", "/api/v1/search?keyword=%20%20"] {
        let response = fixture.get(path).await;
        assert_status!(response, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["code"], 400);
    }

    assert!(fixture.fetcher.recorded_fetches().await.is_empty());
}

#[tokio::test]
async fn test_search_requires_password_when_enabled() {
    let fixture = TestFixture::with_config(lost_fetcher(), TestConfig::with_passwords());

    let response = fixture.get("/api/v1/search?keyword=lost").await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], 401);
    assert_eq!(response.body["msg"], "unauthorized");

    let response = fixture
        .get_with_password("/api/v1/search?keyword=lost", "nope")
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    assert!(fixture.fetcher.recorded_fetches().await.is_empty());
}

#[tokio::test]
async fn test_adult_password_includes_adult_sources() {
    let fixture = TestFixture::with_config(lost_fetcher(), TestConfig::with_passwords());

    let response = fixture
        .get_with_password("/api/v1/search?keyword=lost", ADULT_PASSWORD)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["sources_queried"], 4);
    assert_eq!(response.body["total"], 4);
}

#[tokio::test]
async fn test_disabled_auth_allows_adult_sources() {
    let fixture = TestFixture::new(lost_fetcher());

    let response = fixture.get("/api/v1/search?keyword=lost").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["sources_queried"], 4);
}

#[tokio::test]
async fn test_failed_sources_are_reported() {
    let fetcher = MockFetcher::new()
        .with_records("alpha", vec![fixtures::record("alpha", "1", "Lost")])
        .with_error("beta", FetchError::Status(502))
        .with_hang("gamma")
        .with_error("night", FetchError::Decode("not json".into()));
    let fixture = TestFixture::with_config(
        fetcher,
        TestConfig {
            per_source_timeout: Duration::from_millis(100),
            ..TestConfig::default()
        },
    );

    let response = fixture.get("/api/v1/search?keyword=lost").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 1);

    let failed = response.body["sources_failed"].as_array().unwrap();
    assert_eq!(failed.len(), 3);
}

#[tokio::test]
async fn test_shutdown_cancels_search() {
    let fetcher = MockFetcher::new().with_hang("alpha");
    let fixture = TestFixture::with_config(
        fetcher,
        TestConfig {
            sources: vec![fixtures::source("alpha")],
            per_source_timeout: Duration::from_secs(30),
            ..TestConfig::default()
        },
    );

    let token = fixture.state.shutdown_token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        fixture.get("/api/v1/search?keyword=lost"),
    )
    .await
    .expect("Search was not cancelled");

    assert_eq!(response.status.as_u16(), 499);
}

#[tokio::test]
async fn test_client_disconnect_cancels_fetches() {
    let fetcher = MockFetcher::new().with_hang("alpha").with_hang("beta");
    let fixture = TestFixture::with_config(
        fetcher,
        TestConfig {
            sources: vec![fixtures::source("alpha"), fixtures::source("beta")],
            per_source_timeout: Duration::from_secs(30),
            ..TestConfig::default()
        },
    );

    let request = Request::builder()
        .uri("/api/v1/search?keyword=lost")
        .body(Body::empty())
        .unwrap();
    let in_flight = tokio::spawn(fixture.router.clone().oneshot(request));

    tokio::time::timeout(Duration::from_secs(2), async {
        while fixture.fetcher.recorded_fetches().await.len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Fetches never started");

    in_flight.abort();
    assert!(in_flight.await.unwrap_err().is_cancelled());

    tokio::time::timeout(Duration::from_secs(2), async {
        while fixture.fetcher.abandoned_fetches() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Fetches kept running after the client went away");
}

#[tokio::test]
async fn test_search_malformed_query_is_json_bad_request() {
    let fixture = TestFixture::new(lost_fetcher());

    let response = fixture.get("/api/v1/search?keyword=a&wd=b").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 400);
    assert!(response.body["msg"].as_str().is_some_and(|msg| !msg.is_empty()));

    assert!(fixture.fetcher.recorded_fetches().await.is_empty());
}

#[tokio::test]
async fn test_list_sources_hides_adult() {
    let fixture = TestFixture::with_config(MockFetcher::new(), TestConfig::with_passwords());

    let response = fixture
        .get_with_password("/api/v1/sources", FAMILY_PASSWORD)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 3);
    assert!(response.body["sources"][0].get("endpoint").is_none());

    let response = fixture
        .get_with_password("/api/v1/sources", ADULT_PASSWORD)
        .await;
    assert_eq!(response.body["total"], 4);
}

#[tokio::test]
async fn test_get_source() {
    let fixture = TestFixture::with_config(MockFetcher::new(), TestConfig::with_passwords());

    let response = fixture
        .get_with_password("/api/v1/sources/beta", FAMILY_PASSWORD)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["code"], "beta");
    assert_eq!(response.body["name"], "Source beta");

    let response = fixture
        .get_with_password("/api/v1/sources/night", FAMILY_PASSWORD)
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = fixture
        .get_with_password("/api/v1/sources/night", ADULT_PASSWORD)
        .await;
    assert_status!(response, StatusCode::OK);

    let response = fixture
        .get_with_password("/api/v1/sources/missing", ADULT_PASSWORD)
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::with_config(MockFetcher::new(), TestConfig::with_passwords());

    let response = fixture
        .get_with_password("/api/v1/config", FAMILY_PASSWORD)
        .await;
    assert_status!(response, StatusCode::OK);

    let text = response.body.to_string();
    assert!(!text.contains(FAMILY_PASSWORD));
    assert!(!text.contains(ADULT_PASSWORD));
    assert!(!text.contains("http://alpha.test"));
    assert_eq!(response.body["auth"]["enabled"], true);
    assert_eq!(response.body["sources"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_metrics_endpoint_is_public() {
    let fixture = TestFixture::with_config(lost_fetcher(), TestConfig::with_passwords());

    fixture
        .get_with_password("/api/v1/search?keyword=lost", FAMILY_PASSWORD)
        .await;

    let response = fixture.get("/api/v1/metrics").await;
    assert_status!(response, StatusCode::OK);

    let text = response.body.as_str().unwrap();
    assert!(text.contains("reelhub_searches_total"));
    assert!(text.contains("reelhub_source_fetches_total"));
}

#[tokio::test]
async fn test_metrics_label_requests_by_route() {
    let fixture = TestFixture::new(MockFetcher::new());

    fixture.get("/api/v1/sources/gamma").await;
    fixture.get("/no-such-route-7f3a").await;

    let response = fixture.get("/api/v1/metrics").await;
    let text = response.body.as_str().unwrap();
    assert!(text.contains(r#"path="/api/v1/sources/{code}""#));
    assert!(text.contains(r#"path="unmatched""#));
    assert!(!text.contains("/api/v1/sources/gamma"));
    assert!(!text.contains("no-such-route-7f3a"));
}
