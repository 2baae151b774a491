//! Common test utilities for API testing with a mock fetcher.
//!
//! This module provides a test fixture that creates an in-process router
//! with a [`MockFetcher`] injected, so the HTTP surface can be exercised
//! without any real upstream source.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reelhub_core::{
    create_authenticator, testing::MockFetcher, AuthConfig, Config, PasswordEntry,
    SearchService, SearchSettings, SourceCatalog, SourceConfig, SourceDescriptor,
};
use reelhub_server::state::AppState;

/// Re-export fixtures for test convenience
pub use reelhub_core::testing::fixtures;

/// Password accepted by [`TestConfig::with_passwords`] without adult access.
pub const FAMILY_PASSWORD: &str = "family";
/// Password accepted by [`TestConfig::with_passwords`] with adult access.
pub const ADULT_PASSWORD: &str = "grownup";

/// Test fixture for API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fetcher = MockFetcher::new()
///         .with_records("alpha", vec![fixtures::record("alpha", "1", "Lost")]);
///     let fixture = TestFixture::new(fetcher);
///
///     let response = fixture.get("/api/v1/search?keyword=lost").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock fetcher - inspect which sources were queried
    pub fetcher: Arc<MockFetcher>,
    /// Shared state, for triggering shutdown
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with the default sources and auth disabled.
    pub fn new(fetcher: MockFetcher) -> Self {
        Self::with_config(fetcher, TestConfig::default())
    }

    /// Create a fixture with custom configuration.
    pub fn with_config(fetcher: MockFetcher, test_config: TestConfig) -> Self {
        let config = Config {
            auth: test_config.auth,
            sources: test_config
                .sources
                .iter()
                .map(|s| SourceConfig {
                    code: s.code.clone(),
                    name: s.name.clone(),
                    url: s.endpoint.clone(),
                    enabled: s.enabled,
                    adult: s.adult,
                })
                .collect(),
            ..Config::default()
        };

        let authenticator =
            Arc::from(create_authenticator(&config.auth).expect("Failed to create authenticator"));
        let catalog =
            SourceCatalog::new(test_config.sources).expect("Failed to build source catalog");
        let fetcher = Arc::new(fetcher);
        let search = SearchService::new(
            catalog,
            fetcher.clone(),
            SearchSettings {
                per_source_timeout: test_config.per_source_timeout,
            },
        );

        let state = Arc::new(AppState::new(config, authenticator, Arc::new(search)));
        let router = reelhub_server::api::create_router(state.clone());

        Self {
            router,
            fetcher,
            state,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(path, None).await
    }

    /// Send a GET request with an `X-Auth-Password` header.
    pub async fn get_with_password(&self, path: &str, password: &str) -> TestResponse {
        self.request(path, Some(password)).await
    }

    async fn request(&self, path: &str, password: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(password) = password {
            builder = builder.header("X-Auth-Password", password);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub sources: Vec<SourceDescriptor>,
    pub auth: AuthConfig,
    pub per_source_timeout: Duration,
}

impl Default for TestConfig {
    /// Sources `alpha`, `beta`, `gamma` plus adult source `night`, no auth.
    fn default() -> Self {
        Self {
            sources: vec![
                fixtures::source("alpha"),
                fixtures::source("beta"),
                fixtures::source("gamma"),
                fixtures::adult_source("night"),
            ],
            auth: AuthConfig::default(),
            per_source_timeout: Duration::from_millis(300),
        }
    }
}

impl TestConfig {
    /// Enable password auth with [`FAMILY_PASSWORD`] and [`ADULT_PASSWORD`].
    pub fn with_passwords() -> Self {
        Self {
            auth: AuthConfig {
                enabled: true,
                passwords: vec![
                    PasswordEntry {
                        password: FAMILY_PASSWORD.to_string(),
                        adult: false,
                    },
                    PasswordEntry {
                        password: ADULT_PASSWORD.to_string(),
                        adult: true,
                    },
                ],
            },
            ..Self::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
