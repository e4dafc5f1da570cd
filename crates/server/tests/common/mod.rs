//! Common test utilities for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use triage_core::testing::MockTicketSource;
use triage_core::Config;
use triage_server::api::create_router;
use triage_server::state::AppState;

pub use triage_core::testing::fixtures;

/// Router plus the state it was built from.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new(Config::default());
/// let response = fixture.post_form("/", &[("mode", "test"), ("file", path)]).await;
/// assert_eq!(response.status, StatusCode::OK);
/// ```
pub struct TestFixture {
    pub router: Router,
    /// Set when the fixture was built with a mock source.
    pub source: Option<Arc<MockTicketSource>>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response is not JSON")
    }
}

impl TestFixture {
    /// Router whose sources are built from the request, as in production.
    pub fn new(config: Config) -> Self {
        Self {
            router: create_router(Arc::new(AppState::new(config))),
            source: None,
        }
    }

    /// Router that serves every run from a mock source.
    pub fn with_mock_source(config: Config) -> Self {
        let source = Arc::new(MockTicketSource::new());
        let state = AppState::new(config).with_source(source.clone());
        Self {
            router: create_router(Arc::new(state)),
            source: Some(source),
        }
    }

    pub fn mock(&self) -> &MockTicketSource {
        self.source.as_deref().expect("fixture has no mock source")
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST an urlencoded form.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Config that passes validation for staging runs of either scope.
pub fn staging_config() -> Config {
    let mut config = Config::default();
    config.freshservice.api_key = "web-secret".to_string();
    config.freshservice.staging_endpoint = Some("https://acme-sandbox.freshservice.com/api/v2".to_string());
    config.freshservice.agent_id = Some(11);
    config.freshservice.group_id = Some(22);
    config.freshservice.portal_url = Some("https://support.example.com/a/tickets".to_string());
    config
}
