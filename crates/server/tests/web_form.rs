mod common;

use std::collections::HashMap;
use std::io::Write;

use axum::http::StatusCode;
use tempfile::NamedTempFile;
use triage_core::{Config, SourceError, TicketScope};

use common::{fixtures, staging_config, TestFixture};

fn fixture_file() -> NamedTempFile {
    let body = serde_json::json!({
        "tickets": [
            {
                "id": 1, "department_id": 1, "subject": "Low <priority>",
                "priority": 1, "status": 2, "created_at": "2024-01-01T00:00:00Z",
                "custom_fields": {"account_tier": "E", "environment": "Lab", "ticket_type": "Service request"}
            },
            {
                "id": 2, "department_id": 2, "subject": "Outage",
                "priority": 4, "status": 2, "created_at": "2024-01-02T00:00:00Z",
                "custom_fields": {"account_tier": "A", "environment": "Production", "ticket_type": "Incident or Problem"}
            }
        ],
        "departments": [{"id": 1, "name": "Acme"}, {"id": 2, "name": "Globex"}]
    });

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.to_string().as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new(Config::default());
    let response = fixture.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new(staging_config());
    let response = fixture.get("/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("web-secret"));
    let json = response.json();
    assert_eq!(json["freshservice"]["api_key_configured"], true);
    assert_eq!(json["freshservice"]["agent_id"], 11);
}

#[tokio::test]
async fn test_form_page() {
    let fixture = TestFixture::new(Config::default());
    let response = fixture.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<form method=\"post\""));
    assert!(response.body.contains("<option value=\"group-focused\">"));
}

#[tokio::test]
async fn test_test_mode_json_in_pre() {
    let file = fixture_file();
    let fixture = TestFixture::new(Config::default());

    let response = fixture
        .post_form(
            "/",
            &[("mode", "test"), ("file", file.path().to_str().unwrap())],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<pre>"));
    // JSON is escaped inside the page.
    assert!(response.body.contains("&quot;score&quot;: 76"));
    assert!(response.body.contains("Low &lt;priority&gt;"));
    let outage = response.body.find("Outage").unwrap();
    let low = response.body.find("Low &lt;priority&gt;").unwrap();
    assert!(outage < low);
}

#[tokio::test]
async fn test_test_mode_html_inline() {
    let file = fixture_file();
    let fixture = TestFixture::new(Config::default());

    let response = fixture
        .post_form(
            "/",
            &[
                ("mode", "test"),
                ("file", file.path().to_str().unwrap()),
                ("output", "html"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<table>"));
    assert!(response.body.contains("<th>Company Name</th>"));
    assert!(response.body.contains("<td>Globex</td>"));
    assert!(!response.body.contains("<pre>"));
    // Form keeps the submitted choices.
    assert!(response.body.contains("<option value=\"html\" selected>html</option>"));
}

#[tokio::test]
async fn test_missing_fixture_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let fixture = TestFixture::new(Config::default());

    let response = fixture
        .post_form("/", &[("mode", "test"), ("file", missing.to_str().unwrap())])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Fixture file not found"));
}

#[tokio::test]
async fn test_invalid_form_is_bad_request() {
    let fixture = TestFixture::new(Config::default());

    let response = fixture.post_form("/", &[("mode", "qa")]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("unknown mode"));

    let response = fixture.post_form("/", &[("mode", "staging")]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("get_tickets is required"));
}

#[tokio::test]
async fn test_api_mode_requires_credentials() {
    let fixture = TestFixture::new(Config::default());

    let response = fixture
        .post_form("/", &[("mode", "staging"), ("get_tickets", "mine")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("api_key"));
}

#[tokio::test]
async fn test_api_mode_table_from_source() {
    let fixture = TestFixture::with_mock_source(staging_config());
    fixture
        .mock()
        .set_tickets(vec![
            fixtures::ticket(31, "D", 2, "Lab", "Service request"),
            fixtures::ticket(32, "B", 4, "Production", "Incident or Problem"),
        ])
        .await;
    fixture
        .mock()
        .set_company_names(HashMap::from([(2, "Initech".to_string())]))
        .await;

    let response = fixture
        .post_form(
            "/",
            &[
                ("mode", "staging"),
                ("get_tickets", "group-focused"),
                ("output", "table"),
                ("log_level", "debug"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("company_name"));
    assert!(response.body.contains("Score"));
    assert!(response.body.contains("Initech"));
    assert_eq!(
        fixture.mock().recorded_scopes().await,
        vec![TicketScope::GroupFocused]
    );
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let fixture = TestFixture::with_mock_source(staging_config());
    fixture
        .mock()
        .set_next_error(SourceError::Forbidden {
            url: "https://acme-sandbox.freshservice.com/api/v2/tickets/filter".to_string(),
        })
        .await;

    let response = fixture
        .post_form("/", &[("mode", "staging"), ("get_tickets", "mine")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body.contains("Forbidden"));
    assert!(response.body.contains("locked"));
}
