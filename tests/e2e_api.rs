// ScanBoard - tests/e2e_api.rs
//
// End-to-end tests for the HTTP client against a mock scan service.
//
// `HttpApi` uses reqwest's blocking client, which must not run on an async
// worker thread, so every call goes through `spawn_blocking` while the mock
// server runs on the tokio runtime.

use scanboard::api::client::HttpApi;
use scanboard::api::ScanApi;
use scanboard::app::session;
use scanboard::core::model::{Credential, Registration, ScanId, ScanStatus};
use scanboard::core::results::{self, Tool};
use scanboard::util::error::ApiError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

/// Build a client for `uri` and run `f` with it off the async runtime.
async fn with_api<T, F>(uri: String, f: F) -> T
where
    F: FnOnce(&HttpApi) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let api = HttpApi::new(&uri, Duration::from_secs(5)).expect("Failed to create client");
        f(&api)
    })
    .await
    .expect("Blocking task panicked")
}

fn token() -> Credential {
    Credential::new("tok-123")
}

fn scan_json(id: u64, domain: &str, status: &str, progress: u8) -> serde_json::Value {
    json!({
        "id": id,
        "domain": domain,
        "status": status,
        "progress": progress,
        "current_step": null,
        "created_at": "2025-03-01T10:00:00.123456",
        "updated_at": "2025-03-01T10:05:00"
    })
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_token_request_is_form_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=a%40b.c"))
        .and(body_string_contains("password=pw"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-123", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credential = with_api(server.uri(), |api| api.request_token("a@b.c", "pw"))
        .await
        .expect("Token request failed");
    assert_eq!(credential.token(), "tok-123");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_authenticate_fetches_profile_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-123", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 7, "username": "alice", "email": "a@b.c"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let established = with_api(server.uri(), |api| {
        session::authenticate(api, "a@b.c", "pw")
    })
    .await
    .expect("Login failed");
    assert_eq!(established.credential.token(), "tok-123");
    let user = established.user.expect("profile missing");
    assert_eq!(user.username, "alice");
    assert_eq!(user.id.as_str(), "7");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_credentials_map_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    let err = with_api(server.uri(), |api| api.request_token("a@b.c", "bad"))
        .await
        .unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.user_message(), "Incorrect email or password");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_registration_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(json!({"email": "a@b.c", "username": "alice", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let err = with_api(server.uri(), |api| {
        api.register(&Registration {
            email: "a@b.c".to_string(),
            username: "alice".to_string(),
            password: "pw".to_string(),
        })
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref detail } if detail == "Email already registered"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_field_errors_are_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"},
                {"loc": ["body", "password"], "msg": "field required", "type": "missing"}
            ]
        })))
        .mount(&server)
        .await;

    let err = with_api(server.uri(), |api| {
        api.register(&Registration {
            email: "nope".to_string(),
            username: "x".to_string(),
            password: String::new(),
        })
    })
    .await
    .unwrap_err();
    assert_eq!(
        err.user_message(),
        "value is not a valid email address; field required"
    );
}

// =============================================================================
// Scans
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_list_preserves_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scans"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            scan_json(3, "c.com", "running", 40),
            scan_json(2, "b.com", "completed", 100),
            scan_json(1, "a.com", "failed", 20)
        ])))
        .mount(&server)
        .await;

    let scans = with_api(server.uri(), |api| api.list_scans(&token()))
        .await
        .expect("List failed");
    let ids: Vec<&str> = scans.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
    assert_eq!(scans[0].status, ScanStatus::Running);
    assert_eq!(scans[0].progress, 40);
    assert_eq!(scans[2].status, ScanStatus::Failed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_scan_posts_json_domain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scans"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({"domain": "example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_json(
            42,
            "example.com",
            "pending",
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let created = with_api(server.uri(), |api| {
        scanboard::app::scans::submit_scan(api, &token(), "  example.com ")
    })
    .await
    .expect("Create failed");
    assert_eq!(created.id, ScanId::new("42"));
    assert_eq!(created.status, ScanStatus::Pending);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_detail_decodes_tool_output() {
    let server = MockServer::start().await;
    let mut body = scan_json(42, "example.com", "running", 40);
    body["current_step"] = json!("Running nuclei");
    body["subfinder_results"] = json!("a.example.com\nb.example.com\n\n");
    body["httpx_results"] = json!("https://a.example.com\n");
    body["nuclei_results"] = json!(null);
    body["dalfox_results"] = json!("[POC] something");

    Mock::given(method("GET"))
        .and(path("/api/scans/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let detail = with_api(server.uri(), |api| {
        api.scan_detail(&token(), &ScanId::new("42"))
    })
    .await
    .expect("Detail failed");

    assert_eq!(detail.summary.current_step.as_deref(), Some("Running nuclei"));
    assert!((detail.summary.progress_fraction() - 0.4).abs() < f32::EPSILON);
    assert_eq!(results::summary_text(Tool::Subfinder, &detail), "2 subdomains found");
    assert_eq!(results::summary_text(Tool::Nuclei, &detail), "Pending");
    assert_eq!(results::summary_text(Tool::Dalfox, &detail), "Results available");
    assert_eq!(results::tab_body(Tool::Katana, &detail), "No results yet...");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_scan_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scans/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Scan not found"})))
        .mount(&server)
        .await;

    let err = with_api(server.uri(), |api| {
        api.scan_detail(&token(), &ScanId::new("999"))
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scans"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let err = with_api(server.uri(), |api| api.list_scans(&token()))
        .await
        .unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scans"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = with_api(server.uri(), |api| api.list_scans(&token()))
        .await
        .unwrap_err();
    match err {
        ApiError::Http { status, detail } => {
            assert_eq!(status, 503);
            assert_eq!(detail, "upstream down");
        }
        other => panic!("Expected Http error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_server_is_network_error() {
    // Port 1 is reserved and nothing listens there.
    let err = with_api("http://127.0.0.1:1".to_string(), |api| {
        api.list_scans(&token())
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.user_message(), "Cannot reach the scan service");
}
