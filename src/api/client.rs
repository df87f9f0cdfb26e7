// ScanBoard - api/client.rs
//
// Blocking HTTP+JSON client for the scan service.
//
// Each poller and form task runs on its own background thread, so the
// blocking reqwest client is used directly; it is cheap to clone and shares
// one connection pool across threads.
//
// Status mapping:
//   401              -> ApiError::Auth
//   404              -> ApiError::NotFound
//   400 / 409 / 422  -> ApiError::Validation (backend `detail` preserved)
//   other non-2xx    -> ApiError::Http
//   transport error  -> ApiError::Network

use crate::api::ScanApi;
use crate::core::model::{Credential, Registration, ScanDetail, ScanId, ScanSummary, User};
use crate::util::constants::{MAX_ERROR_BODY_PREVIEW, USER_AGENT};
use crate::util::error::{ApiError, ApiResult};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Body of a successful `POST /api/token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Body of `POST /api/scans`.
#[derive(Debug, serde::Serialize)]
struct CreateScan<'a> {
    domain: &'a str,
}

/// `ScanApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client for the service at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network {
                endpoint: base_url.to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are issued against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send `request`, map non-success statuses to `ApiError`, and decode the JSON body.
    ///
    /// `resource` names the thing being fetched for `NotFound` messages.
    fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(path, resource, request)?;
        response.json::<T>().map_err(|e| ApiError::Decode {
            endpoint: path.to_string(),
            source: e,
        })
    }

    fn send(&self, path: &str, resource: &str, request: RequestBuilder) -> ApiResult<Response> {
        tracing::debug!(endpoint = path, "API request");
        let response = request.send().map_err(|e| ApiError::Network {
            endpoint: path.to_string(),
            source: e,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are small; failure to read one just loses the detail text.
        let body = response.text().unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::debug!(endpoint = path, status = status.as_u16(), detail = %detail, "API error response");

        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Auth { detail },
            StatusCode::NOT_FOUND => ApiError::NotFound {
                resource: resource.to_string(),
            },
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation { detail }
            }
            other => ApiError::Http {
                status: other.as_u16(),
                detail,
            },
        })
    }
}

impl ScanApi for HttpApi {
    fn register(&self, registration: &Registration) -> ApiResult<User> {
        let path = "/api/register";
        let request = self.client.post(self.url(path)).json(registration);
        self.send_json(path, "Registration endpoint", request)
    }

    fn request_token(&self, identifier: &str, secret: &str) -> ApiResult<Credential> {
        let path = "/api/token";
        let request = self
            .client
            .post(self.url(path))
            .form(&[("username", identifier), ("password", secret)]);
        let token: TokenResponse = self.send_json(path, "Token endpoint", request)?;
        Ok(Credential::new(token.access_token))
    }

    fn current_user(&self, credential: &Credential) -> ApiResult<User> {
        let path = "/api/me";
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(credential.token());
        self.send_json(path, "Current user", request)
    }

    fn list_scans(&self, credential: &Credential) -> ApiResult<Vec<ScanSummary>> {
        let path = "/api/scans";
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(credential.token());
        self.send_json(path, "Scan list", request)
    }

    fn create_scan(&self, credential: &Credential, domain: &str) -> ApiResult<ScanSummary> {
        let path = "/api/scans";
        let request = self
            .client
            .post(self.url(path))
            .bearer_auth(credential.token())
            .json(&CreateScan { domain });
        self.send_json(path, "Scan list", request)
    }

    fn scan_detail(&self, credential: &Credential, id: &ScanId) -> ApiResult<ScanDetail> {
        let path = format!("/api/scans/{id}");
        let request = self
            .client
            .get(self.url(&path))
            .bearer_auth(credential.token());
        self.send_json(&path, &format!("Scan {id}"), request)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Handles `{"detail": "..."}`, FastAPI's validation shape
/// `{"detail": [{"msg": "...", ...}, ...]}`, and falls back to a truncated
/// copy of the raw body.
pub fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }
    body.trim().chars().take(MAX_ERROR_BODY_PREVIEW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"Email already registered"}"#),
            "Email already registered"
        );
    }

    #[test]
    fn test_extract_detail_validation_array() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"},{"msg":"field required"}]}"#;
        assert_eq!(
            extract_detail(body),
            "value is not a valid email address; field required"
        );
    }

    #[test]
    fn test_extract_detail_falls_back_to_truncated_body() {
        assert_eq!(extract_detail("  Bad Gateway  "), "Bad Gateway");
        let long = "x".repeat(MAX_ERROR_BODY_PREVIEW * 2);
        assert_eq!(extract_detail(&long).len(), MAX_ERROR_BODY_PREVIEW);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/api/me"), "http://localhost:8000/api/me");
    }
}
