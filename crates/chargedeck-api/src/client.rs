//! HTTP plumbing shared by every gateway call

use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use chargedeck_core::prelude::*;
use chargedeck_core::AuthSession;

/// Gateway to the platform backend: a configured base URL plus one shared
/// reqwest client. Cheap to clone behind an `Arc`; every call takes the
/// session explicitly so a refreshed token is picked up immediately.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource path (possibly multi-segment, e.g.
    /// `"ChargingBays/Paging/ByStation/5"`) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::BaseUrl(format!("{path}: {e}")))
    }

    // ─────────────────────────────────────────────────────────
    // Authenticated JSON calls
    // ─────────────────────────────────────────────────────────

    pub async fn get_json(
        &self,
        session: &AuthSession,
        path: &str,
        fallback: &str,
    ) -> Result<Value> {
        self.request(Method::GET, path, None, Some(session), fallback, true)
            .await
    }

    pub async fn post_json(
        &self,
        session: &AuthSession,
        path: &str,
        body: &Value,
        fallback: &str,
    ) -> Result<Value> {
        self.request(Method::POST, path, Some(body), Some(session), fallback, true)
            .await
    }

    pub async fn put_json(
        &self,
        session: &AuthSession,
        path: &str,
        body: &Value,
        fallback: &str,
    ) -> Result<Value> {
        self.request(Method::PUT, path, Some(body), Some(session), fallback, true)
            .await
    }

    /// DELETE tolerates a non-JSON success body; only error responses are
    /// parsed as JSON.
    pub async fn delete(&self, session: &AuthSession, path: &str, fallback: &str) -> Result<()> {
        self.request(Method::DELETE, path, None, Some(session), fallback, false)
            .await
            .map(|_| ())
    }

    /// Unauthenticated POST, used by the auth endpoints themselves.
    pub async fn post_json_unauth(
        &self,
        path: &str,
        body: &Value,
        fallback: &str,
    ) -> Result<Value> {
        self.request(Method::POST, path, Some(body), None, fallback, true)
            .await
    }

    // ─────────────────────────────────────────────────────────
    // Core request path
    // ─────────────────────────────────────────────────────────

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        session: Option<&AuthSession>,
        fallback: &str,
        parse_success_json: bool,
    ) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);

        let mut req = self.http.request(method, url);
        if let Some(session) = session {
            // Fails fast with SessionExpired instead of a doomed 401 round trip.
            req = req.bearer_auth(session.bearer(Utc::now())?);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status, &text, fallback));
        }

        if !parse_success_json || text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(Error::from)
    }
}

/// Ensure the base URL ends in `/` so `Url::join` treats it as a directory.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let raw = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&raw).map_err(|e| Error::BaseUrl(format!("{raw}: {e}")))
}

/// Build the typed error for a non-2xx response.
///
/// The backend reports failures as `{"message": "..."}`; when the body is
/// not JSON or has no `message`, the per-operation fallback is used so the
/// user always sees *something* actionable.
fn error_from_body(status: StatusCode, body: &str, fallback: &str) -> Error {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    Error::api(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_appends_slash() {
        let url = normalize_base_url("https://api.example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn test_normalize_base_url_keeps_slash() {
        let url = normalize_base_url("https://api.example.com/v1/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn test_endpoint_joins_without_clobbering_base_path() {
        let client = ApiClient::new(
            "https://api.example.com/v1",
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        let url = client.endpoint("Stations/Paging").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/Stations/Paging");
    }

    #[test]
    fn test_error_from_body_extracts_server_message() {
        let err = error_from_body(
            StatusCode::NOT_FOUND,
            r#"{"message":"Station not found"}"#,
            "Failed to load stations",
        );
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Station not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_body_falls_back_on_non_json() {
        let err = error_from_body(
            StatusCode::BAD_GATEWAY,
            "<html>upstream down</html>",
            "Failed to load stations",
        );
        assert_eq!(err.to_string(), "Failed to load stations");
    }

    #[test]
    fn test_error_from_body_falls_back_on_empty_message() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"message":""}"#,
            "Failed to save station",
        );
        assert_eq!(err.to_string(), "Failed to save station");
    }
}
