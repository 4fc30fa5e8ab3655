//! Authentication endpoints
//!
//! Login, token refresh, and OTP verification. No refresh timer lives here:
//! refresh is an explicit call the binary makes when the stored session is
//! stale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use chargedeck_core::prelude::*;
use chargedeck_core::{AuthSession, Role, UserProfile};

use crate::client::ApiClient;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Wire shape of a successful login / refresh / OTP validation.
#[derive(Debug, Clone, Deserialize)]
struct SessionPayload {
    token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(rename = "tokenExpirationDate")]
    expires_at: chrono::DateTime<chrono::Utc>,
    user: UserProfile,
    role: Role,
    #[serde(rename = "operatorId", default)]
    operator_id: Option<String>,
}

impl From<SessionPayload> for AuthSession {
    fn from(p: SessionPayload) -> Self {
        AuthSession {
            token: p.token,
            refresh_token: p.refresh_token,
            expires_at: p.expires_at,
            user: p.user,
            role: p.role,
            operator_id: p.operator_id,
        }
    }
}

/// Exchange credentials for a session.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<AuthSession> {
    let body = serde_json::to_value(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })?;
    let value = api
        .post_json_unauth("Auth/Login", &body, "Failed to sign in")
        .await?;
    parse_session(value)
}

/// Exchange a refresh token for a fresh session.
pub async fn refresh_token(api: &ApiClient, refresh_token: &str) -> Result<AuthSession> {
    let value = api
        .post_json_unauth(
            "Auth/RefreshToken",
            &serde_json::json!({ "refreshToken": refresh_token }),
            "Failed to refresh session",
        )
        .await?;
    parse_session(value)
}

/// Validate the one-time code sent to a new account's email.
pub async fn validate_otp(api: &ApiClient, email: &str, code: &str) -> Result<AuthSession> {
    let value = api
        .post_json_unauth(
            "Auth/ValidateOtp",
            &serde_json::json!({ "email": email, "otp": code }),
            "Failed to validate code",
        )
        .await?;
    parse_session(value)
}

/// Ask the backend to email a new one-time code.
pub async fn resend_otp(api: &ApiClient, email: &str) -> Result<()> {
    api.post_json_unauth(
        "Auth/ResendOtp",
        &serde_json::json!({ "email": email }),
        "Failed to resend code",
    )
    .await
    .map(|_| ())
}

fn parse_session(value: Value) -> Result<AuthSession> {
    let payload: SessionPayload = serde_json::from_value(value)?;
    Ok(payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_session_full_payload() {
        let session = parse_session(json!({
            "token": "tok-1",
            "refreshToken": "ref-1",
            "tokenExpirationDate": "2099-01-01T00:00:00Z",
            "user": {"id": "u1", "email": "ops@example.com", "fullName": "Ops"},
            "role": "operator",
            "operatorId": "op-4"
        }))
        .unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.role, Role::Operator);
        assert_eq!(session.operator_id.as_deref(), Some("op-4"));
    }

    #[test]
    fn test_parse_session_admin_without_operator_id() {
        let session = parse_session(json!({
            "token": "tok-2",
            "refreshToken": "ref-2",
            "tokenExpirationDate": "2099-01-01T00:00:00Z",
            "user": {"id": "u2", "email": "root@example.com", "fullName": "Root"},
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(session.role, Role::Admin);
        assert!(session.operator_id.is_none());
        assert!(session.scoping_operator_id().is_none());
    }

    #[test]
    fn test_parse_session_rejects_malformed_payload() {
        assert!(parse_session(json!({"token": "only"})).is_err());
    }
}
