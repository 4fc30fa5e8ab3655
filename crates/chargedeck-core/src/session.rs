//! Authenticated session context
//!
//! The session is an explicit value threaded through every gateway call and
//! controller. Nothing reads tokens from ambient storage at call time; the
//! running app owns exactly one [`AuthSession`] and hands out clones, so a
//! refreshed token is visible to every subsequent operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Account role. Operators are tenant-restricted: every paged list they see
/// is implicitly scoped to their own `operator_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

/// Profile fields returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "fullName")]
    pub full_name: String,
}

/// Bearer token plus tenant scope for one signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,

    #[serde(rename = "refreshToken")]
    pub refresh_token: String,

    /// Absolute expiry of `token`. Checked client-side before requests.
    #[serde(rename = "tokenExpirationDate")]
    pub expires_at: DateTime<Utc>,

    pub user: UserProfile,

    pub role: Role,

    /// Tenant id; present only for [`Role::Operator`] accounts.
    #[serde(rename = "operatorId", default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
}

impl AuthSession {
    /// True once the stored expiry is in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// The bearer token, or [`Error::SessionExpired`] when past expiry.
    /// Gateways call this instead of issuing a request doomed to 401.
    pub fn bearer(&self, now: DateTime<Utc>) -> Result<&str> {
        if self.is_expired(now) {
            Err(Error::SessionExpired)
        } else {
            Ok(&self.token)
        }
    }

    /// The operator id used for implicit tenant scoping, when this session
    /// belongs to a restricted operator account.
    pub fn scoping_operator_id(&self) -> Option<&str> {
        match self.role {
            Role::Operator => self.operator_id.as_deref(),
            Role::Admin => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(role: Role, operator_id: Option<&str>) -> AuthSession {
        AuthSession {
            token: "tok".into(),
            refresh_token: "ref".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: UserProfile {
                id: "u1".into(),
                email: "admin@example.com".into(),
                full_name: "Admin".into(),
            },
            role,
            operator_id: operator_id.map(String::from),
        }
    }

    #[test]
    fn test_bearer_when_valid() {
        let s = session(Role::Admin, None);
        assert_eq!(s.bearer(Utc::now()).unwrap(), "tok");
    }

    #[test]
    fn test_bearer_after_expiry_is_session_expired() {
        let mut s = session(Role::Admin, None);
        s.expires_at = Utc::now() - Duration::seconds(1);
        assert!(matches!(s.bearer(Utc::now()), Err(Error::SessionExpired)));
    }

    #[test]
    fn test_scoping_only_for_operator_role() {
        assert_eq!(
            session(Role::Operator, Some("op-9")).scoping_operator_id(),
            Some("op-9")
        );
        // An admin never gets tenant scoping, even with a stray operator id.
        assert_eq!(session(Role::Admin, Some("op-9")).scoping_operator_id(), None);
        assert_eq!(session(Role::Operator, None).scoping_operator_id(), None);
    }

    #[test]
    fn test_session_wire_names() {
        let s = session(Role::Operator, Some("op-1"));
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("tokenExpirationDate").is_some());
        assert_eq!(json["operatorId"], "op-1");
        assert_eq!(json["role"], "operator");
    }
}
