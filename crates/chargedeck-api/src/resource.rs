//! Generic REST resource repository
//!
//! Every admin resource shares the same route shapes, so the per-resource
//! gateway is one [`ResourceClient`] value parameterized by path segment and
//! a strip list for server-managed fields, rather than a copy of the same
//! five functions per resource. The odd one-off routes (approve/reject,
//! connector types, QR codes) live at the bottom as free functions.

use serde_json::Value;

use chargedeck_core::prelude::*;
use chargedeck_core::{AuthSession, PageRequest, PageResponse, Record};

use crate::client::ApiClient;

/// One REST resource (`Stations`, `Operators`, ...) and its update quirks.
#[derive(Debug, Clone, Copy)]
pub struct ResourceClient {
    /// Path segment under the base URL.
    pub path: &'static str,

    /// Human name used in fallback error strings ("Failed to load …").
    pub name: &'static str,

    /// Fields the backend owns and rejects in `PUT` payloads. The id field
    /// is always stripped; these come on top (audit stamps and the like).
    pub strip_on_update: &'static [&'static str],

    /// Id field of this resource's records (`"id"` for most, `"userId"`
    /// for user aggregates).
    pub id_field: &'static str,
}

impl ResourceClient {
    pub const fn new(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name,
            strip_on_update: &[],
            id_field: "id",
        }
    }

    pub const fn strip_on_update(mut self, fields: &'static [&'static str]) -> Self {
        self.strip_on_update = fields;
        self
    }

    pub const fn id_field(mut self, field: &'static str) -> Self {
        self.id_field = field;
        self
    }

    // ─────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────

    /// Unpaged list; used for dropdown population.
    pub async fn list(&self, api: &ApiClient, session: &AuthSession) -> Result<Vec<Record>> {
        let value = api
            .get_json(session, self.path, &format!("Failed to load {}", self.name))
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    pub async fn get(&self, api: &ApiClient, session: &AuthSession, id: &str) -> Result<Record> {
        let value = api
            .get_json(
                session,
                &format!("{}/{id}", self.path),
                &format!("Failed to load {}", self.name),
            )
            .await?;
        serde_json::from_value(value).map_err(Error::from)
    }

    pub async fn get_paged(
        &self,
        api: &ApiClient,
        session: &AuthSession,
        request: &PageRequest,
    ) -> Result<PageResponse> {
        let body = serde_json::to_value(request)?;
        let value = api
            .post_json(
                session,
                &format!("{}/Paging", self.path),
                &body,
                &format!("Failed to load {}", self.name),
            )
            .await?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// Parent-scoped paging, e.g. `ChargingBays/Paging/ByStation/{id}`.
    pub async fn get_paged_scoped(
        &self,
        api: &ApiClient,
        session: &AuthSession,
        scope_segment: &str,
        parent_id: &str,
        request: &PageRequest,
    ) -> Result<PageResponse> {
        let body = serde_json::to_value(request)?;
        let value = api
            .post_json(
                session,
                &format!("{}/Paging/{scope_segment}/{parent_id}", self.path),
                &body,
                &format!("Failed to load {}", self.name),
            )
            .await?;
        serde_json::from_value(value).map_err(Error::from)
    }

    pub async fn by_operator(
        &self,
        api: &ApiClient,
        session: &AuthSession,
        operator_id: &str,
    ) -> Result<Vec<Record>> {
        let value = api
            .get_json(
                session,
                &format!("{}/ByOperator/{operator_id}", self.path),
                &format!("Failed to load {}", self.name),
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    // ─────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────

    pub async fn create(
        &self,
        api: &ApiClient,
        session: &AuthSession,
        record: &Record,
    ) -> Result<Value> {
        // Creates never carry an id; the backend mints it.
        let body = serde_json::to_value(record.without(&[self.id_field]))?;
        api.post_json(
            session,
            self.path,
            &body,
            &format!("Failed to create {}", self.name),
        )
        .await
    }

    /// The id travels in the URL; it and the server-managed fields are
    /// stripped from the payload, which the backend otherwise rejects.
    pub async fn update(
        &self,
        api: &ApiClient,
        session: &AuthSession,
        id: &str,
        record: &Record,
    ) -> Result<Value> {
        let mut stripped = record.without(&[self.id_field]);
        stripped = stripped.without(self.strip_on_update);
        let body = serde_json::to_value(stripped)?;
        api.put_json(
            session,
            &format!("{}/{id}", self.path),
            &body,
            &format!("Failed to update {}", self.name),
        )
        .await
    }

    pub async fn delete(&self, api: &ApiClient, session: &AuthSession, id: &str) -> Result<()> {
        api.delete(
            session,
            &format!("{}/{id}", self.path),
            &format!("Failed to delete {}", self.name),
        )
        .await
    }

    pub async fn toggle_activate(
        &self,
        api: &ApiClient,
        session: &AuthSession,
        id: &str,
    ) -> Result<()> {
        api.put_json(
            session,
            &format!("{}/ToggleActivate/{id}", self.path),
            &Value::Null,
            &format!("Failed to toggle {}", self.name),
        )
        .await
        .map(|_| ())
    }
}

// ─────────────────────────────────────────────────────────────────
// One-off routes
// ─────────────────────────────────────────────────────────────────

/// Approve a pending account request with an admin response message.
pub async fn approve_account_request(
    api: &ApiClient,
    session: &AuthSession,
    id: &str,
    admin_response: &str,
) -> Result<()> {
    api.put_json(
        session,
        &format!("AccountRequests/Approve/{id}"),
        &serde_json::json!({ "adminResponse": admin_response }),
        "Failed to approve account request",
    )
    .await
    .map(|_| ())
}

/// Reject a pending account request with an admin response message.
pub async fn reject_account_request(
    api: &ApiClient,
    session: &AuthSession,
    id: &str,
    admin_response: &str,
) -> Result<()> {
    api.put_json(
        session,
        &format!("AccountRequests/Reject/{id}"),
        &serde_json::json!({ "adminResponse": admin_response }),
        "Failed to reject account request",
    )
    .await
    .map(|_| ())
}

/// Enumerate the known connector types.
pub async fn connector_types(api: &ApiClient, session: &AuthSession) -> Result<Vec<Record>> {
    let value = api
        .get_json(session, "Connectors/types", "Failed to load connector types")
        .await?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Fetch the base64 PNG QR payload for a station.
pub async fn station_qr_code(
    api: &ApiClient,
    session: &AuthSession,
    station_id: &str,
) -> Result<String> {
    let value = api
        .get_json(
            session,
            &format!("Stations/{station_id}/QrCode"),
            "Failed to generate QR code",
        )
        .await?;
    // The endpoint answers either a bare string or {"qrCode": "..."}.
    match value {
        Value::String(s) => Ok(s),
        Value::Object(map) => map
            .get("qrCode")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::transport("QR payload missing from response")),
        _ => Err(Error::transport("QR payload missing from response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_client_const_builders() {
        const STATIONS: ResourceClient = ResourceClient::new("Stations", "stations")
            .strip_on_update(&["createdAt", "updatedAt"]);
        assert_eq!(STATIONS.path, "Stations");
        assert_eq!(STATIONS.id_field, "id");
        assert_eq!(STATIONS.strip_on_update, &["createdAt", "updatedAt"]);
    }

    #[test]
    fn test_update_strip_set_applies_to_record() {
        const USERS: ResourceClient = ResourceClient::new("Users", "users")
            .id_field("userId")
            .strip_on_update(&["createdAt"]);
        let record: Record = serde_json::from_value(json!({
            "userId": "u-3",
            "email": "x@y.z",
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        // Same stripping the update path performs before serializing.
        let stripped = record.without(&[USERS.id_field]).without(USERS.strip_on_update);
        assert!(!stripped.contains("userId"));
        assert!(!stripped.contains("createdAt"));
        assert!(stripped.contains("email"));
    }
}
