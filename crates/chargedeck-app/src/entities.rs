//! Admin resource catalog
//!
//! Every screen in the console is the same generic machinery pointed at one
//! of these descriptors: table columns, form fields, filterable fields,
//! supported row actions, and the gateway client for the resource. Adding a
//! resource is adding a descriptor.

use serde_json::Value;

use chargedeck_api::ResourceClient;
use chargedeck_core::{ColumnSpec, FieldSpec, OptionsSource, Record};

use crate::form::Validator;
use crate::menu::ActionKind;

/// The admin resources the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Operators,
    Stations,
    ChargingBays,
    Connectors,
    Rates,
    RateBreakdowns,
    Users,
    AccountRequests,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Operators,
        EntityKind::Stations,
        EntityKind::ChargingBays,
        EntityKind::Connectors,
        EntityKind::Rates,
        EntityKind::RateBreakdowns,
        EntityKind::Users,
        EntityKind::AccountRequests,
    ];

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityKind::Operators => &OPERATORS,
            EntityKind::Stations => &STATIONS,
            EntityKind::ChargingBays => &CHARGING_BAYS,
            EntityKind::Connectors => &CONNECTORS,
            EntityKind::Rates => &RATES,
            EntityKind::RateBreakdowns => &RATE_BREAKDOWNS,
            EntityKind::Users => &USERS,
            EntityKind::AccountRequests => &ACCOUNT_REQUESTS,
        }
    }
}

/// Nested child list revealed by expanding a parent row.
#[derive(Debug, Clone, Copy)]
pub struct ChildSpec {
    /// Descriptor of the child resource (columns, form fields, gateway).
    pub entity: EntityKind,
    /// Paging scope segment, e.g. `ByStation` in
    /// `ChargingBays/Paging/ByStation/{id}`.
    pub scope_segment: &'static str,
    /// Field on the child record that carries the parent id; pre-filled
    /// when creating a child from an expanded row.
    pub parent_field: &'static str,
    pub page_size: u32,
}

/// Everything one admin screen needs.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub title: &'static str,
    pub resource: ResourceClient,
    pub columns: &'static [ColumnSpec],
    pub form_fields: &'static [FieldSpec],
    pub filter_fields: &'static [FieldSpec],
    pub default_sort: &'static str,
    /// Row actions in menu order. An action absent here is simply not
    /// rendered -- read-only resources list only `View`.
    pub actions: &'static [ActionKind],
    pub can_create: bool,
    pub validator: Option<Validator>,
    pub child: Option<&'static ChildSpec>,
}

// ─────────────────────────────────────────────────────────────────
// Column render helpers
// ─────────────────────────────────────────────────────────────────

fn yes_no(value: &Value, _row: &Record) -> String {
    if value.as_bool().unwrap_or(false) {
        "yes".into()
    } else {
        "no".into()
    }
}

fn kilowatts(value: &Value, _row: &Record) -> String {
    match value.as_f64() {
        Some(kw) => format!("{kw:.1} kW"),
        None => String::new(),
    }
}

/// Prefer the denormalized operator name the backend sends along; fall back
/// to the raw id.
fn operator_label(_value: &Value, row: &Record) -> String {
    let name = row.display("operatorName");
    if name.is_empty() {
        row.display("operatorId")
    } else {
        name
    }
}

fn price(value: &Value, row: &Record) -> String {
    match value.as_f64() {
        Some(p) => format!("{p:.4} {}", row.display("currency")),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Validators
// ─────────────────────────────────────────────────────────────────

/// Rates use a custom validator instead of the default required check: a
/// price of zero is legal, negative is not, and the currency must be set.
fn validate_rate(draft: &Record) -> Result<(), String> {
    if draft.display("name").trim().is_empty() {
        return Err("Name is required".into());
    }
    match draft.get("pricePerKwh").and_then(Value::as_f64) {
        Some(p) if p >= 0.0 => {}
        Some(_) => return Err("Price per kWh cannot be negative".into()),
        None => return Err("Price per kWh is required".into()),
    }
    if draft.display("currency").is_empty() {
        return Err("Currency is required".into());
    }
    Ok(())
}

/// Breakdown components must sum sensibly; per-row we can at least keep the
/// percentage inside 0..=100.
fn validate_breakdown(draft: &Record) -> Result<(), String> {
    if draft.get("rateId").map_or(true, Value::is_null) {
        return Err("Rate is required".into());
    }
    if draft.display("component").trim().is_empty() {
        return Err("Component is required".into());
    }
    match draft.get("percentage").and_then(Value::as_f64) {
        Some(p) if (0.0..=100.0).contains(&p) => Ok(()),
        Some(_) => Err("Percentage must be between 0 and 100".into()),
        None => Err("Percentage is required".into()),
    }
}

// ─────────────────────────────────────────────────────────────────
// Shared option sources
// ─────────────────────────────────────────────────────────────────

const OPERATOR_OPTIONS: OptionsSource = OptionsSource::Remote {
    path: "Operators",
    value_field: "id",
    label_field: "name",
};

const STATION_OPTIONS: OptionsSource = OptionsSource::Remote {
    path: "Stations",
    value_field: "id",
    label_field: "name",
};

const RATE_OPTIONS: OptionsSource = OptionsSource::Remote {
    path: "Rates",
    value_field: "id",
    label_field: "name",
};

const CONNECTOR_TYPE_OPTIONS: OptionsSource = OptionsSource::Remote {
    path: "Connectors/types",
    value_field: "id",
    label_field: "name",
};

const BAY_STATUS_OPTIONS: OptionsSource = OptionsSource::Inline(&[
    ("Available", "Available"),
    ("Occupied", "Occupied"),
    ("OutOfService", "Out of service"),
]);

const CURRENCY_OPTIONS: OptionsSource =
    OptionsSource::Inline(&[("EUR", "EUR"), ("USD", "USD"), ("GBP", "GBP")]);

const ROLE_OPTIONS: OptionsSource =
    OptionsSource::Inline(&[("admin", "Admin"), ("operator", "Operator")]);

// ─────────────────────────────────────────────────────────────────
// Descriptors
// ─────────────────────────────────────────────────────────────────

const CRUD_ACTIONS: &[ActionKind] = &[ActionKind::View, ActionKind::Edit, ActionKind::Delete];

pub static OPERATORS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Operators,
    title: "Operators",
    resource: ResourceClient::new("Operators", "operators")
        .strip_on_update(&["createdAt", "updatedAt"]),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("name", "Name"),
        ColumnSpec::new("contactEmail", "Contact"),
        ColumnSpec::rendered("active", "Active", yes_no),
    ],
    form_fields: &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::email("contactEmail", "Contact email").required(),
        FieldSpec::text("phone", "Phone").grouped("contact"),
        FieldSpec::text("city", "City").grouped("contact"),
        FieldSpec::checkbox("active", "Active"),
    ],
    filter_fields: &[
        FieldSpec::text("name", "Name"),
        FieldSpec::text("city", "City"),
    ],
    default_sort: "name",
    actions: &[
        ActionKind::View,
        ActionKind::Edit,
        ActionKind::Delete,
        ActionKind::ToggleActivate,
    ],
    can_create: true,
    validator: None,
    child: None,
};

static STATION_BAYS: ChildSpec = ChildSpec {
    entity: EntityKind::ChargingBays,
    scope_segment: "ByStation",
    parent_field: "stationId",
    page_size: 5,
};

pub static STATIONS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Stations,
    title: "Stations",
    resource: ResourceClient::new("Stations", "stations")
        .strip_on_update(&["createdAt", "updatedAt", "operatorName"]),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("name", "Name"),
        ColumnSpec::rendered("operatorId", "Operator", operator_label),
        ColumnSpec::new("address", "Address"),
        ColumnSpec::rendered("maxPowerKw", "Power", kilowatts),
        ColumnSpec::rendered("active", "Active", yes_no),
    ],
    form_fields: &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::select("operatorId", "Operator", OPERATOR_OPTIONS).required(),
        FieldSpec::text("address", "Address"),
        FieldSpec::text("city", "City"),
        FieldSpec::number("latitude", "Latitude").grouped("geo"),
        FieldSpec::number("longitude", "Longitude").grouped("geo"),
        FieldSpec::number("maxPowerKw", "Max power (kW)"),
        FieldSpec::checkbox("active", "Active"),
    ],
    filter_fields: &[
        FieldSpec::text("name", "Name"),
        FieldSpec::text("city", "City"),
        FieldSpec::text("operatorId", "Operator id"),
    ],
    default_sort: "name",
    actions: &[
        ActionKind::View,
        ActionKind::Edit,
        ActionKind::Delete,
        ActionKind::ToggleActivate,
        ActionKind::QrCode,
    ],
    can_create: true,
    validator: None,
    child: Some(&STATION_BAYS),
};

pub static CHARGING_BAYS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::ChargingBays,
    title: "Charging bays",
    resource: ResourceClient::new("ChargingBays", "charging bays")
        .strip_on_update(&["createdAt", "updatedAt", "stationName"]),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("code", "Code"),
        ColumnSpec::new("stationName", "Station"),
        ColumnSpec::new("status", "Status"),
        ColumnSpec::rendered("maxPowerKw", "Power", kilowatts),
    ],
    form_fields: &[
        FieldSpec::text("code", "Code").required(),
        FieldSpec::select("stationId", "Station", STATION_OPTIONS).required(),
        FieldSpec::select("status", "Status", BAY_STATUS_OPTIONS).required(),
        FieldSpec::select("connectorTypeId", "Connector type", CONNECTOR_TYPE_OPTIONS),
        FieldSpec::number("maxPowerKw", "Max power (kW)"),
    ],
    filter_fields: &[
        FieldSpec::text("code", "Code"),
        FieldSpec::text("status", "Status"),
        FieldSpec::text("stationId", "Station id"),
    ],
    default_sort: "code",
    actions: CRUD_ACTIONS,
    can_create: true,
    validator: None,
    child: None,
};

pub static CONNECTORS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Connectors,
    title: "Connectors",
    resource: ResourceClient::new("Connectors", "connectors"),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("name", "Name"),
        ColumnSpec::rendered("maxPowerKw", "Max power", kilowatts),
        ColumnSpec::new("standard", "Standard"),
    ],
    // Read-only reference data: the form only ever opens in view mode.
    form_fields: &[
        FieldSpec::text("name", "Name").read_only(),
        FieldSpec::number("maxPowerKw", "Max power (kW)").read_only(),
        FieldSpec::text("standard", "Standard").read_only(),
        FieldSpec::new("description", "Description", chargedeck_core::FieldKind::TextArea)
            .read_only(),
    ],
    filter_fields: &[FieldSpec::text("name", "Name")],
    default_sort: "name",
    actions: &[ActionKind::View],
    can_create: false,
    validator: None,
    child: None,
};

pub static RATES: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Rates,
    title: "Rates",
    resource: ResourceClient::new("Rates", "rates").strip_on_update(&["createdAt", "updatedAt"]),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("name", "Name"),
        ColumnSpec::rendered("pricePerKwh", "Price / kWh", price),
        ColumnSpec::rendered("active", "Active", yes_no),
    ],
    form_fields: &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::number("pricePerKwh", "Price per kWh").grouped("price"),
        FieldSpec::select("currency", "Currency", CURRENCY_OPTIONS).grouped("price"),
        FieldSpec::checkbox("active", "Active"),
    ],
    filter_fields: &[FieldSpec::text("name", "Name")],
    default_sort: "name",
    actions: CRUD_ACTIONS,
    can_create: true,
    validator: Some(validate_rate),
    child: None,
};

pub static RATE_BREAKDOWNS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::RateBreakdowns,
    title: "Rate breakdowns",
    resource: ResourceClient::new("RateBreakdowns", "rate breakdowns")
        .strip_on_update(&["createdAt", "updatedAt", "rateName"]),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("rateName", "Rate"),
        ColumnSpec::new("component", "Component"),
        ColumnSpec::new("percentage", "Percent"),
    ],
    form_fields: &[
        FieldSpec::select("rateId", "Rate", RATE_OPTIONS).required(),
        FieldSpec::text("component", "Component").required(),
        FieldSpec::number("percentage", "Percentage").required(),
    ],
    filter_fields: &[FieldSpec::text("rateId", "Rate id")],
    default_sort: "rateId",
    actions: CRUD_ACTIONS,
    can_create: true,
    validator: Some(validate_breakdown),
    child: None,
};

pub static USERS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Users,
    title: "Users",
    resource: ResourceClient::new("Users", "users")
        .id_field("userId")
        .strip_on_update(&["createdAt", "updatedAt", "lastLoginAt"]),
    columns: &[
        ColumnSpec::new("userId", "ID"),
        ColumnSpec::new("fullName", "Name"),
        ColumnSpec::new("email", "Email"),
        ColumnSpec::new("role", "Role"),
        ColumnSpec::rendered("active", "Active", yes_no),
    ],
    form_fields: &[
        FieldSpec::text("fullName", "Full name").required(),
        FieldSpec::email("email", "Email").required(),
        FieldSpec::select("role", "Role", ROLE_OPTIONS).required(),
        FieldSpec::select("operatorId", "Operator", OPERATOR_OPTIONS),
        FieldSpec::checkbox("active", "Active"),
    ],
    filter_fields: &[
        FieldSpec::text("email", "Email"),
        FieldSpec::text("role", "Role"),
    ],
    default_sort: "fullName",
    actions: &[
        ActionKind::View,
        ActionKind::Edit,
        ActionKind::Delete,
        ActionKind::ToggleActivate,
    ],
    can_create: true,
    validator: None,
    child: None,
};

pub static ACCOUNT_REQUESTS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::AccountRequests,
    title: "Account requests",
    resource: ResourceClient::new("AccountRequests", "account requests"),
    columns: &[
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("companyName", "Company"),
        ColumnSpec::new("email", "Email"),
        ColumnSpec::new("status", "Status"),
        ColumnSpec::new("createdAt", "Requested"),
    ],
    form_fields: &[
        FieldSpec::text("companyName", "Company").read_only(),
        FieldSpec::email("email", "Email").read_only(),
        FieldSpec::text("phone", "Phone").read_only(),
        FieldSpec::new("motivation", "Motivation", chargedeck_core::FieldKind::TextArea)
            .read_only(),
        FieldSpec::text("status", "Status").read_only(),
        FieldSpec::text("adminResponse", "Admin response").read_only(),
    ],
    filter_fields: &[
        FieldSpec::text("status", "Status"),
        FieldSpec::text("email", "Email"),
    ],
    default_sort: "createdAt",
    actions: &[ActionKind::View, ActionKind::Approve, ActionKind::Reject],
    can_create: false,
    validator: None,
    child: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_kinds_resolve_to_matching_descriptor() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
        }
    }

    #[test]
    fn test_connectors_are_read_only() {
        assert_eq!(CONNECTORS.actions, &[ActionKind::View]);
        assert!(!CONNECTORS.can_create);
        assert!(CONNECTORS.form_fields.iter().all(|f| f.read_only));
    }

    #[test]
    fn test_stations_expand_into_bays() {
        let child = STATIONS.child.expect("stations have a child list");
        assert_eq!(child.entity, EntityKind::ChargingBays);
        assert_eq!(child.scope_segment, "ByStation");
        assert_eq!(child.parent_field, "stationId");
    }

    #[test]
    fn test_users_id_field() {
        assert_eq!(USERS.resource.id_field, "userId");
    }

    #[test]
    fn test_rate_validator_boundaries() {
        let ok: Record =
            serde_json::from_value(json!({"name":"Day","pricePerKwh":0.0,"currency":"EUR"}))
                .unwrap();
        assert!(validate_rate(&ok).is_ok());

        let negative: Record =
            serde_json::from_value(json!({"name":"Day","pricePerKwh":-0.1,"currency":"EUR"}))
                .unwrap();
        assert!(validate_rate(&negative).is_err());

        let no_currency: Record =
            serde_json::from_value(json!({"name":"Day","pricePerKwh":0.3})).unwrap();
        assert!(validate_rate(&no_currency).is_err());
    }

    #[test]
    fn test_breakdown_validator_percentage_range() {
        let ok: Record = serde_json::from_value(
            json!({"rateId": 1, "component": "energy", "percentage": 62.5}),
        )
        .unwrap();
        assert!(validate_breakdown(&ok).is_ok());

        let over: Record = serde_json::from_value(
            json!({"rateId": 1, "component": "energy", "percentage": 120}),
        )
        .unwrap();
        assert!(validate_breakdown(&over).is_err());
    }

    #[test]
    fn test_operator_label_prefers_denormalized_name() {
        let row: Record =
            serde_json::from_value(json!({"operatorId": 3, "operatorName": "Allego"})).unwrap();
        assert_eq!(operator_label(&json!(3), &row), "Allego");

        let bare: Record = serde_json::from_value(json!({"operatorId": 3})).unwrap();
        assert_eq!(operator_label(&json!(3), &bare), "3");
    }
}
