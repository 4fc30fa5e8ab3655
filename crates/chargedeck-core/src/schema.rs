//! Declarative form and table schemas
//!
//! Every admin screen is driven by static metadata: [`ColumnSpec`]s describe
//! the table, [`FieldSpec`]s describe the create/edit/view modal. Field
//! behavior is a closed set of tagged variants with exhaustive matches in
//! the renderer and the coercion code, so adding a kind is a compile error
//! until every consumer handles it.

use serde_json::Value;

use crate::record::Record;

/// Where a select field's options come from.
///
/// A runtime options map (keyed by field name) supplied by the screen takes
/// precedence; these are the fallbacks baked into the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsSource {
    /// Fixed `(value, label)` pairs.
    Inline(&'static [(&'static str, &'static str)]),

    /// Options loaded from an unpaged backend list when the modal opens.
    Remote {
        /// Path segment of the list endpoint (e.g. `"Operators"` or
        /// `"Connectors/types"`).
        path: &'static str,
        /// Record field used as the option value.
        value_field: &'static str,
        /// Record field used as the option label.
        label_field: &'static str,
    },
}

/// A resolved select option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The closed set of renderable form field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Email,
    Select(OptionsSource),
    Checkbox,
    TextArea,
    Date,
    DateTime,
    /// Read-only base64 PNG payload from the QR endpoint; rendered as a
    /// size hint in the terminal, never editable.
    QrCode,
}

/// One form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub read_only: bool,
    /// Fields sharing a group tag render side by side; purely presentational.
    pub grid_group: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            read_only: false,
            grid_group: None,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub const fn select(name: &'static str, label: &'static str, options: OptionsSource) -> Self {
        Self::new(name, label, FieldKind::Select(options))
    }

    pub const fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub const fn grouped(mut self, group: &'static str) -> Self {
        self.grid_group = Some(group);
        self
    }
}

/// One table column.
///
/// A column with a `render` function ignores the raw value for display and
/// is purely presentational -- it must not mutate the row (it only gets
/// shared references).
#[derive(Clone, Copy)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub render: Option<fn(&Value, &Record) -> String>,
}

impl ColumnSpec {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            render: None,
        }
    }

    pub const fn rendered(
        key: &'static str,
        label: &'static str,
        render: fn(&Value, &Record) -> String,
    ) -> Self {
        Self {
            key,
            label,
            render: Some(render),
        }
    }

    /// Display text for this column in the given row.
    pub fn display(&self, row: &Record) -> String {
        match self.render {
            Some(render) => {
                let raw = row.get(self.key).unwrap_or(&Value::Null);
                render(raw, row)
            }
            None => row.display(self.key),
        }
    }
}

impl std::fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("render", &self.render.map(|_| "fn"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_spec_builders() {
        const FIELD: FieldSpec = FieldSpec::text("name", "Name").required().grouped("row1");
        assert_eq!(FIELD.name, "name");
        assert!(FIELD.required);
        assert_eq!(FIELD.grid_group, Some("row1"));
        assert!(!FIELD.read_only);
    }

    #[test]
    fn test_column_display_plain() {
        let col = ColumnSpec::new("code", "Code");
        let mut row = Record::new();
        row.set("code", json!("BAY-3"));
        assert_eq!(col.display(&row), "BAY-3");
    }

    #[test]
    fn test_column_display_rendered_ignores_raw_value() {
        fn yes_no(v: &Value, _row: &Record) -> String {
            if v.as_bool().unwrap_or(false) {
                "Yes".into()
            } else {
                "No".into()
            }
        }
        let col = ColumnSpec::rendered("active", "Active", yes_no);
        let mut row = Record::new();
        row.set("active", json!(true));
        assert_eq!(col.display(&row), "Yes");
        row.set("active", json!(false));
        assert_eq!(col.display(&row), "No");
    }

    #[test]
    fn test_rendered_column_does_not_mutate_row() {
        fn render(_v: &Value, row: &Record) -> String {
            format!("{} kW", row.display("power"))
        }
        let col = ColumnSpec::rendered("power", "Power", render);
        let mut row = Record::new();
        row.set("power", json!(22));
        let before = row.clone();
        let _ = col.display(&row);
        assert_eq!(row, before);
    }
}
