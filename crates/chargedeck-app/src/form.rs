//! Schema-driven form and filter modals
//!
//! One modal type serves create, edit, and view: the mode enum replaces the
//! paired show-view/show-edit flags the pattern usually accretes. The modal
//! holds a local draft of the entity; every input change touches only the
//! draft, and nothing external mutates until the page submits the draft.
//! The modal itself never talks to the network.

use std::collections::BTreeMap;

use serde_json::Value;

use chargedeck_core::{FieldKind, FieldSpec, Record, SelectOption};

/// What the modal is doing with the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
    /// Read-only: values render verbatim, no draft coercion, no submit.
    View,
}

/// Caller-supplied validation. When present it is the sole authority:
/// returning `Err` blocks submit with the given message and the default
/// required-field check is skipped entirely.
pub type Validator = fn(&Record) -> Result<(), String>;

/// State of the create/edit/view modal.
#[derive(Debug, Clone)]
pub struct FormModal {
    pub mode: FormMode,
    pub fields: &'static [FieldSpec],

    /// The not-yet-submitted copy being edited.
    pub draft: Record,

    /// Update/delete target when editing.
    pub target_id: Option<String>,

    /// Set when the modal was opened from an expanded parent row; the page
    /// refreshes that parent's child list after a successful save.
    pub parent_id: Option<String>,

    /// Focused field index.
    pub focus: usize,

    /// Text buffer per field, coerced into the draft on every change.
    pub buffers: Vec<String>,

    pub error: Option<String>,

    /// Uniform double-submit lockout: set when the page dispatches the
    /// mutation, cleared when its result lands.
    pub submitting: bool,

    pub validator: Option<Validator>,
}

impl FormModal {
    pub fn create(fields: &'static [FieldSpec], validator: Option<Validator>) -> Self {
        Self::with_entity(FormMode::Create, fields, &Record::new(), None, validator)
    }

    /// Create pre-seeded with fields (e.g. the parent station id when adding
    /// a bay from an expanded row).
    pub fn create_seeded(
        fields: &'static [FieldSpec],
        validator: Option<Validator>,
        seed: Record,
        parent_id: Option<String>,
    ) -> Self {
        let mut modal = Self::with_entity(FormMode::Create, fields, &seed, None, validator);
        modal.parent_id = parent_id;
        modal
    }

    pub fn edit(
        fields: &'static [FieldSpec],
        entity: &Record,
        target_id: String,
        validator: Option<Validator>,
    ) -> Self {
        Self::with_entity(FormMode::Edit, fields, entity, Some(target_id), validator)
    }

    pub fn view(fields: &'static [FieldSpec], entity: &Record) -> Self {
        Self::with_entity(FormMode::View, fields, entity, None, None)
    }

    fn with_entity(
        mode: FormMode,
        fields: &'static [FieldSpec],
        entity: &Record,
        target_id: Option<String>,
        validator: Option<Validator>,
    ) -> Self {
        let draft = entity.clone();
        let buffers = fields
            .iter()
            .map(|f| buffer_from_value(entity.get(f.name)))
            .collect();
        Self {
            mode,
            fields,
            draft,
            target_id,
            parent_id: None,
            focus: 0,
            buffers,
            error: None,
            submitting: false,
            validator,
        }
    }

    pub fn focused(&self) -> &FieldSpec {
        &self.fields[self.focus.min(self.fields.len().saturating_sub(1))]
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    fn editable(&self, field: &FieldSpec) -> bool {
        self.mode != FormMode::View
            && !field.read_only
            && !matches!(field.kind, FieldKind::QrCode)
    }

    // ─────────────────────────────────────────────────────────
    // Draft edits
    // ─────────────────────────────────────────────────────────

    pub fn input_char(&mut self, c: char) {
        let field = *self.focused();
        if !self.editable(&field) || matches!(field.kind, FieldKind::Checkbox) {
            return;
        }
        self.buffers[self.focus].push(c);
        self.commit_buffer();
    }

    pub fn backspace(&mut self) {
        let field = *self.focused();
        if !self.editable(&field) || matches!(field.kind, FieldKind::Checkbox) {
            return;
        }
        self.buffers[self.focus].pop();
        self.commit_buffer();
    }

    /// Coerce the focused buffer into the draft. Runs on every change; the
    /// draft always reflects the latest input.
    fn commit_buffer(&mut self) {
        let field = *self.focused();
        let value = coerce_input(field.kind, &self.buffers[self.focus]);
        self.draft.set(field.name, value);
        self.error = None;
    }

    pub fn toggle_checkbox(&mut self) {
        let field = *self.focused();
        if !self.editable(&field) || !matches!(field.kind, FieldKind::Checkbox) {
            return;
        }
        let current = self
            .draft
            .get(field.name)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        self.draft.set(field.name, Value::Bool(!current));
        self.buffers[self.focus] = (!current).to_string();
        self.error = None;
    }

    /// Step the focused select field through `options` (an empty slot first,
    /// which coerces to null).
    pub fn cycle_select(&mut self, options: &[SelectOption], forward: bool) {
        let field = *self.focused();
        if !self.editable(&field) || !matches!(field.kind, FieldKind::Select(_)) {
            return;
        }
        // Positions: 0 = empty, 1..=n = options.
        let slots = options.len() + 1;
        let current = self.current_select_slot(options);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        if next == 0 {
            self.buffers[self.focus] = String::new();
        } else {
            self.buffers[self.focus] = options[next - 1].value.clone();
        }
        self.commit_buffer();
    }

    fn current_select_slot(&self, options: &[SelectOption]) -> usize {
        let buffer = &self.buffers[self.focus];
        if buffer.is_empty() {
            return 0;
        }
        options
            .iter()
            .position(|o| &o.value == buffer)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    // ─────────────────────────────────────────────────────────
    // Validation & submit
    // ─────────────────────────────────────────────────────────

    /// Run validation against the draft. The caller submits only on `Ok`.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(validator) = self.validator {
            return validator(&self.draft);
        }
        for field in self.fields {
            if field.required && !value_filled(self.draft.get(field.name)) {
                return Err(format!("{} is required", field.label));
            }
        }
        Ok(())
    }

    /// Validate and hand the full draft (including untouched fields) to the
    /// caller exactly once. `None` while a prior submit is in flight or the
    /// modal is read-only; on validation failure the error is stored for
    /// display and `None` is returned.
    pub fn take_submission(&mut self) -> Option<Record> {
        if self.mode == FormMode::View || self.submitting {
            return None;
        }
        match self.validate() {
            Ok(()) => {
                self.submitting = true;
                self.error = None;
                Some(self.draft.clone())
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    /// A mutation failed: re-enable the modal so the user can correct and
    /// retry. The modal stays open.
    pub fn submit_failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

// ─────────────────────────────────────────────────────────────────
// Coercion
// ─────────────────────────────────────────────────────────────────

/// Coerce raw input text into a draft value, per field kind:
/// numbers parse to f64 (0 on parse failure), selects turn numeric-looking
/// strings into numbers and empty into null, everything else stays text.
pub fn coerce_input(kind: FieldKind, input: &str) -> Value {
    match kind {
        FieldKind::Number => {
            let parsed = input.trim().parse::<f64>().unwrap_or(0.0);
            serde_json::Number::from_f64(parsed)
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(0))
        }
        FieldKind::Select(_) => {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if let Ok(n) = trimmed.parse::<i64>() {
                Value::from(n)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(trimmed.to_string()))
            } else {
                Value::String(trimmed.to_string())
            }
        }
        FieldKind::Checkbox => Value::Bool(input == "true"),
        FieldKind::Text
        | FieldKind::Email
        | FieldKind::TextArea
        | FieldKind::Date
        | FieldKind::DateTime
        | FieldKind::QrCode => Value::String(input.to_string()),
    }
}

/// Required-field check: empty string, null, missing, and unchecked boxes
/// fail; any number (zero included) passes.
fn value_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(_)) => true,
        Some(_) => true,
    }
}

fn buffer_from_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Filter modal
// ─────────────────────────────────────────────────────────────────

/// The filter variant: same rendering, no required-field validation. Apply
/// returns the draft upward unmodified; Clear resets to empty both locally
/// and upward.
#[derive(Debug, Clone)]
pub struct FilterModal {
    pub fields: &'static [FieldSpec],
    pub buffers: Vec<String>,
    pub focus: usize,
}

impl FilterModal {
    pub fn open(fields: &'static [FieldSpec], current: &BTreeMap<String, String>) -> Self {
        let buffers = fields
            .iter()
            .map(|f| current.get(f.name).cloned().unwrap_or_default())
            .collect();
        Self {
            fields,
            buffers,
            focus: 0,
        }
    }

    pub fn focused(&self) -> &FieldSpec {
        &self.fields[self.focus.min(self.fields.len().saturating_sub(1))]
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.buffers[self.focus].push(c);
    }

    pub fn backspace(&mut self) {
        self.buffers[self.focus].pop();
    }

    /// The filter draft, one entry per non-empty field.
    pub fn apply(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .zip(&self.buffers)
            .filter(|(_, buffer)| !buffer.trim().is_empty())
            .map(|(field, buffer)| (field.name.to_string(), buffer.trim().to_string()))
            .collect()
    }

    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}
