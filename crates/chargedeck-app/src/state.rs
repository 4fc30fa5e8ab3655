//! Application state (Model in TEA pattern)

use std::collections::HashMap;

use chargedeck_core::{AuthSession, OptionsSource, Record, SelectOption};

use crate::config::Settings;
use crate::dashboard::DashboardState;
use crate::entities::{EntityDescriptor, EntityKind};
use crate::form::{FilterModal, FormModal};
use crate::list::PagedList;
use crate::menu::ActionMenu;
use crate::notifications::Notifications;
use crate::related::RelatedRows;

/// Application lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Browser,
}

/// Which overlay owns the keyboard, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Form,
    Filter,
    ConfirmDelete,
    ResponseInput,
    QrCode,
    Menu,
}

/// Pending delete confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmDeleteState {
    pub id: String,
    /// Human label of the doomed row, shown in the prompt.
    pub label: String,
    /// Set when deleting a child row from an expanded parent; the parent's
    /// child list refreshes at its current page afterwards.
    pub parent_id: Option<String>,
}

/// Admin-response prompt for approving/rejecting an account request.
#[derive(Debug, Clone)]
pub struct ResponseInputState {
    pub request_id: String,
    pub approve: bool,
    pub buffer: String,
}

/// QR payload viewer for a station.
#[derive(Debug, Clone)]
pub struct QrCodeView {
    pub station_id: String,
    /// Base64 PNG payload once loaded.
    pub payload: Option<String>,
    pub loading: bool,
}

/// State of the active entity screen. Recreated on every tab switch: screen
/// state is owned by the page and discarded on navigation away.
#[derive(Debug, Clone)]
pub struct BrowserState {
    pub entity: &'static EntityDescriptor,
    pub list: PagedList,
    pub related: RelatedRows,

    /// Parent-row cursor.
    pub cursor: usize,

    pub menu: ActionMenu,
    pub form: Option<FormModal>,
    pub filter: Option<FilterModal>,
    pub confirm_delete: Option<ConfirmDeleteState>,
    pub response_input: Option<ResponseInputState>,
    pub qr: Option<QrCodeView>,

    /// Resolved select options keyed by field name (the caller-supplied
    /// `dropdownOptions` of the form contract).
    pub options: HashMap<&'static str, Vec<SelectOption>>,

    /// Lockout for mutations that run without a form modal (delete,
    /// toggle-activate, approve/reject). Uniform double-submit prevention.
    pub mutation_in_flight: bool,
}

impl BrowserState {
    pub fn new(entity: &'static EntityDescriptor, page_size: u32) -> Self {
        let child_page_size = entity.child.map(|c| c.page_size).unwrap_or(5);
        Self {
            entity,
            list: PagedList::new(page_size, entity.default_sort),
            related: RelatedRows::new(child_page_size),
            cursor: 0,
            menu: ActionMenu::new(),
            form: None,
            filter: None,
            confirm_delete: None,
            response_input: None,
            qr: None,
            options: HashMap::new(),
            mutation_in_flight: false,
        }
    }

    pub fn selected_row(&self) -> Option<&Record> {
        self.list.rows.get(self.cursor)
    }

    pub fn selected_row_id(&self) -> Option<String> {
        self.selected_row()
            .and_then(|r| r.id(self.entity.resource.id_field))
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.list.rows.len().saturating_sub(1));
    }

    /// Options for a select field: the runtime map wins (loaded lists),
    /// falling back to the schema's inline pairs.
    pub fn resolve_options(&self, field: &str) -> Vec<SelectOption> {
        if let Some(options) = self.options.get(field) {
            return options.clone();
        }
        for spec in self.entity.form_fields {
            if spec.name == field {
                if let chargedeck_core::FieldKind::Select(OptionsSource::Inline(pairs)) = spec.kind
                {
                    return pairs
                        .iter()
                        .map(|(v, l)| SelectOption::new(*v, *l))
                        .collect();
                }
            }
        }
        Vec::new()
    }

    /// The overlay that currently owns the keyboard.
    pub fn overlay(&self) -> Overlay {
        if self.form.is_some() {
            Overlay::Form
        } else if self.filter.is_some() {
            Overlay::Filter
        } else if self.confirm_delete.is_some() {
            Overlay::ConfirmDelete
        } else if self.response_input.is_some() {
            Overlay::ResponseInput
        } else if self.qr.is_some() {
            Overlay::QrCode
        } else if self.menu.is_open() {
            Overlay::Menu
        } else {
            Overlay::None
        }
    }

    /// Rows rendered below the cursor row (used for menu flip placement).
    pub fn rows_below_cursor(&self) -> usize {
        self.list.rows.len().saturating_sub(self.cursor + 1)
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub browser: BrowserState,
    pub dashboard: DashboardState,
    pub notifications: Notifications,

    /// The one authenticated session, threaded into every spawned fetch.
    pub session: AuthSession,

    pub settings: Settings,
    pub phase: AppPhase,

    /// Set when the backend session became unusable mid-run; the binary
    /// clears the persisted session file on exit.
    pub session_invalid: bool,
}

impl AppState {
    pub fn new(session: AuthSession, settings: Settings) -> Self {
        let page_size = settings.ui.page_size;
        Self {
            screen: Screen::Dashboard,
            browser: BrowserState::new(EntityKind::Stations.descriptor(), page_size),
            dashboard: DashboardState::new(),
            notifications: Notifications::new(),
            session,
            settings,
            phase: AppPhase::Running,
            session_invalid: false,
        }
    }

    /// Switch the browser to another entity. The previous screen's state is
    /// discarded wholesale -- paging, filters, expansions, and modals do not
    /// survive navigation.
    pub fn switch_entity(&mut self, kind: EntityKind) {
        self.browser = BrowserState::new(kind.descriptor(), self.settings.ui.page_size);
        self.screen = Screen::Browser;
    }

    pub fn show_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn notification_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.settings.behavior.notification_ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_core::{Role, UserProfile};
    use chrono::{Duration, Utc};
    use serde_json::json;

    pub(crate) fn test_session(role: Role, operator_id: Option<&str>) -> AuthSession {
        AuthSession {
            token: "tok".into(),
            refresh_token: "ref".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: UserProfile {
                id: "u1".into(),
                email: "a@b.c".into(),
                full_name: "A".into(),
            },
            role,
            operator_id: operator_id.map(String::from),
        }
    }

    #[test]
    fn test_switch_entity_discards_screen_state() {
        let mut state = AppState::new(test_session(Role::Admin, None), Settings::default());
        state.switch_entity(EntityKind::Stations);
        state.browser.cursor = 3;
        state.browser.list.set_page(4);
        state.browser.related.toggle("st-1");

        state.switch_entity(EntityKind::Operators);
        assert_eq!(state.browser.entity.kind, EntityKind::Operators);
        assert_eq!(state.browser.cursor, 0);
        assert_eq!(state.browser.list.page, 1);
        assert!(!state.browser.related.is_expanded("st-1"));
    }

    #[test]
    fn test_overlay_priority() {
        let mut state = AppState::new(test_session(Role::Admin, None), Settings::default());
        state.switch_entity(EntityKind::Stations);
        assert_eq!(state.browser.overlay(), Overlay::None);

        state.browser.menu.toggle("row-1", &[crate::menu::ActionKind::View]);
        assert_eq!(state.browser.overlay(), Overlay::Menu);

        state.browser.confirm_delete = Some(ConfirmDeleteState {
            id: "1".into(),
            label: "Station 1".into(),
            parent_id: None,
        });
        assert_eq!(state.browser.overlay(), Overlay::ConfirmDelete);

        state.browser.form = Some(crate::form::FormModal::create(
            state.browser.entity.form_fields,
            None,
        ));
        assert_eq!(state.browser.overlay(), Overlay::Form);
    }

    #[test]
    fn test_resolve_options_runtime_map_wins_over_inline() {
        let mut state = AppState::new(test_session(Role::Admin, None), Settings::default());
        state.switch_entity(EntityKind::ChargingBays);

        // Inline fallback from the schema.
        let inline = state.browser.resolve_options("status");
        assert!(inline.iter().any(|o| o.value == "Available"));

        // Runtime-supplied options take precedence.
        state
            .browser
            .options
            .insert("status", vec![SelectOption::new("X", "Only this")]);
        let resolved = state.browser.resolve_options("status");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].value, "X");
    }

    #[test]
    fn test_selected_row_id_uses_entity_id_field() {
        let mut state = AppState::new(test_session(Role::Admin, None), Settings::default());
        state.switch_entity(EntityKind::Users);
        state.browser.list.rows = vec![
            serde_json::from_value(json!({"userId": "u-1", "fullName": "Ada"})).unwrap(),
        ];
        assert_eq!(state.browser.selected_row_id().as_deref(), Some("u-1"));
    }
}
