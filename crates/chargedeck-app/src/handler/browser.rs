//! Entity-screen handlers: paging, expansion, row actions, mutations

use chargedeck_core::{FieldKind, OptionsSource, PageData, Record};

use crate::entities::EntityKind;
use crate::form::FormModal;
use crate::menu::ActionKind;
use crate::message::{Message, MutationKind};
use crate::state::{AppState, ConfirmDeleteState, QrCodeView, ResponseInputState};

use super::{UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────────────
// Fetch plumbing
// ─────────────────────────────────────────────────────────────────

/// Issue a fetch for the browser's current paging inputs.
pub(crate) fn fetch_current_page(state: &mut AppState) -> UpdateAction {
    let request = state.browser.list.request(&state.session);
    let seq = state.browser.list.begin_fetch();
    UpdateAction::FetchPage {
        entity: state.browser.entity.kind,
        request,
        seq,
    }
}

/// Issue a child-list fetch for one expanded parent row.
pub(crate) fn fetch_related(state: &mut AppState, parent_id: &str, page: u32) -> UpdateAction {
    let child = state
        .browser
        .entity
        .child
        .expect("fetch_related only reachable on entities with a child list");
    state.browser.related.begin_load(parent_id, page);
    UpdateAction::FetchRelated {
        child: child.entity,
        scope_segment: child.scope_segment,
        parent_id: parent_id.to_string(),
        page,
        page_size: state.browser.related.page_size(),
        sort_field: child.entity.descriptor().default_sort,
    }
}

pub(crate) fn handle_switch_entity(state: &mut AppState, kind: EntityKind) -> UpdateResult {
    state.switch_entity(kind);
    UpdateResult::action(fetch_current_page(state))
}

// ─────────────────────────────────────────────────────────────────
// Data results
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_page_loaded(
    state: &mut AppState,
    entity: EntityKind,
    seq: u64,
    result: Result<PageData, String>,
) -> UpdateResult {
    // A response for a screen the user has already left is dropped whole.
    if state.browser.entity.kind != entity {
        return UpdateResult::none();
    }
    match result {
        Ok(data) => {
            if state.browser.list.apply_success(seq, data) {
                state.browser.clamp_cursor();
            }
        }
        Err(message) => {
            // Failures degrade to an empty page plus exactly one banner;
            // nothing propagates past this point.
            if state.browser.list.apply_failure(seq) {
                state.browser.cursor = 0;
                state.notifications.error(message);
            }
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_related_loaded(
    state: &mut AppState,
    parent_id: String,
    result: Result<PageData, String>,
) -> UpdateResult {
    match result {
        Ok(data) => state.browser.related.apply_success(&parent_id, data),
        Err(message) => {
            // The one re-throwing path: the load failure collapses the row
            // and the page attaches a parent-specific message.
            state.browser.related.apply_failure(&parent_id);
            let label = parent_label(state, &parent_id);
            state
                .notifications
                .error(format!("Failed to load bays for {label}: {message}"));
        }
    }
    UpdateResult::none()
}

/// Best display label for a parent row (falls back to the raw id).
fn parent_label(state: &AppState, parent_id: &str) -> String {
    let id_field = state.browser.entity.resource.id_field;
    state
        .browser
        .list
        .rows
        .iter()
        .find(|row| row.id(id_field).as_deref() == Some(parent_id))
        .map(|row| {
            let name = row.display("name");
            if name.is_empty() {
                format!("#{parent_id}")
            } else {
                name
            }
        })
        .unwrap_or_else(|| format!("#{parent_id}"))
}

pub(crate) fn handle_options_loaded(
    state: &mut AppState,
    field: &'static str,
    result: Result<Vec<chargedeck_core::SelectOption>, String>,
) -> UpdateResult {
    match result {
        Ok(options) => {
            state.browser.options.insert(field, options);
        }
        Err(message) => state.notifications.error(message),
    }
    UpdateResult::none()
}

pub(crate) fn handle_mutation_done(
    state: &mut AppState,
    entity: EntityKind,
    kind: MutationKind,
    parent_id: Option<String>,
    result: Result<(), String>,
) -> UpdateResult {
    state.browser.mutation_in_flight = false;

    match result {
        Ok(()) => {
            // Close whichever overlay initiated the mutation.
            state.browser.form = None;
            state.browser.confirm_delete = None;
            state.browser.response_input = None;

            let noun = entity.descriptor().resource.name;
            state
                .notifications
                .success(format!("{} {}", capitalize(noun), kind.done_label()));

            // The list re-fetches via the bumped refresh counter; a child
            // mutation also refreshes its parent's expanded list in place.
            if state.browser.entity.kind == entity || parent_id.is_some() {
                state.browser.list.bump_refresh();
            }
            let fetch = fetch_current_page(state);
            match parent_id {
                Some(parent_id) => {
                    UpdateResult::both(Message::RefreshRelated { parent_id }, fetch)
                }
                None => UpdateResult::action(fetch),
            }
        }
        Err(message) => {
            // The initiating overlay stays open so the user can correct and
            // retry; its in-flight flag is already reset. The failure also
            // surfaces as a transient banner like every other failure.
            state.notifications.error(message.clone());
            if let Some(form) = &mut state.browser.form {
                form.submit_failed(message);
            }
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_refresh_related(state: &mut AppState, parent_id: String) -> UpdateResult {
    if state.browser.entity.child.is_none() {
        return UpdateResult::none();
    }
    // Refresh at the parent's current page, never resetting pagination.
    match state.browser.related.refresh_page(&parent_id) {
        Some(page) => UpdateResult::action(fetch_related(state, &parent_id, page)),
        None => UpdateResult::none(),
    }
}

pub(crate) fn handle_qr_loaded(
    state: &mut AppState,
    station_id: String,
    result: Result<String, String>,
) -> UpdateResult {
    let Some(qr) = &mut state.browser.qr else {
        return UpdateResult::none();
    };
    if qr.station_id != station_id {
        return UpdateResult::none();
    }
    match result {
        Ok(payload) => {
            qr.loading = false;
            qr.payload = Some(payload);
        }
        Err(message) => {
            state.browser.qr = None;
            state.notifications.error(message);
        }
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────
// Row actions
// ─────────────────────────────────────────────────────────────────

/// Run an action against the currently selected parent row.
pub(crate) fn run_action(state: &mut AppState, action: ActionKind) -> UpdateResult {
    if !state.browser.entity.actions.contains(&action) {
        return UpdateResult::none();
    }
    let Some(row) = state.browser.selected_row().cloned() else {
        return UpdateResult::none();
    };
    let Some(id) = row.id(state.browser.entity.resource.id_field) else {
        return UpdateResult::none();
    };
    state.browser.menu.close();

    match action {
        ActionKind::View => {
            state.browser.form = Some(FormModal::view(state.browser.entity.form_fields, &row));
            UpdateResult::none()
        }
        ActionKind::Edit => {
            let entity = state.browser.entity;
            state.browser.form = Some(FormModal::edit(
                entity.form_fields,
                &row,
                id,
                entity.validator,
            ));
            options_fetch(state)
        }
        ActionKind::Delete => {
            state.browser.confirm_delete = Some(ConfirmDeleteState {
                id,
                label: row_label(&row),
                parent_id: None,
            });
            UpdateResult::none()
        }
        ActionKind::ToggleActivate => {
            if state.browser.mutation_in_flight {
                return UpdateResult::none();
            }
            state.browser.mutation_in_flight = true;
            UpdateResult::action(UpdateAction::ToggleActivate {
                entity: state.browser.entity.kind,
                id,
            })
        }
        ActionKind::Approve | ActionKind::Reject => {
            state.browser.response_input = Some(ResponseInputState {
                request_id: id,
                approve: action == ActionKind::Approve,
                buffer: String::new(),
            });
            UpdateResult::none()
        }
        ActionKind::QrCode => {
            state.browser.qr = Some(QrCodeView {
                station_id: id.clone(),
                payload: None,
                loading: true,
            });
            UpdateResult::action(UpdateAction::FetchQrCode { station_id: id })
        }
    }
}

fn row_label(row: &Record) -> String {
    for field in ["name", "code", "fullName", "companyName", "email"] {
        let label = row.display(field);
        if !label.is_empty() {
            return label;
        }
    }
    "this record".to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Open the create form for the active entity.
pub(crate) fn open_create_form(state: &mut AppState) -> UpdateResult {
    let entity = state.browser.entity;
    if !entity.can_create {
        return UpdateResult::none();
    }
    state.browser.form = Some(FormModal::create(entity.form_fields, entity.validator));
    options_fetch(state)
}

/// Queue remote option lookups for every select field of the open form that
/// has no options resolved yet. Inline sources resolve locally.
pub(crate) fn options_fetch(state: &mut AppState) -> UpdateResult {
    let Some(form) = &state.browser.form else {
        return UpdateResult::none();
    };
    let mut requests = Vec::new();
    for field in form.fields {
        if let FieldKind::Select(source) = field.kind {
            if state.browser.options.contains_key(field.name) {
                continue;
            }
            match source {
                OptionsSource::Inline(_) => {} // resolved straight from the schema
                OptionsSource::Remote { .. } => requests.push((field.name, source)),
            }
        }
    }
    if requests.is_empty() {
        UpdateResult::none()
    } else {
        UpdateResult::action(UpdateAction::FetchOptions { requests })
    }
}

// ─────────────────────────────────────────────────────────────────
// Expansion (parent/child rows)
// ─────────────────────────────────────────────────────────────────

/// Toggle the selected parent row's child list.
pub(crate) fn toggle_expand(state: &mut AppState) -> UpdateResult {
    if state.browser.entity.child.is_none() {
        return UpdateResult::none();
    }
    let Some(parent_id) = state.browser.selected_row_id() else {
        return UpdateResult::none();
    };
    use crate::related::ToggleOutcome;
    match state.browser.related.toggle(&parent_id) {
        ToggleOutcome::ExpandedNeedsLoad { page } => {
            UpdateResult::action(fetch_related(state, &parent_id, page))
        }
        // Cached or collapsed: zero fetches.
        ToggleOutcome::ExpandedCached | ToggleOutcome::Collapsed => UpdateResult::none(),
    }
}

/// Change the expanded child list's page for the selected parent.
pub(crate) fn child_change_page(state: &mut AppState, forward: bool) -> UpdateResult {
    let Some(parent_id) = expanded_parent_id(state) else {
        return UpdateResult::none();
    };
    match state.browser.related.neighbor_page(&parent_id, forward) {
        Some(page) => UpdateResult::action(fetch_related(state, &parent_id, page)),
        None => UpdateResult::none(),
    }
}

/// Explicit refresh of the expanded child list at its current page.
pub(crate) fn child_refresh(state: &mut AppState) -> UpdateResult {
    let Some(parent_id) = expanded_parent_id(state) else {
        return UpdateResult::none();
    };
    handle_refresh_related(state, parent_id)
}

/// Move the child cursor within the selected parent's expanded list.
pub(crate) fn child_move_cursor(state: &mut AppState, down: bool) -> UpdateResult {
    let Some(parent_id) = expanded_parent_id(state) else {
        return UpdateResult::none();
    };
    if let Some(child_state) = state.browser.related.state_mut(&parent_id) {
        let last = child_state.rows.len().saturating_sub(1);
        child_state.cursor = if down {
            (child_state.cursor + 1).min(last)
        } else {
            child_state.cursor.saturating_sub(1)
        };
    }
    UpdateResult::none()
}

/// Open the create form for a child record, pre-seeded with the parent id.
pub(crate) fn child_create(state: &mut AppState) -> UpdateResult {
    let Some(child) = state.browser.entity.child else {
        return UpdateResult::none();
    };
    let Some(parent_id) = expanded_parent_id(state) else {
        return UpdateResult::none();
    };
    let descriptor = child.entity.descriptor();
    let mut seed = Record::new();
    seed.set(
        child.parent_field,
        serde_json::Value::String(parent_id.clone()),
    );
    state.browser.form = Some(FormModal::create_seeded(
        descriptor.form_fields,
        descriptor.validator,
        seed,
        Some(parent_id),
    ));
    options_fetch(state)
}

/// Edit the selected child row of the expanded parent.
pub(crate) fn child_edit(state: &mut AppState) -> UpdateResult {
    let Some(child) = state.browser.entity.child else {
        return UpdateResult::none();
    };
    let Some(parent_id) = expanded_parent_id(state) else {
        return UpdateResult::none();
    };
    let descriptor = child.entity.descriptor();
    let Some((row, id)) = selected_child_row(state, &parent_id, descriptor.resource.id_field)
    else {
        return UpdateResult::none();
    };
    let mut form = FormModal::edit(descriptor.form_fields, &row, id, descriptor.validator);
    form.parent_id = Some(parent_id);
    state.browser.form = Some(form);
    options_fetch(state)
}

/// Delete the selected child row of the expanded parent (with confirm).
pub(crate) fn child_delete(state: &mut AppState) -> UpdateResult {
    let Some(child) = state.browser.entity.child else {
        return UpdateResult::none();
    };
    let Some(parent_id) = expanded_parent_id(state) else {
        return UpdateResult::none();
    };
    let id_field = child.entity.descriptor().resource.id_field;
    let Some((row, id)) = selected_child_row(state, &parent_id, id_field) else {
        return UpdateResult::none();
    };
    state.browser.confirm_delete = Some(ConfirmDeleteState {
        id,
        label: row_label(&row),
        parent_id: Some(parent_id),
    });
    UpdateResult::none()
}

fn expanded_parent_id(state: &AppState) -> Option<String> {
    let parent_id = state.browser.selected_row_id()?;
    state
        .browser
        .related
        .is_expanded(&parent_id)
        .then_some(parent_id)
}

fn selected_child_row(
    state: &AppState,
    parent_id: &str,
    id_field: &str,
) -> Option<(Record, String)> {
    let child_state = state.browser.related.state(parent_id)?;
    let row = child_state.rows.get(child_state.cursor)?.clone();
    let id = row.id(id_field)?;
    Some((row, id))
}
