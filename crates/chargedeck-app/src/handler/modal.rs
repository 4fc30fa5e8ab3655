//! Overlay key handlers: form, filter, confirm, admin response, QR, menu

use crate::form::FormMode;
use crate::input_key::InputKey;
use crate::message::MutationKind;
use crate::state::AppState;

use super::{browser, UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────────────
// Form modal
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_form_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(form) = &mut state.browser.form else {
        return UpdateResult::none();
    };

    // View mode: read-only, any dismiss key closes.
    if form.mode == FormMode::View {
        if matches!(key, InputKey::Esc | InputKey::Enter | InputKey::Char('q')) {
            state.browser.form = None;
        }
        return UpdateResult::none();
    }

    match key {
        InputKey::Esc => {
            // In-flight submits keep their lockout until the result lands;
            // closing the modal just abandons the draft.
            state.browser.form = None;
            UpdateResult::none()
        }
        InputKey::Tab | InputKey::Down => {
            form.focus_next();
            UpdateResult::none()
        }
        InputKey::BackTab | InputKey::Up => {
            form.focus_prev();
            UpdateResult::none()
        }
        InputKey::Left | InputKey::Right => {
            let field = *form.focused();
            if matches!(field.kind, chargedeck_core::FieldKind::Select(_)) {
                let options = state.browser.resolve_options(field.name);
                // borrow again after resolve_options released the form borrow
                if let Some(form) = &mut state.browser.form {
                    form.cycle_select(&options, key == InputKey::Right);
                }
            }
            UpdateResult::none()
        }
        InputKey::Char(' ') => {
            let field = *form.focused();
            match field.kind {
                chargedeck_core::FieldKind::Checkbox => form.toggle_checkbox(),
                chargedeck_core::FieldKind::Select(_) => {
                    let options = state.browser.resolve_options(field.name);
                    if let Some(form) = &mut state.browser.form {
                        form.cycle_select(&options, true);
                    }
                }
                _ => form.input_char(' '),
            }
            UpdateResult::none()
        }
        InputKey::Char(c) => {
            form.input_char(c);
            UpdateResult::none()
        }
        InputKey::Backspace => {
            form.backspace();
            UpdateResult::none()
        }
        InputKey::Enter => submit_form(state),
        _ => UpdateResult::none(),
    }
}

fn submit_form(state: &mut AppState) -> UpdateResult {
    let Some(form) = &mut state.browser.form else {
        return UpdateResult::none();
    };
    let Some(draft) = form.take_submission() else {
        return UpdateResult::none();
    };

    let parent_id = form.parent_id.clone();
    let target_id = form.target_id.clone();
    // A child form mutates the child entity, not the one on screen.
    let entity = match (parent_id.as_deref(), state.browser.entity.child) {
        (Some(_), Some(child)) => child.entity,
        _ => state.browser.entity.kind,
    };

    match target_id {
        Some(id) => UpdateResult::action(UpdateAction::UpdateRecord {
            entity,
            id,
            record: draft,
            parent_id,
        }),
        None => UpdateResult::action(UpdateAction::Create {
            entity,
            record: draft,
            parent_id,
        }),
    }
}

// ─────────────────────────────────────────────────────────────────
// Filter modal
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_filter_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(filter) = &mut state.browser.filter else {
        return UpdateResult::none();
    };
    match key {
        InputKey::Esc => {
            state.browser.filter = None;
            UpdateResult::none()
        }
        InputKey::Tab | InputKey::Down => {
            filter.focus_next();
            UpdateResult::none()
        }
        InputKey::BackTab | InputKey::Up => {
            filter.focus_prev();
            UpdateResult::none()
        }
        InputKey::Char(c) => {
            filter.input_char(c);
            UpdateResult::none()
        }
        InputKey::Backspace => {
            filter.backspace();
            UpdateResult::none()
        }
        InputKey::Enter => {
            // Apply: the draft goes upward unmodified and the list re-fetches.
            let applied = filter.apply();
            state.browser.filter = None;
            state.browser.list.set_filters(applied);
            UpdateResult::action(browser::fetch_current_page(state))
        }
        InputKey::CharCtrl('r') => {
            // Clear resets both the local draft and the applied filters.
            filter.clear();
            state.browser.list.clear_filters();
            UpdateResult::action(browser::fetch_current_page(state))
        }
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Delete confirmation
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_confirm_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Enter | InputKey::Char('y') => {
            if state.browser.mutation_in_flight {
                return UpdateResult::none();
            }
            let Some(confirm) = &state.browser.confirm_delete else {
                return UpdateResult::none();
            };
            let entity = match (confirm.parent_id.as_deref(), state.browser.entity.child) {
                (Some(_), Some(child)) => child.entity,
                _ => state.browser.entity.kind,
            };
            state.browser.mutation_in_flight = true;
            UpdateResult::action(UpdateAction::DeleteRecord {
                entity,
                id: confirm.id.clone(),
                parent_id: confirm.parent_id.clone(),
            })
        }
        InputKey::Esc | InputKey::Char('n') => {
            state.browser.confirm_delete = None;
            UpdateResult::none()
        }
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Admin response prompt (approve / reject)
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_response_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(input) = &mut state.browser.response_input else {
        return UpdateResult::none();
    };
    match key {
        InputKey::Esc => {
            state.browser.response_input = None;
            UpdateResult::none()
        }
        InputKey::Char(c) => {
            input.buffer.push(c);
            UpdateResult::none()
        }
        InputKey::Backspace => {
            input.buffer.pop();
            UpdateResult::none()
        }
        InputKey::Enter => {
            if state.browser.mutation_in_flight {
                return UpdateResult::none();
            }
            state.browser.mutation_in_flight = true;
            let action = if input.approve {
                UpdateAction::Approve {
                    id: input.request_id.clone(),
                    response: input.buffer.clone(),
                }
            } else {
                UpdateAction::Reject {
                    id: input.request_id.clone(),
                    response: input.buffer.clone(),
                }
            };
            UpdateResult::action(action)
        }
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────
// QR viewer
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_qr_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if matches!(key, InputKey::Esc | InputKey::Enter | InputKey::Char('q')) {
        state.browser.qr = None;
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────
// Action menu
// ─────────────────────────────────────────────────────────────────

pub(crate) fn handle_menu_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Down => {
            state.browser.menu.select_next();
            UpdateResult::none()
        }
        InputKey::Up => {
            state.browser.menu.select_prev();
            UpdateResult::none()
        }
        InputKey::Enter => {
            let Some(action) = state.browser.menu.selected_action() else {
                return UpdateResult::none();
            };
            browser::run_action(state, action)
        }
        // Any interaction outside the menu closes it.
        _ => {
            state.browser.menu.close();
            UpdateResult::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::entities::EntityKind;
    use crate::state::AppState;
    use chargedeck_core::{Role, UserProfile};
    use chrono::{Duration, Utc};

    fn admin_state(kind: EntityKind) -> AppState {
        let session = chargedeck_core::AuthSession {
            token: "tok".into(),
            refresh_token: "ref".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: UserProfile {
                id: "u".into(),
                email: "a@b.c".into(),
                full_name: "A".into(),
            },
            role: Role::Admin,
            operator_id: None,
        };
        let mut state = AppState::new(session, Settings::default());
        state.switch_entity(kind);
        state
    }

    #[test]
    fn test_filter_apply_resets_page_and_fetches() {
        let mut state = admin_state(EntityKind::Stations);
        state.browser.list.total_items = 100;
        state.browser.list.set_page(5);

        state.browser.filter = Some(crate::form::FilterModal::open(
            state.browser.entity.filter_fields,
            &Default::default(),
        ));
        for c in "Riverside".chars() {
            handle_filter_key(&mut state, InputKey::Char(c));
        }
        let result = handle_filter_key(&mut state, InputKey::Enter);

        assert!(state.browser.filter.is_none());
        assert_eq!(state.browser.list.page, 1);
        assert_eq!(
            state.browser.list.filters.get("name").map(String::as_str),
            Some("Riverside")
        );
        assert!(matches!(
            result.action,
            Some(UpdateAction::FetchPage { .. })
        ));
    }

    #[test]
    fn test_filter_clear_resets_local_and_applied() {
        let mut state = admin_state(EntityKind::Stations);
        let mut current = std::collections::BTreeMap::new();
        current.insert("name".to_string(), "Riverside".to_string());
        state.browser.list.set_filters(current.clone());
        state.browser.filter = Some(crate::form::FilterModal::open(
            state.browser.entity.filter_fields,
            &current,
        ));

        let result = handle_filter_key(&mut state, InputKey::CharCtrl('r'));
        assert!(state.browser.list.filters.is_empty());
        assert!(state
            .browser
            .filter
            .as_ref()
            .unwrap()
            .buffers
            .iter()
            .all(String::is_empty));
        assert!(matches!(result.action, Some(UpdateAction::FetchPage { .. })));
    }

    #[test]
    fn test_confirm_delete_double_submit_lockout() {
        let mut state = admin_state(EntityKind::Operators);
        state.browser.confirm_delete = Some(crate::state::ConfirmDeleteState {
            id: "7".into(),
            label: "Allego".into(),
            parent_id: None,
        });

        let first = handle_confirm_key(&mut state, InputKey::Enter);
        assert!(matches!(
            first.action,
            Some(UpdateAction::DeleteRecord { ref id, .. }) if id == "7"
        ));
        assert!(state.browser.mutation_in_flight);

        // Second Enter while in flight does nothing.
        let second = handle_confirm_key(&mut state, InputKey::Enter);
        assert!(second.action.is_none());
    }

    #[test]
    fn test_menu_outside_key_closes() {
        let mut state = admin_state(EntityKind::Operators);
        state
            .browser
            .menu
            .toggle("op-1", state.browser.entity.actions);
        assert!(state.browser.menu.is_open());

        handle_menu_key(&mut state, InputKey::Char('z'));
        assert!(!state.browser.menu.is_open());
    }
}
