//! Key event routing per screen and overlay

use crate::input_key::InputKey;
use crate::menu::ActionKind;
use crate::message::Message;
use crate::state::{AppPhase, AppState, Overlay, Screen};

use super::{browser, modal, UpdateAction, UpdateResult};
use crate::entities::EntityKind;

/// Route a key press to whatever owns the keyboard: the active overlay
/// first, then the current screen.
pub(crate) fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.screen == Screen::Browser {
        match state.browser.overlay() {
            Overlay::Form => return modal::handle_form_key(state, key),
            Overlay::Filter => return modal::handle_filter_key(state, key),
            Overlay::ConfirmDelete => return modal::handle_confirm_key(state, key),
            Overlay::ResponseInput => return modal::handle_response_key(state, key),
            Overlay::QrCode => return modal::handle_qr_key(state, key),
            Overlay::Menu => return modal::handle_menu_key(state, key),
            Overlay::None => {}
        }
    }

    // Screen-wide bindings.
    match key {
        InputKey::Char('q') | InputKey::CharCtrl('c') => {
            state.phase = AppPhase::Quitting;
            return UpdateResult::none();
        }
        InputKey::Char('0') | InputKey::Char('D') => {
            return UpdateResult::message(Message::ShowDashboard);
        }
        InputKey::Char(c @ '1'..='8') => {
            let idx = (c as usize) - ('1' as usize);
            return UpdateResult::message(Message::SwitchEntity(EntityKind::ALL[idx]));
        }
        _ => {}
    }

    match state.screen {
        Screen::Dashboard => handle_dashboard_key(state, key),
        Screen::Browser => handle_browser_key(state, key),
    }
}

fn handle_dashboard_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('r') => {
            state.dashboard.begin_fetch_all();
            UpdateResult::action(UpdateAction::FetchDashboard)
        }
        InputKey::Tab | InputKey::Enter => {
            UpdateResult::message(Message::SwitchEntity(state.browser.entity.kind))
        }
        _ => UpdateResult::none(),
    }
}

fn handle_browser_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        // ── Parent list navigation ────────────────────────────
        InputKey::Up => {
            state.browser.cursor = state.browser.cursor.saturating_sub(1);
            UpdateResult::none()
        }
        InputKey::Down => {
            let last = state.browser.list.rows.len().saturating_sub(1);
            state.browser.cursor = (state.browser.cursor + 1).min(last);
            UpdateResult::none()
        }
        InputKey::Home => {
            state.browser.cursor = 0;
            UpdateResult::none()
        }
        InputKey::End => {
            state.browser.cursor = state.browser.list.rows.len().saturating_sub(1);
            UpdateResult::none()
        }

        // ── Paging / sorting / refresh ────────────────────────
        InputKey::Left | InputKey::PageUp => {
            if state.browser.list.prev_page() {
                state.browser.cursor = 0;
                UpdateResult::action(browser::fetch_current_page(state))
            } else {
                UpdateResult::none()
            }
        }
        InputKey::Right | InputKey::PageDown => {
            if state.browser.list.next_page() {
                state.browser.cursor = 0;
                UpdateResult::action(browser::fetch_current_page(state))
            } else {
                UpdateResult::none()
            }
        }
        InputKey::Char('o') => {
            state.browser.list.toggle_sort_direction();
            UpdateResult::action(browser::fetch_current_page(state))
        }
        InputKey::Char('s') => {
            // Cycle the sort field through the visible columns.
            let columns = state.browser.entity.columns;
            let current = state.browser.list.sort_field.clone();
            let idx = columns.iter().position(|c| c.key == current).unwrap_or(0);
            let next = columns[(idx + 1) % columns.len()].key;
            state.browser.list.set_sort_field(next);
            UpdateResult::action(browser::fetch_current_page(state))
        }
        InputKey::Char('r') => {
            state.browser.list.bump_refresh();
            UpdateResult::action(browser::fetch_current_page(state))
        }

        // ── Row actions ───────────────────────────────────────
        InputKey::Enter => {
            if let Some(id) = state.browser.selected_row_id() {
                let actions = state.browser.entity.actions;
                state.browser.menu.toggle(&id, actions);
            }
            UpdateResult::none()
        }
        InputKey::Char('v') => browser::run_action(state, ActionKind::View),
        InputKey::Char('e') => browser::run_action(state, ActionKind::Edit),
        InputKey::Char('x') | InputKey::Delete => browser::run_action(state, ActionKind::Delete),
        InputKey::Char('t') => browser::run_action(state, ActionKind::ToggleActivate),
        InputKey::Char('n') => browser::open_create_form(state),
        InputKey::Char('f') => {
            if !state.browser.entity.filter_fields.is_empty() {
                state.browser.filter = Some(crate::form::FilterModal::open(
                    state.browser.entity.filter_fields,
                    &state.browser.list.filters,
                ));
            }
            UpdateResult::none()
        }

        // ── Expandable child rows ─────────────────────────────
        InputKey::Char(' ') => browser::toggle_expand(state),
        InputKey::Char('J') => browser::child_move_cursor(state, true),
        InputKey::Char('K') => browser::child_move_cursor(state, false),
        InputKey::Char(']') => browser::child_change_page(state, true),
        InputKey::Char('[') => browser::child_change_page(state, false),
        InputKey::Char('R') => browser::child_refresh(state),
        InputKey::Char('a') => browser::child_create(state),
        InputKey::Char('E') => browser::child_edit(state),
        InputKey::Char('X') => browser::child_delete(state),

        // ── Tab cycling ───────────────────────────────────────
        InputKey::Tab => {
            let idx = EntityKind::ALL
                .iter()
                .position(|k| *k == state.browser.entity.kind)
                .unwrap_or(0);
            let next = EntityKind::ALL[(idx + 1) % EntityKind::ALL.len()];
            UpdateResult::message(Message::SwitchEntity(next))
        }
        InputKey::BackTab => {
            let idx = EntityKind::ALL
                .iter()
                .position(|k| *k == state.browser.entity.kind)
                .unwrap_or(0);
            let prev = EntityKind::ALL[(idx + EntityKind::ALL.len() - 1) % EntityKind::ALL.len()];
            UpdateResult::message(Message::SwitchEntity(prev))
        }

        _ => UpdateResult::none(),
    }
}
