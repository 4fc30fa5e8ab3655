//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{browser, dashboard, keys, UpdateResult};

/// Process a message and update state.
/// Returns optional follow-up message and/or action.
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => keys::handle_key(state, key),

        Message::Tick => {
            let ttl = state.notification_ttl();
            state.notifications.tick(ttl);
            UpdateResult::none()
        }

        Message::SwitchEntity(kind) => browser::handle_switch_entity(state, kind),

        Message::ShowDashboard => dashboard::handle_show(state),

        // ─────────────────────────────────────────────────────────
        // Data results
        // ─────────────────────────────────────────────────────────
        Message::PageLoaded {
            entity,
            seq,
            result,
        } => browser::handle_page_loaded(state, entity, seq, result),

        Message::RelatedLoaded { parent_id, result } => {
            browser::handle_related_loaded(state, parent_id, result)
        }

        Message::OptionsLoaded { field, result } => {
            browser::handle_options_loaded(state, field, result)
        }

        Message::MutationDone {
            entity,
            kind,
            parent_id,
            result,
        } => browser::handle_mutation_done(state, entity, kind, parent_id, result),

        Message::RefreshRelated { parent_id } => {
            browser::handle_refresh_related(state, parent_id)
        }

        Message::QrCodeLoaded { station_id, result } => {
            browser::handle_qr_loaded(state, station_id, result)
        }

        Message::DashboardLoaded { card, result } => {
            dashboard::handle_card_loaded(state, card, result)
        }

        Message::SessionInvalid { message } => {
            tracing::warn!("Session invalidated: {message}");
            state.session_invalid = true;
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }
    }
}
