//! Dashboard handlers

use chargedeck_core::Record;

use crate::dashboard::DashboardCard;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Enter the dashboard screen and fire its aggregate fetches.
pub(crate) fn handle_show(state: &mut AppState) -> UpdateResult {
    state.show_dashboard();
    state.dashboard.begin_fetch_all();
    UpdateResult::action(UpdateAction::FetchDashboard)
}

pub(crate) fn handle_card_loaded(
    state: &mut AppState,
    card: DashboardCard,
    result: Result<Vec<Record>, String>,
) -> UpdateResult {
    match result {
        Ok(records) => state.dashboard.apply_success(card, &records),
        Err(message) => {
            // Failed card renders empty; one banner, no shared state touched.
            state.dashboard.apply_failure(card);
            state
                .notifications
                .error(format!("{}: {message}", card.title()));
        }
    }
    UpdateResult::none()
}
