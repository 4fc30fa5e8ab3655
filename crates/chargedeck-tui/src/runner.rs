//! Main event loop: terminal events in, messages through the TEA update,
//! frames out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use chargedeck_api::ApiClient;
use chargedeck_app::message::Message;
use chargedeck_app::{process_message, AppState};
use chargedeck_core::prelude::*;

use crate::event;
use crate::render;
use crate::terminal::install_panic_hook;

/// Capacity of the result-message channel. Fetch results are small; a burst
/// beyond this just backpressures the producing tasks.
const CHANNEL_CAPACITY: usize = 256;

/// Run the TUI until the user quits. Returns the final state so the binary
/// can persist or clear the session.
pub async fn run(mut state: AppState, api: Arc<ApiClient>) -> Result<AppState> {
    install_panic_hook();
    let mut terminal = ratatui::init();

    let (msg_tx, mut msg_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
    let tick_rate = Duration::from_millis(state.settings.ui.tick_rate_ms.max(10));

    // Initial load: the dashboard fires its aggregate fetches.
    process_message(&mut state, Message::ShowDashboard, &api, &msg_tx);

    let result = event_loop(&mut state, &api, &msg_tx, &mut msg_rx, &mut terminal, tick_rate);

    ratatui::restore();
    result.map(|()| state)
}

fn event_loop(
    state: &mut AppState,
    api: &Arc<ApiClient>,
    msg_tx: &mpsc::Sender<Message>,
    msg_rx: &mut mpsc::Receiver<Message>,
    terminal: &mut ratatui::DefaultTerminal,
    tick_rate: Duration,
) -> Result<()> {
    while !state.should_quit() {
        terminal
            .draw(|frame| render::draw(frame, state))
            .map_err(|e| Error::terminal(e.to_string()))?;

        // Terminal events (or a tick on timeout). Polling blocks this
        // thread briefly; spawned fetches run on the rest of the runtime.
        if let Some(message) = event::poll(tick_rate)? {
            process_message(state, message, api, msg_tx);
        }

        // Drain any fetch results that landed meanwhile.
        while let Ok(message) = msg_rx.try_recv() {
            process_message(state, message, api, msg_tx);
        }
    }
    info!("Event loop finished");
    Ok(())
}
