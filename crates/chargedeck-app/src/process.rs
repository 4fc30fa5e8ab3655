//! Message processing loop glue (TEA)

use std::sync::Arc;

use tokio::sync::mpsc;

use chargedeck_api::ApiClient;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function, dispatching any
/// resulting actions and draining follow-up messages.
pub fn process_message(
    state: &mut AppState,
    message: Message,
    api: &Arc<ApiClient>,
    msg_tx: &mpsc::Sender<Message>,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, api.clone(), state.session.clone(), msg_tx.clone());
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
