use crate::chat::dispatcher::DispatchError;
use crate::chat::events::ClientEvent;
use crate::registry::ConnectionId;
use crate::state::AppState;

/// Handle an incoming text frame.
/// Decodes the JSON event and dispatches it. Malformed frames are logged and
/// skipped; the connection stays open.
pub fn handle_text_message(text: &str, state: &AppState, connection_id: ConnectionId) {
    let event = match ClientEvent::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                connection_id = %connection_id,
                error = %e,
                "Failed to decode client event: {}",
                text.chars().take(100).collect::<String>()
            );
            return;
        }
    };

    match state.dispatcher.handle_client_event(connection_id, event) {
        Ok(()) => {}
        Err(DispatchError::UnknownConnection(id)) => {
            // No error channel back to the client; the rename is dropped
            tracing::debug!(connection_id = %id, "Ignoring rename from unregistered connection");
        }
    }
}
