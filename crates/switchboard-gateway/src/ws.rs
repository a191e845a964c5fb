//! `WebSocket` handler for per-operator phonebook streaming.
//!
//! Clients connect to `GET /ws/operators/{operator_id}`. The session joins
//! that operator's room, receives the operator's current phonebook at
//! once, and then every [`PHONEBOOK_UPDATE_EVENT`] pushed by the engine as
//! a JSON text frame:
//!
//! ```json
//! { "event": "phonebookUpdate", "data": { "operatorId": "...", "phones": [...] } }
//! ```
//!
//! If a client falls behind, lagged updates are skipped; the next frame
//! is a complete phonebook anyway.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;
use switchboard_directory::PHONEBOOK_UPDATE_EVENT;
use switchboard_types::{OperatorId, PhonebookUpdate};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Envelope for every frame sent to an operator client.
#[derive(Debug, Serialize)]
pub struct PhonebookFrame<'a> {
    /// Event name; always [`PHONEBOOK_UPDATE_EVENT`].
    pub event: &'static str,
    /// The phonebook being delivered.
    pub data: &'a PhonebookUpdate,
}

impl<'a> PhonebookFrame<'a> {
    /// Wrap an update in its event envelope.
    pub const fn new(data: &'a PhonebookUpdate) -> Self {
        Self {
            event: PHONEBOOK_UPDATE_EVENT,
            data,
        }
    }
}

/// Upgrade an HTTP request to a `WebSocket` session for one operator.
///
/// # Route
///
/// `GET /ws/operators/{operator_id}`
pub async fn ws_operator(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(operator_id): Path<String>,
) -> impl IntoResponse {
    let operator = OperatorId::from(operator_id);
    ws.on_upgrade(move |socket| handle_ws(socket, state, operator))
}

/// Handle the session lifecycle: join the room, stream, then leave.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, operator: OperatorId) {
    let mut rx = state.rooms.join(&operator);
    info!(operator = %operator, "Operator session connected");

    let initial = PhonebookUpdate {
        operator_id: operator.clone(),
        phones: state.directory.lock().await.phonebook_for(&operator),
        issued_at: Utc::now(),
    };
    if send_update(&mut socket, &initial).await {
        stream_updates(&mut socket, &mut rx).await;
    }

    let released = close_session(&state, &operator).await;
    info!(operator = %operator, released, "Operator session closed");
}

/// Forward room updates to the socket until either side goes away.
async fn stream_updates(
    socket: &mut WebSocket,
    rx: &mut broadcast::Receiver<PhonebookUpdate>,
) {
    loop {
        tokio::select! {
            // A phonebook pushed by the engine.
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        if !send_update(socket, &update).await {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Room channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Send one update as a text frame. Returns `false` once the client is
/// gone; a frame that fails to serialize is skipped.
async fn send_update(socket: &mut WebSocket, update: &PhonebookUpdate) -> bool {
    let json = match serde_json::to_string(&PhonebookFrame::new(update)) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize phonebook update: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("WebSocket client disconnected (send failed)");
        return false;
    }
    true
}

/// Leave the operator's room. When this was the operator's last session
/// and release is enabled, every phone bound to them is released.
///
/// The room is left while holding the directory lock, so a session that
/// joins meanwhile either keeps the room alive or reads the phonebook
/// after the release.
///
/// Returns the number of phones released.
pub(crate) async fn close_session(state: &AppState, operator: &OperatorId) -> usize {
    let mut directory = state.directory.lock().await;
    let remaining = state.rooms.leave(operator);
    if remaining > 0 || !state.release_on_disconnect {
        return 0;
    }
    directory.unassign_all_for(operator)
}
