//! Shared application state for the gateway.
//!
//! [`AppState`] owns the one directory engine instance and the room
//! gateway that engine pushes through. The engine sits behind a single
//! async [`Mutex`], so inbound requests and socket events are applied one
//! at a time and each mutation is observed together with the push it
//! triggers.

use std::sync::Arc;

use switchboard_directory::{PhoneManager, PhonebookGateway};
use tokio::sync::Mutex;

use crate::rooms::RoomGateway;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The directory engine.
    pub directory: Arc<Mutex<PhoneManager>>,
    /// Per-operator rooms; also the engine's outbound gateway.
    pub rooms: Arc<RoomGateway>,
    /// Release every phone of an operator when their last session closes.
    pub release_on_disconnect: bool,
}

impl AppState {
    /// Create state with an empty directory wired to a fresh room gateway.
    pub fn new() -> Self {
        let rooms = Arc::new(RoomGateway::new());
        let gateway: Arc<dyn PhonebookGateway> = rooms.clone();
        Self {
            directory: Arc::new(Mutex::new(PhoneManager::new(gateway))),
            rooms,
            release_on_disconnect: true,
        }
    }

    /// Set whether disconnecting releases an operator's phones.
    #[must_use]
    pub fn with_release_on_disconnect(mut self, release: bool) -> Self {
        self.release_on_disconnect = release;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
