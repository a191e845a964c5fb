//! Per-operator rooms backing the phonebook push.
//!
//! Every operator identity gets its own [`broadcast`] channel. Each
//! `WebSocket` session for that operator subscribes to it, so a single
//! [`PhonebookGateway::deliver`] reaches all of an operator's open
//! clients and nobody else's.
//!
//! The room map sits behind a plain [`std::sync::Mutex`]: it is only held
//! for map bookkeeping and a non-blocking `send`, never across an await.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use switchboard_directory::PhonebookGateway;
use switchboard_types::{OperatorId, PhonebookUpdate};
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of each operator's broadcast channel.
///
/// A session that falls behind by more than this many updates receives a
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
/// Every update is a full phonebook, so skipping loses nothing.
const ROOM_CAPACITY: usize = 32;

#[derive(Debug)]
struct Room {
    tx: broadcast::Sender<PhonebookUpdate>,
    sessions: usize,
}

/// Routes phonebook updates to the sessions of one operator.
#[derive(Debug, Default)]
pub struct RoomGateway {
    rooms: Mutex<BTreeMap<OperatorId, Room>>,
}

impl RoomGateway {
    /// Create a gateway with no rooms.
    pub fn new() -> Self {
        Self::default()
    }

    fn rooms(&self) -> MutexGuard<'_, BTreeMap<OperatorId, Room>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a session to `operator`'s room, creating it if needed.
    ///
    /// The returned receiver yields every update delivered to the
    /// operator from now on.
    pub fn join(&self, operator: &OperatorId) -> broadcast::Receiver<PhonebookUpdate> {
        let mut rooms = self.rooms();
        let room = rooms.entry(operator.clone()).or_insert_with(|| Room {
            tx: broadcast::channel(ROOM_CAPACITY).0,
            sessions: 0,
        });
        room.sessions = room.sessions.saturating_add(1);
        debug!(operator = %operator, sessions = room.sessions, "Session joined room");
        room.tx.subscribe()
    }

    /// Remove a session from `operator`'s room.
    ///
    /// Returns the number of sessions still open for the operator. The
    /// room is dropped once it is empty.
    pub fn leave(&self, operator: &OperatorId) -> usize {
        let mut rooms = self.rooms();
        let remaining = match rooms.get_mut(operator) {
            Some(room) => {
                room.sessions = room.sessions.saturating_sub(1);
                room.sessions
            }
            None => 0,
        };
        if remaining == 0 {
            rooms.remove(operator);
        }
        debug!(operator = %operator, remaining, "Session left room");
        remaining
    }

    /// Number of open sessions for `operator`.
    pub fn sessions(&self, operator: &OperatorId) -> usize {
        self.rooms().get(operator).map_or(0, |room| room.sessions)
    }

    /// Number of operators with at least one open session.
    pub fn room_count(&self) -> usize {
        self.rooms().len()
    }
}

impl PhonebookGateway for RoomGateway {
    fn deliver(&self, update: &PhonebookUpdate) -> usize {
        self.rooms()
            .get(&update.operator_id)
            // send fails only when no session is subscribed, which is
            // normal for an operator with no client open.
            .map_or(0, |room| room.tx.send(update.clone()).unwrap_or(0))
    }
}
