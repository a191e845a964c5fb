//! The outbound boundary of the directory engine.
//!
//! The engine never talks to sockets. When a binding changes it hands a
//! [`PhonebookUpdate`] to a [`PhonebookGateway`], which is responsible for
//! reaching every session of the addressed operator. The HTTP crate
//! provides the real implementation; the two here serve headless runs and
//! tests.

use std::sync::Mutex;

use switchboard_types::{OperatorId, PhonebookUpdate};

/// Name of the only event the directory emits.
pub const PHONEBOOK_UPDATE_EVENT: &str = "phonebookUpdate";

/// Delivers phonebook updates to the sessions of one operator.
pub trait PhonebookGateway: Send + Sync {
    /// Deliver `update` to every session of `update.operator_id`.
    ///
    /// Returns the number of sessions reached. Zero is not an error: the
    /// operator may simply have no client connected.
    fn deliver(&self, update: &PhonebookUpdate) -> usize;
}

/// A gateway that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpGateway;

impl PhonebookGateway for NoOpGateway {
    fn deliver(&self, _update: &PhonebookUpdate) -> usize {
        0
    }
}

/// A gateway that keeps every delivered update, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    deliveries: Mutex<Vec<PhonebookUpdate>>,
}

impl RecordingGateway {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every update delivered so far.
    pub fn deliveries(&self) -> Vec<PhonebookUpdate> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// The operator each update was addressed to, in delivery order.
    pub fn recipients(&self) -> Vec<OperatorId> {
        self.deliveries()
            .into_iter()
            .map(|u| u.operator_id)
            .collect()
    }

    /// Number of updates delivered so far.
    pub fn len(&self) -> usize {
        self.deliveries.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Whether nothing has been delivered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent update, if any.
    pub fn last(&self) -> Option<PhonebookUpdate> {
        self.deliveries
            .lock()
            .ok()
            .and_then(|d| d.last().cloned())
    }
}

impl PhonebookGateway for RecordingGateway {
    fn deliver(&self, update: &PhonebookUpdate) -> usize {
        match self.deliveries.lock() {
            Ok(mut deliveries) => {
                deliveries.push(update.clone());
                1
            }
            Err(_) => 0,
        }
    }
}
