//! Trains as seen by the directory.
//!
//! The world model owns train lifecycle; the directory only needs the
//! stable id (the train phone's number), the head-code (its display name),
//! and which simulation the train is currently in, if any.

use serde::{Deserialize, Serialize};
use switchboard_types::{Location, SimId, TrainId};

/// A train that may carry a phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    /// Stable unique id of the train.
    pub id: TrainId,
    /// Four-character head-code shown to operators (e.g. `1A23`).
    pub headcode: String,
    /// The simulation the train is currently running in, if known.
    #[serde(default)]
    pub sim_id: Option<SimId>,
}

impl Train {
    /// Create a train with a fresh id and no known simulation.
    pub fn new(headcode: impl Into<String>) -> Self {
        Self {
            id: TrainId::new(),
            headcode: headcode.into(),
            sim_id: None,
        }
    }

    /// Place the train in a simulation, builder style.
    #[must_use]
    pub fn in_sim(mut self, sim: impl Into<SimId>) -> Self {
        self.sim_id = Some(sim.into());
        self
    }

    /// Sim-wide location of the train, if it is in a simulation.
    pub fn location(&self) -> Option<Location> {
        self.sim_id.clone().map(Location::sim_wide)
    }
}
