//! Core value structs shared between the engine and its clients.
//!
//! [`Location`] pins a phone into the simulated world. [`PhonebookEntry`]
//! and [`PhonebookRecord`] are the read-only projections of a phone that
//! leave the engine; [`PhonebookUpdate`] is the payload of the single
//! outbound `phonebookUpdate` event.
//!
//! All wire-facing structs serialize in camelCase because the consumer is
//! a browser client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::PhoneType;
use crate::ids::{OperatorId, PanelId, PhoneId, SimId};

/// Coordinate of a phone within the simulated world.
///
/// Immutable once constructed. A location without a panel is sim-wide
/// (the control phone, or a train that is somewhere in the sim).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// The simulation this phone lives in.
    pub sim_id: SimId,
    /// The panel within the simulation, absent for sim-wide phones.
    pub panel_id: Option<PanelId>,
}

impl Location {
    /// Location of a phone attached to `panel` in `sim`.
    pub const fn panel(sim_id: SimId, panel_id: PanelId) -> Self {
        Self {
            sim_id,
            panel_id: Some(panel_id),
        }
    }

    /// Sim-wide location with no panel.
    pub const fn sim_wide(sim_id: SimId) -> Self {
        Self {
            sim_id,
            panel_id: None,
        }
    }

    /// Whether this location is inside `sim`.
    pub fn is_in(&self, sim: &SimId) -> bool {
        &self.sim_id == sim
    }
}

/// Flattened snapshot of a phone's directory-visible fields.
///
/// Produced on demand and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PhonebookEntry {
    /// The phone's number.
    pub id: PhoneId,
    /// Human-readable name shown in the directory.
    pub name: String,
    /// Kind of phone.
    #[serde(rename = "type")]
    pub phone_type: PhoneType,
    /// Whether an operator is currently bound to the phone.
    pub bound: bool,
}

/// Complete phonebook representation of one bound phone.
///
/// This is what an operator's client renders: the phone itself plus the
/// two directory lists computed for it at push time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PhonebookRecord {
    /// The phone's number.
    pub id: PhoneId,
    /// Human-readable name shown in the directory.
    pub name: String,
    /// Kind of phone.
    #[serde(rename = "type")]
    pub phone_type: PhoneType,
    /// Where the phone is, if it has been positioned.
    pub location: Option<Location>,
    /// Adjacent panels plus control.
    pub speed_dial: Vec<PhonebookEntry>,
    /// Trains, then mobiles, in the same simulation.
    pub trains_and_mobiles: Vec<PhonebookEntry>,
}

/// Payload of a `phonebookUpdate` event addressed to one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PhonebookUpdate {
    /// The operator whose sessions receive this update.
    pub operator_id: OperatorId,
    /// Every phone currently bound to the operator, in roster order.
    pub phones: Vec<PhonebookRecord>,
    /// When the engine computed the update.
    pub issued_at: DateTime<Utc>,
}

impl PhonebookUpdate {
    /// Whether the operator has no bound phones left.
    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }
}
