//! Error types for the `switchboard-directory` crate.

use switchboard_types::{PanelId, PhoneId, SimId};
use switchboard_world::WorldError;

/// Errors reported by the directory engine.
///
/// None of these are fatal: every failing operation leaves the roster
/// exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// A phone with this id is already in the roster.
    #[error("phone {0} already exists")]
    DuplicatePhone(PhoneId),

    /// A phone id was blank.
    #[error("phone id must not be empty")]
    EmptyPhoneId,

    /// The referenced phone is not in the roster.
    #[error("phone not found: {0}")]
    PhoneNotFound(PhoneId),

    /// A locality query was asked about a phone with no location.
    #[error("phone {0} has not been positioned in a simulation")]
    Unpositioned(PhoneId),

    /// A location references a simulation that has not been loaded.
    #[error("simulation not loaded: {0}")]
    UnknownSimulation(SimId),

    /// A location names a panel the simulation does not have.
    #[error("simulation {sim} has no panel {panel}")]
    UnknownPanel {
        /// The simulation searched.
        sim: SimId,
        /// The missing panel.
        panel: PanelId,
    },

    /// A fixed phone was registered without a location.
    #[error("fixed phone {0} needs a location")]
    FixedWithoutLocation(PhoneId),

    /// The simulation has already been loaded into the roster.
    #[error("simulation {0} is already loaded")]
    SimulationAlreadyLoaded(SimId),

    /// Fixed phones cannot be repositioned.
    #[error("phone {0} is fixed and cannot be moved")]
    FixedPhone(PhoneId),

    /// The simulation topology failed validation.
    #[error("invalid simulation topology: {source}")]
    Topology {
        /// The underlying validation error.
        #[from]
        source: WorldError,
    },
}
