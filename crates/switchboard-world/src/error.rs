//! Error types for the `switchboard-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use std::path::PathBuf;

use switchboard_types::{PanelId, SimId};

/// Errors that can occur while building or loading simulation topology.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Two panels in one simulation share an id.
    #[error("duplicate panel {panel} in simulation {sim}")]
    DuplicatePanel {
        /// The simulation being validated.
        sim: SimId,
        /// The repeated panel id.
        panel: PanelId,
    },

    /// A panel lists a neighbour that is not a panel of the same simulation.
    #[error("panel {panel} in simulation {sim} references unknown neighbour {neighbour}")]
    UnknownNeighbour {
        /// The simulation being validated.
        sim: SimId,
        /// The panel carrying the bad reference.
        panel: PanelId,
        /// The missing neighbour.
        neighbour: PanelId,
    },

    /// A simulation definition has an empty id.
    #[error("simulation definition has an empty id")]
    EmptySimulationId,

    /// Failed to read a simulation definition from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file or directory being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a simulation definition.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two definition files declare the same simulation id.
    #[error("simulation {0} is defined more than once")]
    DuplicateSimulation(SimId),
}
