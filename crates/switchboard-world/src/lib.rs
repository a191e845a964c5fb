//! Simulation topology for the Switchboard phone directory.
//!
//! This crate models the parts of the simulated railway the directory reads
//! but never mutates: simulations, their panels, the neighbour graph
//! between panels, and trains.
//!
//! # Modules
//!
//! - [`catalog`] -- Loading and validating simulation definitions from YAML.
//! - [`error`] -- Error types for topology validation and loading.
//! - [`simulation`] -- [`Simulation`], [`Panel`], and [`Neighbour`].
//! - [`train`] -- [`Train`], the carrier of a train phone.

pub mod catalog;
pub mod error;
pub mod simulation;
pub mod train;

// Re-export primary types at crate root.
pub use catalog::{load_simulation_dir, load_simulation_file, parse_simulation};
pub use error::WorldError;
pub use simulation::{Neighbour, Panel, Simulation};
pub use train::Train;
