//! Phone directory and call-routing engine for the Switchboard network.
//!
//! The engine keeps the roster of every phone in the network, binds
//! operators to phones, answers "who may this phone reach", and pushes a
//! fresh phonebook to an operator whenever that operator's bindings
//! change.
//!
//! # Modules
//!
//! - [`manager`] -- [`PhoneManager`]: roster construction and lookup
//! - [`reachability`] -- Speed dial, REC recipients, trains and mobiles
//! - [`binding`] -- Assign/unassign and phonebook push
//! - [`phone`] -- [`Phone`] and its directory projections
//! - [`gateway`] -- [`PhonebookGateway`], the outbound boundary
//! - [`error`] -- [`DirectoryError`]
//!
//! # Concurrency
//!
//! Every mutating operation takes `&mut self`. Callers that share the
//! engine between tasks wrap it in a single lock so that a mutation and
//! the push it triggers are observed together.

pub mod binding;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod phone;
pub mod reachability;

// Re-export primary types at crate root.
pub use error::DirectoryError;
pub use gateway::{NoOpGateway, PHONEBOOK_UPDATE_EVENT, PhonebookGateway, RecordingGateway};
pub use manager::{CONTROL_PHONE_NAME, PersonPhone, PhoneManager};
pub use phone::Phone;
