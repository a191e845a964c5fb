//! Shared type definitions for the Switchboard phone directory.
//!
//! This crate is the single source of truth for the values that cross crate
//! boundaries: identifiers, the phone kind, locations, and the phonebook
//! projections delivered to operator clients. Types defined here flow
//! downstream to `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for phone, sim, panel, operator, and train ids
//! - [`enums`] -- [`PhoneType`]
//! - [`structs`] -- [`Location`] and the phonebook projections

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::PhoneType;
pub use ids::{OperatorId, PanelId, PhoneId, SimId, TrainId};
pub use structs::{Location, PhonebookEntry, PhonebookRecord, PhonebookUpdate};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files into `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::PhoneId::export_all();
        let _ = crate::ids::SimId::export_all();
        let _ = crate::ids::PanelId::export_all();
        let _ = crate::ids::OperatorId::export_all();
        let _ = crate::ids::TrainId::export_all();

        let _ = crate::enums::PhoneType::export_all();

        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::PhonebookEntry::export_all();
        let _ = crate::structs::PhonebookRecord::export_all();
        let _ = crate::structs::PhonebookUpdate::export_all();
    }
}
