//! Enumeration types for the Switchboard directory.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of an addressable phone.
///
/// Serialized in upper case (`"FIXED"`, `"TRAIN"`, `"MOBILE"`) to match
/// what the browser client switches on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum PhoneType {
    /// A phone bolted to a signalling panel, or the sim-wide control phone.
    Fixed,
    /// A phone carried by a train (the driver's cab radio).
    Train,
    /// A person's mobile phone, registered on request.
    #[default]
    Mobile,
}

impl PhoneType {
    /// Wire name of the phone type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "FIXED",
            Self::Train => "TRAIN",
            Self::Mobile => "MOBILE",
        }
    }

    /// Whether phones of this type may be repositioned after registration.
    ///
    /// Fixed phones are pinned to the panel (or sim) they were generated for.
    pub const fn is_movable(self) -> bool {
        match self {
            Self::Fixed => false,
            Self::Train | Self::Mobile => true,
        }
    }
}

impl core::fmt::Display for PhoneType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
