//! Type-safe identifier wrappers.
//!
//! Every addressable thing in the directory has a strongly-typed ID to
//! prevent accidental mixing of identifiers at compile time. Phones,
//! simulations, panels, and operators are keyed by strings chosen outside
//! this system (simulation definitions, chat-platform account ids). Trains
//! carry a UUID v7 as their stable unique id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_name_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything convertible into a [`String`].
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_name_id! {
    /// Globally unique identifier of a phone (the number dialled to reach it).
    PhoneId
}

define_name_id! {
    /// Identifier of a loaded simulation.
    SimId
}

define_name_id! {
    /// Identifier of a panel within a simulation.
    PanelId
}

define_name_id! {
    /// External (chat-platform) identity of a human operator.
    OperatorId
}

impl PhoneId {
    /// Phone id of the fixed phone at `panel` in `sim`: `"{sim}_{panel}"`.
    pub fn for_panel(sim: &SimId, panel: &PanelId) -> Self {
        Self(format!("{sim}_{panel}"))
    }

    /// Phone id of the sim-wide control phone: `"{sim}_control"`.
    pub fn control(sim: &SimId) -> Self {
        Self(format!("{sim}_control"))
    }
}

/// Stable unique identifier for a train in a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrainId(pub Uuid);

impl TrainId {
    /// Create a new train identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TrainId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TrainId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TrainId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<TrainId> for PhoneId {
    /// A train's phone is numbered after the train's stable id.
    fn from(id: TrainId) -> Self {
        Self(id.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_and_control_ids_follow_naming_scheme() {
        let sim = SimId::from("S1");
        let panel = PanelId::from("A");
        assert_eq!(PhoneId::for_panel(&sim, &panel).as_str(), "S1_A");
        assert_eq!(PhoneId::control(&sim).as_str(), "S1_control");
    }

    #[test]
    fn name_ids_serialize_as_plain_strings() {
        let id = OperatorId::from("1234567890");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"1234567890\"");
    }

    #[test]
    fn train_phone_id_is_uuid_string() {
        let train = TrainId::new();
        let phone = PhoneId::from(train);
        assert_eq!(phone.as_str(), train.into_inner().to_string());
        assert_ne!(train.into_inner(), Uuid::nil());
    }
}
