//! The directory engine: roster construction and lookup.
//!
//! [`PhoneManager`] owns every [`Phone`] and every loaded [`Simulation`].
//! It is constructed explicitly and handed by reference to whoever needs
//! it; there is no global instance. Reachability queries live in
//! [`crate::reachability`] and the binding lifecycle in
//! [`crate::binding`], both as further `impl PhoneManager` blocks.
//!
//! The roster is an insertion-ordered `Vec` with an id index beside it.
//! Phones are never removed, so an index position stays valid for the
//! lifetime of the engine. Every insertion path checks the index first.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Deserialize;
use switchboard_types::{
    Location, OperatorId, PanelId, PhoneId, PhoneType, PhonebookEntry, SimId, TrainId,
};
use switchboard_world::{Simulation, Train};
use tracing::{debug, info, warn};

use crate::error::DirectoryError;
use crate::gateway::PhonebookGateway;
use crate::phone::Phone;

/// Display name of every sim's control phone.
pub const CONTROL_PHONE_NAME: &str = "Control";

/// Request to register a person's phone.
///
/// Only `number` and `name` are required; the rest default to a visible,
/// unpositioned mobile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPhone {
    /// The number to register; must not already exist.
    pub number: PhoneId,
    /// Display name.
    pub name: String,
    /// Kind of phone.
    #[serde(default, rename = "type")]
    pub phone_type: PhoneType,
    /// Initial location, if any.
    #[serde(default)]
    pub location: Option<Location>,
    /// Whether the phone is kept out of directory listings.
    #[serde(default)]
    pub hidden: bool,
}

impl PersonPhone {
    /// A visible, unpositioned mobile.
    pub fn new(number: impl Into<PhoneId>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            phone_type: PhoneType::Mobile,
            location: None,
            hidden: false,
        }
    }

    /// Override the phone type.
    #[must_use]
    pub fn of_type(mut self, phone_type: PhoneType) -> Self {
        self.phone_type = phone_type;
        self
    }

    /// Place the phone at `location`.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Hide the phone from directory listings.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// The phone directory and call-routing engine.
pub struct PhoneManager {
    /// Every phone, in insertion order.
    pub(crate) phones: Vec<Phone>,
    /// Phone id -> position in `phones`.
    index: BTreeMap<PhoneId, usize>,
    /// Loaded simulations by id.
    pub(crate) sims: BTreeMap<SimId, Simulation>,
    /// Non-owning link from each panel to the phone generated for it.
    pub(crate) panel_phones: BTreeMap<(SimId, PanelId), PhoneId>,
    /// Where phonebook pushes go.
    pub(crate) gateway: Arc<dyn PhonebookGateway>,
}

impl PhoneManager {
    /// Create an empty engine that pushes updates through `gateway`.
    pub fn new(gateway: Arc<dyn PhonebookGateway>) -> Self {
        Self {
            phones: Vec::new(),
            index: BTreeMap::new(),
            sims: BTreeMap::new(),
            panel_phones: BTreeMap::new(),
            gateway,
        }
    }

    // -------------------------------------------------------------------
    // Roster construction
    // -------------------------------------------------------------------

    /// Generate the fixed phones for a simulation and register it.
    ///
    /// One FIXED phone per panel (`"{sim}_{panel}"`, named after the panel)
    /// plus one sim-wide control phone (`"{sim}_control"`).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::SimulationAlreadyLoaded`] if the sim is
    /// already registered, [`DirectoryError::Topology`] if it fails
    /// validation, or [`DirectoryError::DuplicatePhone`] if any generated
    /// id is taken. Nothing is inserted on failure.
    pub fn load_simulation(&mut self, sim: Simulation) -> Result<(), DirectoryError> {
        if self.sims.contains_key(&sim.id) {
            warn!(sim = %sim.id, "Simulation already loaded");
            return Err(DirectoryError::SimulationAlreadyLoaded(sim.id));
        }
        sim.validate()?;

        let mut generated: Vec<Phone> = sim
            .panels
            .iter()
            .map(|panel| {
                Phone::new(
                    PhoneId::for_panel(&sim.id, &panel.id),
                    panel.name.clone(),
                    PhoneType::Fixed,
                    Some(Location::panel(sim.id.clone(), panel.id.clone())),
                )
            })
            .collect();
        generated.push(Phone::new(
            PhoneId::control(&sim.id),
            CONTROL_PHONE_NAME.to_owned(),
            PhoneType::Fixed,
            Some(Location::sim_wide(sim.id.clone())),
        ));

        let mut fresh = BTreeSet::new();
        for phone in &generated {
            if self.index.contains_key(phone.id()) || !fresh.insert(phone.id()) {
                warn!(sim = %sim.id, phone = %phone.id(), "Generated phone id collides");
                return Err(DirectoryError::DuplicatePhone(phone.id().clone()));
            }
        }

        for panel in &sim.panels {
            self.panel_phones.insert(
                (sim.id.clone(), panel.id.clone()),
                PhoneId::for_panel(&sim.id, &panel.id),
            );
        }
        let count = generated.len();
        for phone in generated {
            self.insert(phone);
        }

        info!(
            sim = %sim.id,
            panels = sim.panel_count(),
            phones = count,
            "Phones generated for simulation"
        );
        self.sims.insert(sim.id.clone(), sim);
        Ok(())
    }

    /// Register the phone carried by `train`.
    ///
    /// The phone is numbered after the train's stable id and named after
    /// its head-code. It is placed sim-wide if the train is already in a
    /// simulation, otherwise it starts unpositioned.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicatePhone`] if the train already has
    /// a phone, or [`DirectoryError::UnknownSimulation`] if its sim is not
    /// loaded.
    pub fn register_train_phone(&mut self, train: &Train) -> Result<&Phone, DirectoryError> {
        let id = PhoneId::from(train.id);
        if self.index.contains_key(&id) {
            warn!(train = %train.id, headcode = %train.headcode, "Train already has a phone");
            return Err(DirectoryError::DuplicatePhone(id));
        }
        if let Some(location) = train.location() {
            self.check_location(&location)?;
        }

        let phone = Phone::new(
            id.clone(),
            train.headcode.clone(),
            PhoneType::Train,
            train.location(),
        )
        .with_carrier(train.id);
        let slot = self.insert(phone);
        debug!(phone = %id, headcode = %train.headcode, "Train phone registered");
        self.phones.get(slot).ok_or(DirectoryError::PhoneNotFound(id))
    }

    /// Register a person's phone.
    ///
    /// This is the path human-requested numbers take, so it is the one
    /// most likely to see collisions.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::EmptyPhoneId`] for a blank number,
    /// [`DirectoryError::DuplicatePhone`] if the number exists, or
    /// [`DirectoryError::FixedWithoutLocation`] for a fixed phone with
    /// nowhere to live. A location must name a loaded sim and one of its
    /// panels. The roster is unchanged on failure.
    pub fn register_person_phone(
        &mut self,
        request: PersonPhone,
    ) -> Result<&Phone, DirectoryError> {
        let PersonPhone {
            number,
            name,
            phone_type,
            location,
            hidden,
        } = request;

        if number.as_str().trim().is_empty() {
            return Err(DirectoryError::EmptyPhoneId);
        }
        if self.index.contains_key(&number) {
            warn!(phone = %number, "Attempting to create phone that already exists");
            return Err(DirectoryError::DuplicatePhone(number));
        }
        match &location {
            Some(location) => self.check_location(location)?,
            None if phone_type == PhoneType::Fixed => {
                return Err(DirectoryError::FixedWithoutLocation(number));
            }
            None => {}
        }

        let phone = Phone::new(number.clone(), name, phone_type, location).with_hidden(hidden);
        let slot = self.insert(phone);
        debug!(phone = %number, kind = %phone_type, hidden, "Person phone registered");
        self.phones
            .get(slot)
            .ok_or(DirectoryError::PhoneNotFound(number))
    }

    /// Move a train or mobile phone to `location`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::PhoneNotFound`] for an unknown phone,
    /// [`DirectoryError::FixedPhone`] for a fixed phone,
    /// [`DirectoryError::UnknownSimulation`] if the target sim is not
    /// loaded, or [`DirectoryError::UnknownPanel`] if the sim lacks the
    /// target panel.
    pub fn position_phone(
        &mut self,
        id: &PhoneId,
        location: Location,
    ) -> Result<(), DirectoryError> {
        self.check_location(&location)?;
        let phone = self
            .phone_mut(id)
            .ok_or_else(|| DirectoryError::PhoneNotFound(id.clone()))?;
        if !phone.phone_type().is_movable() {
            return Err(DirectoryError::FixedPhone(id.clone()));
        }
        debug!(phone = %id, sim = %location.sim_id, "Phone positioned");
        phone.set_location(location);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------

    /// Find a phone by id. A miss is a normal outcome, not an error.
    pub fn lookup(&self, id: &PhoneId) -> Option<&Phone> {
        self.index.get(id).and_then(|&slot| self.phones.get(slot))
    }

    /// Every phone projected to a directory entry, in insertion order.
    pub fn list_all(&self) -> Vec<PhonebookEntry> {
        self.phones.iter().map(Phone::to_entry).collect()
    }

    /// Iterate over every phone in insertion order.
    pub fn phones(&self) -> impl Iterator<Item = &Phone> {
        self.phones.iter()
    }

    /// Number of phones in the roster.
    pub fn phone_count(&self) -> usize {
        self.phones.len()
    }

    /// A loaded simulation by id.
    pub fn simulation(&self, id: &SimId) -> Option<&Simulation> {
        self.sims.get(id)
    }

    /// Every loaded simulation, ordered by id.
    pub fn simulations(&self) -> impl Iterator<Item = &Simulation> {
        self.sims.values()
    }

    /// The phone generated for `panel` in `sim`.
    pub fn panel_phone(&self, sim: &SimId, panel: &PanelId) -> Option<&Phone> {
        self.panel_phones
            .get(&(sim.clone(), panel.clone()))
            .and_then(|id| self.lookup(id))
    }

    /// The control phone of `sim`.
    pub fn control_phone(&self, sim: &SimId) -> Option<&Phone> {
        self.lookup(&PhoneId::control(sim))
    }

    /// The train a phone rides on, if it is a train phone.
    pub fn resolve_carrier<'a>(&self, phone: &'a Phone) -> Option<&'a TrainId> {
        phone.carrier()
    }

    /// Number of phones bound to any operator.
    pub fn bound_count(&self) -> usize {
        self.phones.iter().filter(|p| p.is_bound()).count()
    }

    /// Every distinct operator with at least one bound phone.
    pub fn operators(&self) -> BTreeSet<OperatorId> {
        self.phones
            .iter()
            .filter_map(|p| p.operator().cloned())
            .collect()
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    pub(crate) fn phone_mut(&mut self, id: &PhoneId) -> Option<&mut Phone> {
        let slot = *self.index.get(id)?;
        self.phones.get_mut(slot)
    }

    /// A location is valid when its sim is loaded and, if it names a
    /// panel, that panel belongs to the sim.
    fn check_location(&self, location: &Location) -> Result<(), DirectoryError> {
        let sim = self
            .sims
            .get(&location.sim_id)
            .ok_or_else(|| DirectoryError::UnknownSimulation(location.sim_id.clone()))?;
        match &location.panel_id {
            Some(panel) if sim.panel(panel).is_none() => Err(DirectoryError::UnknownPanel {
                sim: location.sim_id.clone(),
                panel: panel.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Append a phone whose id has already been checked. Returns its slot.
    fn insert(&mut self, phone: Phone) -> usize {
        let slot = self.phones.len();
        self.index.insert(phone.id().clone(), slot);
        self.phones.push(phone);
        slot
    }
}

impl core::fmt::Debug for PhoneManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhoneManager")
            .field("phones", &self.phones.len())
            .field("sims", &self.sims.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
