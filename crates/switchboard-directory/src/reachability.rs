//! Who a phone may reach.
//!
//! Every query here is a pure function of the current roster and the
//! loaded topology, recomputed on each call. Locality queries need the
//! phone to be positioned in a loaded simulation; anything else is
//! reported as an error rather than guessed around.
//!
//! - speed dial: phones of panels adjacent to the caller's panel, then the
//!   sim's control phone.
//! - REC (emergency / all-call): the speed-dial set restricted to phones
//!   with an operator bound.
//! - trains and mobiles: every visible TRAIN phone in the same sim, then
//!   every visible MOBILE phone. Clients rely on that order.

use switchboard_types::{Location, PhoneType, PhonebookEntry};
use switchboard_world::Simulation;

use crate::error::DirectoryError;
use crate::manager::PhoneManager;
use crate::phone::Phone;

impl PhoneManager {
    /// Speed-dial list for `phone`: adjacent panels plus control.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unpositioned`] if the phone has no
    /// location, or [`DirectoryError::UnknownSimulation`] if its sim is not
    /// loaded.
    pub fn speed_dial_for(&self, phone: &Phone) -> Result<Vec<PhonebookEntry>, DirectoryError> {
        Ok(self
            .neighbourhood_of(phone)?
            .into_iter()
            .map(Phone::to_entry)
            .collect())
    }

    /// Trains, then mobiles, in the same simulation as `phone`.
    ///
    /// Hidden phones and phones without a location are never listed.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`PhoneManager::speed_dial_for`].
    pub fn trains_and_mobiles_for(
        &self,
        phone: &Phone,
    ) -> Result<Vec<PhonebookEntry>, DirectoryError> {
        let (sim, _) = self.locate(phone)?;

        let mut trains = Vec::new();
        let mut mobiles = Vec::new();
        for other in self
            .phones
            .iter()
            .filter(|p| !p.is_hidden() && p.location().is_some_and(|l| l.is_in(&sim.id)))
        {
            match other.phone_type() {
                PhoneType::Train => trains.push(other.to_entry()),
                PhoneType::Mobile => mobiles.push(other.to_entry()),
                PhoneType::Fixed => {}
            }
        }

        trains.append(&mut mobiles);
        Ok(trains)
    }

    /// REC recipients for `phone`: the speed-dial set, bound phones only.
    ///
    /// Broadcast calls should only ring phones with a human listening, so
    /// the control phone is included only when it too is bound.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`PhoneManager::speed_dial_for`].
    pub fn broadcast_recipients_for(
        &self,
        phone: &Phone,
    ) -> Result<Vec<PhonebookEntry>, DirectoryError> {
        Ok(self
            .neighbourhood_of(phone)?
            .into_iter()
            .filter(|p| p.is_bound())
            .map(Phone::to_entry)
            .collect())
    }

    /// Adjacent panel phones followed by the control phone.
    fn neighbourhood_of(&self, phone: &Phone) -> Result<Vec<&Phone>, DirectoryError> {
        let (sim, location) = self.locate(phone)?;

        let mut phones: Vec<&Phone> = match &location.panel_id {
            Some(panel) => sim
                .panels_adjacent_to(panel)
                .filter_map(|adjacent| self.panel_phone(&sim.id, &adjacent.id))
                .collect(),
            None => Vec::new(),
        };
        if let Some(control) = self.control_phone(&sim.id) {
            phones.push(control);
        }
        Ok(phones)
    }

    /// Resolve the simulation a phone lives in.
    fn locate<'s, 'p>(
        &'s self,
        phone: &'p Phone,
    ) -> Result<(&'s Simulation, &'p Location), DirectoryError> {
        let location = phone
            .location()
            .ok_or_else(|| DirectoryError::Unpositioned(phone.id().clone()))?;
        let sim = self
            .sims
            .get(&location.sim_id)
            .ok_or_else(|| DirectoryError::UnknownSimulation(location.sim_id.clone()))?;
        Ok((sim, location))
    }
}
