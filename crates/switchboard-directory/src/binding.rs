//! Binding lifecycle and phonebook update propagation.
//!
//! Each phone is either Unbound (no operator) or Bound to exactly one
//! operator. Every transition ends in a push addressed to the operator
//! whose view changed: the new holder on [`PhoneManager::assign`], the
//! previous holder on [`PhoneManager::unassign`] and
//! [`PhoneManager::unassign_all_for`]. Pushes are never global.
//!
//! The push is also the one place where a phone's cached directory lists
//! are recomputed.

use chrono::Utc;
use switchboard_types::{OperatorId, PhoneId, PhonebookEntry, PhonebookRecord, PhonebookUpdate};
use tracing::{debug, warn};

use crate::error::DirectoryError;
use crate::manager::PhoneManager;
use crate::phone::Phone;

impl PhoneManager {
    /// Bind `operator` to the phone `id` and push to `operator`.
    ///
    /// Rebinding a bound phone silently replaces the previous operator;
    /// only the new operator is notified.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::PhoneNotFound`] without side effects if
    /// the phone is not in the roster.
    pub fn assign(&mut self, id: &PhoneId, operator: OperatorId) -> Result<(), DirectoryError> {
        let Some(phone) = self.phone_mut(id) else {
            warn!(phone = %id, operator = %operator, "assign: phone is undefined");
            return Err(DirectoryError::PhoneNotFound(id.clone()));
        };

        let previous = phone.bind(operator.clone());
        debug!(
            phone = %id,
            operator = %operator,
            previous = ?previous,
            "Phone assigned"
        );
        self.push_update(&operator);
        Ok(())
    }

    /// Release the phone `id`, pushing to the operator that held it.
    ///
    /// Releasing an unbound phone succeeds and pushes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::PhoneNotFound`] without side effects if
    /// the phone is not in the roster.
    pub fn unassign(&mut self, id: &PhoneId) -> Result<(), DirectoryError> {
        let Some(holder) = self.lookup(id).map(|p| p.operator().cloned()) else {
            warn!(phone = %id, "unassign: phone is undefined");
            return Err(DirectoryError::PhoneNotFound(id.clone()));
        };

        if let Some(holder) = holder {
            // The holder's view is computed while it still includes this
            // phone; the client drops it when the next push arrives.
            self.push_update(&holder);
            if let Some(phone) = self.phone_mut(id) {
                phone.release();
            }
            debug!(phone = %id, operator = %holder, "Phone unassigned");
        }
        Ok(())
    }

    /// Release every phone bound to `operator`, then push once to them.
    ///
    /// Used when an operator disconnects or leaves. Returns the number of
    /// phones released.
    pub fn unassign_all_for(&mut self, operator: &OperatorId) -> usize {
        let mut released = 0_usize;
        for phone in self.phones.iter_mut().filter(|p| p.is_bound_to(operator)) {
            phone.release();
            released = released.saturating_add(1);
        }
        debug!(operator = %operator, released, "All phones released for operator");
        self.push_update(operator);
        released
    }

    /// Every phone bound to `operator`, in roster order.
    pub fn phones_for(&self, operator: &OperatorId) -> Vec<&Phone> {
        self.phones
            .iter()
            .filter(|p| p.is_bound_to(operator))
            .collect()
    }

    /// The phonebook `operator` would receive right now, without pushing
    /// or touching any cache.
    pub fn phonebook_for(&self, operator: &OperatorId) -> Vec<PhonebookRecord> {
        self.phones_for(operator)
            .into_iter()
            .map(|phone| {
                let (speed_dial, trains_and_mobiles) = self.directory_for(phone);
                PhonebookRecord {
                    speed_dial,
                    trains_and_mobiles,
                    ..phone.to_record()
                }
            })
            .collect()
    }

    /// Recompute the caches of every phone bound to `operator` and deliver
    /// their full phonebook records to that operator.
    fn push_update(&mut self, operator: &OperatorId) {
        let refreshed: Vec<(usize, Vec<PhonebookEntry>, Vec<PhonebookEntry>)> = self
            .phones
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_bound_to(operator))
            .map(|(slot, p)| {
                let (speed_dial, trains_and_mobiles) = self.directory_for(p);
                (slot, speed_dial, trains_and_mobiles)
            })
            .collect();

        let mut records = Vec::with_capacity(refreshed.len());
        for (slot, speed_dial, trains_and_mobiles) in refreshed {
            if let Some(phone) = self.phones.get_mut(slot) {
                phone.set_directory(speed_dial, trains_and_mobiles);
                records.push(phone.to_record());
            }
        }

        let update = PhonebookUpdate {
            operator_id: operator.clone(),
            phones: records,
            issued_at: Utc::now(),
        };
        let sessions = self.gateway.deliver(&update);
        debug!(
            operator = %operator,
            phones = update.phones.len(),
            sessions,
            "Phonebook update pushed"
        );
    }

    /// Both directory lists for `phone`. A phone whose locality cannot be
    /// resolved gets empty lists; the failure is logged.
    fn directory_for(&self, phone: &Phone) -> (Vec<PhonebookEntry>, Vec<PhonebookEntry>) {
        let speed_dial = self.speed_dial_for(phone).unwrap_or_else(|e| {
            warn!(phone = %phone.id(), error = %e, "Speed dial unavailable");
            Vec::new()
        });
        let trains_and_mobiles = self.trains_and_mobiles_for(phone).unwrap_or_else(|e| {
            warn!(phone = %phone.id(), error = %e, "Trains and mobiles unavailable");
            Vec::new()
        });
        (speed_dial, trains_and_mobiles)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use switchboard_world::{Panel, Simulation, Train};

    use super::*;
    use crate::gateway::RecordingGateway;

    fn loaded() -> (PhoneManager, Arc<RecordingGateway>) {
        let recorder = Arc::new(RecordingGateway::new());
        let mut pm = PhoneManager::new(recorder.clone());
        let sim = Simulation::new("S1", "Test")
            .with_panel(Panel::new("A", "Alpha").with_neighbour("B"))
            .with_panel(Panel::new("B", "Bravo").with_neighbour("A"));
        assert!(pm.load_simulation(sim).is_ok());
        (pm, recorder)
    }

    fn op(id: &str) -> OperatorId {
        OperatorId::from(id)
    }

    #[test]
    fn assign_unknown_phone_has_no_side_effects() {
        let (mut pm, recorder) = loaded();
        assert!(matches!(
            pm.assign(&PhoneId::from("nope"), op("x")),
            Err(DirectoryError::PhoneNotFound(_))
        ));
        assert!(matches!(
            pm.unassign(&PhoneId::from("nope")),
            Err(DirectoryError::PhoneNotFound(_))
        ));
        assert!(recorder.is_empty());
        assert_eq!(pm.bound_count(), 0);
    }

    #[test]
    fn assign_fills_caches() {
        let (mut pm, _recorder) = loaded();
        let a = PhoneId::from("S1_A");
        assert!(pm.assign(&a, op("x")).is_ok());
        let speed_dial: Vec<&str> = pm
            .lookup(&a)
            .map(|p| p.speed_dial().iter().map(|e| e.id.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(speed_dial, vec!["S1_B", "S1_control"]);
    }

    #[test]
    fn rebind_only_notifies_new_operator() {
        let (mut pm, recorder) = loaded();
        let a = PhoneId::from("S1_A");
        assert!(pm.assign(&a, op("first")).is_ok());
        assert!(pm.assign(&a, op("second")).is_ok());
        assert_eq!(recorder.recipients(), vec![op("first"), op("second")]);
        assert!(pm.phones_for(&op("first")).is_empty());
        assert_eq!(pm.phones_for(&op("second")).len(), 1);
    }

    #[test]
    fn unassign_unbound_phone_is_quiet() {
        let (mut pm, recorder) = loaded();
        assert!(pm.unassign(&PhoneId::from("S1_A")).is_ok());
        assert!(recorder.is_empty());
    }

    #[test]
    fn unassign_all_pushes_once_after_clearing() {
        let (mut pm, recorder) = loaded();
        assert!(pm.assign(&PhoneId::from("S1_A"), op("x")).is_ok());
        assert!(pm.assign(&PhoneId::from("S1_B"), op("x")).is_ok());
        assert!(pm.assign(&PhoneId::from("S1_control"), op("y")).is_ok());

        assert_eq!(pm.unassign_all_for(&op("x")), 2);
        assert_eq!(recorder.len(), 4);
        let last = recorder.last();
        assert_eq!(last.as_ref().map(|u| u.operator_id.clone()), Some(op("x")));
        assert!(last.is_some_and(|u| u.is_empty()));
        assert!(pm.phones_for(&op("x")).is_empty());
        assert_eq!(pm.phones_for(&op("y")).len(), 1);
    }

    #[test]
    fn unpositioned_bound_phone_still_pushes() {
        let (mut pm, recorder) = loaded();
        let train = Train::new("1A23");
        assert!(pm.register_train_phone(&train).is_ok());
        assert!(pm.assign(&PhoneId::from(train.id), op("driver")).is_ok());

        let update = recorder.last();
        assert_eq!(update.as_ref().map(|u| u.phones.len()), Some(1));
        let record = update.and_then(|u| u.phones.into_iter().next());
        assert!(record.is_some_and(|r| r.speed_dial.is_empty() && r.trains_and_mobiles.is_empty()));
    }

    #[test]
    fn phonebook_for_does_not_push() {
        let (mut pm, recorder) = loaded();
        assert!(pm.assign(&PhoneId::from("S1_A"), op("x")).is_ok());
        let before = recorder.len();
        let book = pm.phonebook_for(&op("x"));
        assert_eq!(book.len(), 1);
        assert_eq!(book.first().map(|r| r.speed_dial.len()), Some(2));
        assert_eq!(recorder.len(), before);
    }
}
