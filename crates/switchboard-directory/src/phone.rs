//! The addressable phone and its directory projections.
//!
//! A [`Phone`] is created by the engine and only ever mutated through it:
//! every setter here is crate-private. The cached `speed_dial` and
//! `trains_and_mobiles` lists are written at exactly one point (the
//! directory push in [`crate::binding`]) and are empty until then.

use switchboard_types::{
    Location, OperatorId, PhoneId, PhoneType, PhonebookEntry, PhonebookRecord, TrainId,
};

/// An addressable entity in the phone network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    id: PhoneId,
    name: String,
    phone_type: PhoneType,
    location: Option<Location>,
    hidden: bool,
    operator: Option<OperatorId>,
    carrier: Option<TrainId>,
    speed_dial: Vec<PhonebookEntry>,
    trains_and_mobiles: Vec<PhonebookEntry>,
}

impl Phone {
    /// Create an unbound, visible phone.
    pub(crate) const fn new(
        id: PhoneId,
        name: String,
        phone_type: PhoneType,
        location: Option<Location>,
    ) -> Self {
        Self {
            id,
            name,
            phone_type,
            location,
            hidden: false,
            operator: None,
            carrier: None,
            speed_dial: Vec::new(),
            trains_and_mobiles: Vec::new(),
        }
    }

    pub(crate) fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn with_carrier(mut self, train: TrainId) -> Self {
        self.carrier = Some(train);
        self
    }

    /// The phone's number.
    pub const fn id(&self) -> &PhoneId {
        &self.id
    }

    /// Display name shown in directories.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of phone.
    pub const fn phone_type(&self) -> PhoneType {
        self.phone_type
    }

    /// Where the phone is, if it has been positioned.
    pub const fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Whether the phone is suppressed from directory listings.
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The operator currently bound to the phone.
    pub const fn operator(&self) -> Option<&OperatorId> {
        self.operator.as_ref()
    }

    /// Whether an operator is bound to the phone.
    pub const fn is_bound(&self) -> bool {
        self.operator.is_some()
    }

    /// Whether `operator` is the one bound to this phone.
    pub fn is_bound_to(&self, operator: &OperatorId) -> bool {
        self.operator.as_ref() == Some(operator)
    }

    /// The train this phone rides on, for train phones.
    pub const fn carrier(&self) -> Option<&TrainId> {
        self.carrier.as_ref()
    }

    /// Speed-dial list as of the last directory push.
    pub fn speed_dial(&self) -> &[PhonebookEntry] {
        &self.speed_dial
    }

    /// Trains-and-mobiles list as of the last directory push.
    pub fn trains_and_mobiles(&self) -> &[PhonebookEntry] {
        &self.trains_and_mobiles
    }

    /// Bind an operator, returning whoever held the phone before.
    pub(crate) fn bind(&mut self, operator: OperatorId) -> Option<OperatorId> {
        self.operator.replace(operator)
    }

    /// Clear the binding, returning whoever held the phone.
    pub(crate) fn release(&mut self) -> Option<OperatorId> {
        self.operator.take()
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub(crate) fn set_directory(
        &mut self,
        speed_dial: Vec<PhonebookEntry>,
        trains_and_mobiles: Vec<PhonebookEntry>,
    ) {
        self.speed_dial = speed_dial;
        self.trains_and_mobiles = trains_and_mobiles;
    }

    /// Project the phone into a directory entry.
    pub fn to_entry(&self) -> PhonebookEntry {
        PhonebookEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            phone_type: self.phone_type,
            bound: self.is_bound(),
        }
    }

    /// Full phonebook representation, using the cached directory lists.
    pub fn to_record(&self) -> PhonebookRecord {
        PhonebookRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            phone_type: self.phone_type,
            location: self.location.clone(),
            speed_dial: self.speed_dial.clone(),
            trains_and_mobiles: self.trains_and_mobiles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use switchboard_types::SimId;

    use super::*;

    fn mobile(id: &str) -> Phone {
        Phone::new(PhoneId::from(id), String::from("Person"), PhoneType::Mobile, None)
    }

    #[test]
    fn new_phone_is_unbound_and_visible() {
        let phone = mobile("555");
        assert!(!phone.is_bound());
        assert!(!phone.is_hidden());
        assert!(phone.speed_dial().is_empty());
        assert!(phone.trains_and_mobiles().is_empty());
    }

    #[test]
    fn rebinding_returns_previous_operator() {
        let mut phone = mobile("555");
        assert_eq!(phone.bind(OperatorId::from("a")), None);
        assert_eq!(phone.bind(OperatorId::from("b")), Some(OperatorId::from("a")));
        assert!(phone.is_bound_to(&OperatorId::from("b")));
        assert_eq!(phone.release(), Some(OperatorId::from("b")));
        assert!(!phone.is_bound());
    }

    #[test]
    fn entry_reflects_binding() {
        let mut phone = mobile("555");
        assert!(!phone.to_entry().bound);
        phone.bind(OperatorId::from("a"));
        assert!(phone.to_entry().bound);
    }

    #[test]
    fn record_carries_cached_lists() {
        let mut phone = Phone::new(
            PhoneId::from("S1_A"),
            String::from("Alpha"),
            PhoneType::Fixed,
            Some(Location::sim_wide(SimId::from("S1"))),
        );
        let other = mobile("555").to_entry();
        phone.set_directory(vec![other.clone()], Vec::new());
        let record = phone.to_record();
        assert_eq!(record.speed_dial, vec![other]);
        assert!(record.trains_and_mobiles.is_empty());
        assert_eq!(record.location, Some(Location::sim_wide(SimId::from("S1"))));
    }
}
