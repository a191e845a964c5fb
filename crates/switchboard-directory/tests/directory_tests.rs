//! Integration tests for the directory engine.
//!
//! These drive [`PhoneManager`] only through its public surface, with a
//! [`RecordingGateway`] standing in for the transport so every push can be
//! inspected.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use switchboard_directory::{
    DirectoryError, PersonPhone, PhoneManager, PhonebookGateway, RecordingGateway,
};
use switchboard_types::{Location, OperatorId, PhoneId, PhoneType, PhonebookEntry, SimId};
use switchboard_world::{Panel, Simulation, Train};

fn engine() -> (PhoneManager, Arc<RecordingGateway>) {
    let recorder = Arc::new(RecordingGateway::new());
    let gateway: Arc<dyn PhonebookGateway> = recorder.clone();
    (PhoneManager::new(gateway), recorder)
}

fn s1_two_panels() -> Simulation {
    Simulation::new("S1", "Scenario")
        .with_panel(Panel::new("A", "Alpha").with_neighbour("B"))
        .with_panel(Panel::new("B", "Bravo").with_neighbour("A"))
}

fn ids(entries: &[PhonebookEntry]) -> Vec<String> {
    entries.iter().map(|e| e.id.to_string()).collect()
}

#[test]
fn load_scenario_speed_dial_and_first_push() {
    let (mut pm, recorder) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();

    let listed: Vec<String> = pm.list_all().into_iter().map(|e| e.id.into_inner()).collect();
    assert_eq!(listed, vec!["S1_A", "S1_B", "S1_control"]);

    let a = pm.lookup(&PhoneId::from("S1_A")).unwrap().clone();
    assert_eq!(ids(&pm.speed_dial_for(&a).unwrap()), vec!["S1_B", "S1_control"]);

    pm.assign(a.id(), OperatorId::from("userX")).unwrap();
    assert_eq!(recorder.len(), 1);
    let update = recorder.last().unwrap();
    assert_eq!(update.operator_id, OperatorId::from("userX"));
    assert_eq!(update.phones.len(), 1);
    let record = update.phones.first().unwrap();
    assert_eq!(record.id, PhoneId::from("S1_A"));
    assert_eq!(record.phone_type, PhoneType::Fixed);
    assert_eq!(ids(&record.speed_dial), vec!["S1_B", "S1_control"]);
}

#[test]
fn person_number_is_unique() {
    let (mut pm, _) = engine();
    assert!(pm.register_person_phone(PersonPhone::new("555", "Alice")).is_ok());
    assert!(matches!(
        pm.register_person_phone(PersonPhone::new("555", "Bob")),
        Err(DirectoryError::DuplicatePhone(_))
    ));

    let matching: Vec<_> = pm
        .phones()
        .filter(|p| p.id().as_str() == "555")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching.first().map(|p| p.name()), Some("Alice"));
    assert_eq!(pm.phone_count(), 1);
}

#[test]
fn uniqueness_holds_across_many_registrations() {
    let (mut pm, _) = engine();
    let numbers = ["1", "2", "1", "3", "2", "4", "1"];
    let mut accepted = 0_usize;
    for (n, number) in numbers.iter().enumerate() {
        let before = pm.phone_count();
        match pm.register_person_phone(PersonPhone::new(*number, format!("Person {n}"))) {
            Ok(_) => accepted += 1,
            Err(_) => assert_eq!(pm.phone_count(), before),
        }
    }
    assert_eq!(accepted, 4);
    assert_eq!(pm.phone_count(), 4);
}

#[test]
fn speed_dial_locality() {
    let (mut pm, _) = engine();
    let sim = Simulation::new("S1", "Locality")
        .with_panel(Panel::new("P1", "One").with_neighbour("P2"))
        .with_panel(Panel::new("P2", "Two").with_neighbour("P1"))
        .with_panel(Panel::new("P3", "Three"));
    pm.load_simulation(sim).unwrap();

    let p1 = pm.lookup(&PhoneId::from("S1_P1")).unwrap();
    let speed_dial = ids(&pm.speed_dial_for(p1).unwrap());
    assert!(speed_dial.contains(&String::from("S1_P2")));
    assert!(speed_dial.contains(&String::from("S1_control")));
    assert!(!speed_dial.contains(&String::from("S1_P3")));
}

#[test]
fn trains_always_precede_mobiles() {
    let (mut pm, _) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    let here = Location::sim_wide(SimId::from("S1"));

    pm.register_person_phone(PersonPhone::new("m1", "First").at(here.clone()))
        .unwrap();
    let t1 = Train::new("1A01").in_sim("S1");
    pm.register_train_phone(&t1).unwrap();
    pm.register_person_phone(PersonPhone::new("m2", "Second").at(here.clone()))
        .unwrap();
    let t2 = Train::new("2B02").in_sim("S1");
    pm.register_train_phone(&t2).unwrap();

    let a = pm.lookup(&PhoneId::from("S1_A")).unwrap();
    let listed = pm.trains_and_mobiles_for(a).unwrap();
    let kinds: Vec<PhoneType> = listed.iter().map(|e| e.phone_type).collect();
    assert_eq!(
        kinds,
        vec![PhoneType::Train, PhoneType::Train, PhoneType::Mobile, PhoneType::Mobile]
    );
    assert_eq!(
        ids(&listed),
        vec![
            PhoneId::from(t1.id).into_inner(),
            PhoneId::from(t2.id).into_inner(),
            String::from("m1"),
            String::from("m2"),
        ]
    );
}

#[test]
fn trains_and_mobiles_are_scoped_to_the_sim() {
    let (mut pm, _) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    pm.load_simulation(Simulation::new("S2", "Other").with_panel(Panel::new("X", "X-ray")))
        .unwrap();

    let elsewhere = Train::new("9Z99").in_sim("S2");
    pm.register_train_phone(&elsewhere).unwrap();

    let a = pm.lookup(&PhoneId::from("S1_A")).unwrap();
    assert!(pm.trains_and_mobiles_for(a).unwrap().is_empty());
}

#[test]
fn broadcast_never_includes_unbound_neighbours() {
    let (mut pm, _) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();

    let a = pm.lookup(&PhoneId::from("S1_A")).unwrap().clone();
    assert_eq!(pm.speed_dial_for(&a).unwrap().len(), 2);
    assert!(pm.broadcast_recipients_for(&a).unwrap().is_empty());

    pm.assign(&PhoneId::from("S1_B"), OperatorId::from("sig")).unwrap();
    let rec = pm.broadcast_recipients_for(&a).unwrap();
    assert_eq!(ids(&rec), vec!["S1_B"]);
    assert!(rec.iter().all(|e| e.bound));
}

#[test]
fn bind_unbind_round_trip_pushes_twice_to_same_operator() {
    let (mut pm, recorder) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    let a = PhoneId::from("S1_A");

    pm.assign(&a, OperatorId::from("op1")).unwrap();
    pm.unassign(&a).unwrap();

    assert!(pm.lookup(&a).unwrap().operator().is_none());
    assert_eq!(
        recorder.recipients(),
        vec![OperatorId::from("op1"), OperatorId::from("op1")]
    );
}

#[test]
fn operator_leaving_releases_everything() {
    let (mut pm, recorder) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    let op = OperatorId::from("op1");
    pm.assign(&PhoneId::from("S1_A"), op.clone()).unwrap();
    pm.assign(&PhoneId::from("S1_control"), op.clone()).unwrap();
    assert_eq!(pm.phones_for(&op).len(), 2);

    assert_eq!(pm.operators().len(), 1);

    assert_eq!(pm.unassign_all_for(&op), 2);
    assert!(pm.phones_for(&op).is_empty());
    assert_eq!(pm.bound_count(), 0);

    let last = recorder.last().unwrap();
    assert_eq!(last.operator_id, op);
    assert!(last.phones.is_empty());
}

#[test]
fn push_carries_every_phone_of_the_operator() {
    let (mut pm, recorder) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    let op = OperatorId::from("op1");
    pm.assign(&PhoneId::from("S1_A"), op.clone()).unwrap();
    pm.assign(&PhoneId::from("S1_B"), op.clone()).unwrap();

    let update = recorder.last().unwrap();
    let records: Vec<&str> = update.phones.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(records, vec!["S1_A", "S1_B"]);

    // The earlier phone's record now sees its neighbour as bound.
    let a = update.phones.first().unwrap();
    assert!(a.speed_dial.iter().any(|e| e.id.as_str() == "S1_B" && e.bound));
}

#[test]
fn push_serializes_as_camel_case() {
    let (mut pm, recorder) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    pm.assign(&PhoneId::from("S1_A"), OperatorId::from("userX")).unwrap();

    let json = serde_json::to_value(recorder.last().unwrap()).unwrap();
    assert_eq!(json["operatorId"], "userX");
    assert_eq!(json["phones"][0]["type"], "FIXED");
    assert_eq!(json["phones"][0]["speedDial"][0]["id"], "S1_B");
    assert!(json["phones"][0]["trainsAndMobiles"].is_array());
}

#[test]
fn moved_train_shows_up_for_panels() {
    let (mut pm, _) = engine();
    pm.load_simulation(s1_two_panels()).unwrap();
    let train = Train::new("1A23");
    pm.register_train_phone(&train).unwrap();
    let train_phone = PhoneId::from(train.id);

    let a = pm.lookup(&PhoneId::from("S1_A")).unwrap().clone();
    assert!(pm.trains_and_mobiles_for(&a).unwrap().is_empty());

    let carrier = pm.lookup(&train_phone).and_then(|p| pm.resolve_carrier(p)).copied();
    assert_eq!(carrier, Some(train.id));

    pm.position_phone(&train_phone, Location::sim_wide(SimId::from("S1")))
        .unwrap();
    assert_eq!(
        ids(&pm.trains_and_mobiles_for(&a).unwrap()),
        vec![train_phone.into_inner()]
    );
}
