//! End-to-end behaviour of the file store, seen through the transport and
//! the ranged cursor.

use chrono::{NaiveDate, NaiveDateTime};
use daybook_core::{
    Event, EventStore, FileStore, LocalTransport, MAX_DAYS_SCANNED, RangePredicate, RangedEvents,
    Session, Transport, TransportError, User, ViewSpan,
};
use tempfile::TempDir;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).unwrap()
}

fn transport() -> (TempDir, LocalTransport<FileStore>) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    (dir, LocalTransport::new(store))
}

#[test]
fn user_is_created_once() {
    let (_dir, transport) = transport();

    assert!(transport.create_user(&User::new("alice", "pw1")).unwrap());
    assert!(!transport.create_user(&User::new("alice", "other")).unwrap());
    // The first registration's password still holds
    assert!(transport.authenticate(&User::new("alice", "pw1")).unwrap());
    assert!(!transport.authenticate(&User::new("alice", "other")).unwrap());
}

#[test]
fn authentication_is_exact() {
    let (_dir, transport) = transport();
    transport.create_user(&User::new("alice", "pw1")).unwrap();

    assert!(transport.authenticate(&User::new("alice", "pw1")).unwrap());
    assert!(!transport.authenticate(&User::new("alice", "PW1")).unwrap());
    assert!(!transport.authenticate(&User::new("alice", "pw1 ")).unwrap());
    assert!(!transport.authenticate(&User::new("bob", "pw1")).unwrap());
}

#[test]
fn saved_event_reads_back_whole() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    transport.create_user(&alice).unwrap();

    let day = date(2024, 3, 5);
    let mut event = Event::new("standup", at(day, 9, 0), at(day, 9, 15));
    event.place = "room 4".into();
    event.description = "daily sync".into();

    let id = transport.save_event(&alice, &event).unwrap();
    let stored = transport.get_event(&alice, day, id).unwrap().unwrap();

    assert_eq!(stored.id(), Some(id));
    assert_eq!(stored.summary.name, "standup");
    assert_eq!(stored.summary.beginning, event.summary.beginning);
    assert_eq!(stored.summary.end, event.summary.end);
    assert_eq!(stored.place, "room 4");
    assert_eq!(stored.description, "daily sync");
}

#[test]
fn identifiers_increase_and_are_never_reused() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    transport.create_user(&alice).unwrap();

    let day = date(2024, 3, 5);
    let mut previous = None;
    for n in 0..5 {
        let event = Event::new(format!("e{n}"), at(day, 9, n), at(day, 10, 0));
        let id = transport.save_event(&alice, &event).unwrap();
        if let Some(previous) = previous {
            assert!(id > previous);
        }
        previous = Some(id);
    }

    let last = previous.unwrap();
    transport.delete_event(&alice, day, last).unwrap();
    let id = transport
        .save_event(&alice, &Event::new("after delete", at(day, 11, 0), at(day, 12, 0)))
        .unwrap();
    assert!(id > last);
}

#[test]
fn identifiers_are_per_user() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    let bob = User::new("bob", "pw2");
    transport.create_user(&alice).unwrap();
    transport.create_user(&bob).unwrap();

    let day = date(2024, 3, 5);
    let event = Event::new("standup", at(day, 9, 0), at(day, 10, 0));
    assert_eq!(transport.save_event(&alice, &event).unwrap(), 0);
    assert_eq!(transport.save_event(&bob, &event).unwrap(), 0);
    assert_eq!(transport.save_event(&alice, &event).unwrap(), 1);
}

#[test]
fn deletion_is_idempotent() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    transport.create_user(&alice).unwrap();

    let day = date(2024, 3, 5);
    let id = transport
        .save_event(&alice, &Event::new("standup", at(day, 9, 0), at(day, 10, 0)))
        .unwrap();

    transport.delete_event(&alice, day, id).unwrap();
    assert!(transport.get_event(&alice, day, id).unwrap().is_none());
    transport.delete_event(&alice, day, id).unwrap();
    assert!(transport.get_event(&alice, day, id).unwrap().is_none());
    transport.delete_event(&alice, date(2030, 1, 1), 999).unwrap();
    assert!(transport.get_event(&alice, date(2030, 1, 1), 999).unwrap().is_none());
}

#[test]
fn events_live_in_their_beginning_day_and_owner() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    let bob = User::new("bob", "pw2");
    transport.create_user(&alice).unwrap();
    transport.create_user(&bob).unwrap();

    // Crosses midnight: belongs to the day it begins
    let day = date(2024, 3, 5);
    let late = Event::new("late shift", at(day, 23, 0), at(date(2024, 3, 6), 2, 0));
    let id = transport.save_event(&alice, &late).unwrap();

    let listed = transport.get_events(&alice, day).unwrap().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, Some(id));
    assert!(transport.get_events(&alice, date(2024, 3, 4)).unwrap().is_none());
    assert!(transport.get_events(&alice, date(2024, 3, 6)).unwrap().is_none());
    assert!(transport.get_events(&bob, day).unwrap().is_none());
    assert!(transport.get_event(&bob, day, id).unwrap().is_none());
}

#[test]
fn empty_and_missing_days_differ() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    transport.create_user(&alice).unwrap();

    let day = date(2024, 3, 5);
    let id = transport
        .save_event(&alice, &Event::new("standup", at(day, 9, 0), at(day, 10, 0)))
        .unwrap();
    transport.delete_event(&alice, day, id).unwrap();

    assert_eq!(transport.get_events(&alice, day).unwrap(), Some(vec![]));
    assert_eq!(transport.get_events(&alice, date(2024, 3, 6)).unwrap(), None);
}

#[test]
fn wrong_credentials_are_not_mistaken_for_missing_data() {
    let (_dir, transport) = transport();
    transport.create_user(&User::new("alice", "pw1")).unwrap();

    let day = date(2024, 3, 5);
    let intruder = User::new("alice", "guess");
    assert!(matches!(
        transport.get_events(&intruder, day),
        Err(TransportError::Unauthorized)
    ));
    assert!(matches!(
        transport.get_event(&intruder, day, 0),
        Err(TransportError::Unauthorized)
    ));
}

#[test]
fn cursor_narrows_to_days_three_through_six() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    transport.create_user(&alice).unwrap();

    // Saved out of order to make sure listing order is not insertion order
    for day in (1..=10).rev() {
        let d = date(2024, 3, day);
        transport
            .save_event(&alice, &Event::new(format!("late{day}"), at(d, 15, 0), at(d, 16, 0)))
            .unwrap();
        transport
            .save_event(&alice, &Event::new(format!("early{day}"), at(d, 9, 0), at(d, 10, 0)))
            .unwrap();
    }

    let window = RangedEvents::new(&transport, &alice, date(2024, 3, 1))
        .narrow(RangePredicate::BeginningAtLeast(date(2024, 3, 3)))
        .narrow(RangePredicate::BeginningBefore(date(2024, 3, 7)));
    let names: Vec<String> = window.iter().map(|e| e.name).collect();

    assert_eq!(
        names,
        vec!["early3", "late3", "early4", "late4", "early5", "late5", "early6", "late6"]
    );
}

#[test]
fn cursor_gives_up_after_the_day_cap() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    transport.create_user(&alice).unwrap();

    let start = date(2024, 1, 1);
    let far = start + chrono::Days::new(u64::from(MAX_DAYS_SCANNED) + 5);
    transport
        .save_event(&alice, &Event::new("far away", at(far, 9, 0), at(far, 10, 0)))
        .unwrap();

    let events = RangedEvents::new(&transport, &alice, start);
    let mut cursor = events.iter();
    assert!(cursor.next().is_none());
    assert_eq!(cursor.days_scanned(), MAX_DAYS_SCANNED);
}

#[test]
fn alice_lists_a_single_standup() {
    let (_dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    assert!(transport.create_user(&alice).unwrap());

    let monday = date(2024, 3, 4);
    transport
        .save_event(&alice, &Event::new("standup", at(monday, 9, 0), at(monday, 9, 15)))
        .unwrap();

    let session = Session::login(&transport, alice).unwrap().unwrap();
    let week = session.list(ViewSpan::Week, monday);
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].name, "standup");
    assert_eq!(week[0].id, Some(0));
}

#[test]
fn alice_sees_her_standups_for_the_week() {
    let (dir, transport) = transport();
    let alice = User::new("alice", "pw1");
    assert!(transport.create_user(&alice).unwrap());

    // Mon 2024-03-04 .. Fri 2024-03-08
    for day in 4..=8 {
        let d = date(2024, 3, day);
        transport
            .save_event(&alice, &Event::new("standup", at(d, 9, 0), at(d, 9, 15)))
            .unwrap();
    }

    let session = Session::login(&transport, alice.clone()).unwrap().unwrap();
    let week = session.list(ViewSpan::Week, date(2024, 3, 6));
    assert_eq!(week.len(), 5);
    assert!(week.iter().all(|e| e.name == "standup"));
    assert!(week.windows(2).all(|pair| pair[0] < pair[1]));

    let ids: Vec<_> = week.iter().filter_map(|e| e.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);

    // Files land where other tools expect them
    assert!(dir.path().join("alice/2024/3/4/0").is_file());
    assert!(dir.path().join("alice/IDCounter").is_file());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("alice/IDCounter")).unwrap(),
        "5"
    );

    // And survive reopening the store
    let reopened = FileStore::open(dir.path()).unwrap();
    let friday = reopened.get_events(date(2024, 3, 8), &alice).unwrap().unwrap();
    assert_eq!(friday.len(), 1);
}
