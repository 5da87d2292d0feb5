//! Derived views: current status table, classification, history.

use battery_check_core::{
    clock::FixedClock,
    snapshot::TableSnapshot,
    store::MemoryStore,
    views::{latest_per_transmitter, Dashboard},
    Record, Status, Tracker,
};
use chrono::{Duration, NaiveDate};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sender_01_latest_replacement_scenario() {
    let rows = vec![
        Record::new("Sender 01", "Halle A", Some(ymd(2024, 1, 1))),
        Record::new("Sender 01", "Halle A", Some(ymd(2024, 6, 1))),
    ];
    let current = latest_per_transmitter(&rows);
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].last_replaced, Some(ymd(2024, 6, 1)));
    assert_eq!(current[0].next_due, Some(ymd(2025, 11, 30)));
}

#[test]
fn dashboard_classifies_around_today() {
    let today = ymd(2025, 6, 1);
    // next_due = last + 547, so pick last dates that land on the boundaries.
    let last_for = |offset: i64| Some(today + Duration::days(offset - 547));
    let rows = vec![
        Record::new("late", "A", last_for(-1)),
        Record::new("today", "A", last_for(0)),
        Record::new("soon", "A", last_for(29)),
        Record::new("fine", "A", last_for(30)),
        Record::new("blank", "A", None),
    ];
    let mut tracker = Tracker::new(MemoryStore::with_records(&rows), FixedClock(today));
    let dash = tracker.dashboard(None).unwrap();

    let status_of = |name: &str| {
        dash.current
            .iter()
            .find(|r| r.record.transmitter_name == name)
            .map(|r| r.status)
            .unwrap()
    };
    assert_eq!(status_of("late"), Status::Overdue);
    assert_eq!(status_of("today"), Status::DueSoon);
    assert_eq!(status_of("soon"), Status::DueSoon);
    assert_eq!(status_of("fine"), Status::Ok);
    assert_eq!(status_of("blank"), Status::Unknown);

    // Soonest due first, unknown at the bottom.
    let order: Vec<_> = dash.current.iter().map(|r| r.record.transmitter_name.as_str()).collect();
    assert_eq!(order, ["late", "today", "soon", "fine", "blank"]);
    assert!(dash.current[4].color.is_none());
}

#[test]
fn history_filter_shows_every_event_for_one_sender() {
    let snapshot = TableSnapshot::new(vec![
        Record::new("Sender 01", "Halle A", Some(ymd(2023, 1, 1))),
        Record::new("Sender 02", "Halle B", Some(ymd(2023, 2, 1))),
        Record::new("Sender 01", "Halle A", Some(ymd(2024, 6, 1))),
    ]);
    let dash = Dashboard::derive(&snapshot, ymd(2025, 1, 1), Some("Sender 01"));
    assert_eq!(dash.filter.as_deref(), Some("Sender 01"));
    assert_eq!(dash.history.len(), 2);
    assert_eq!(dash.history[0].last_replaced, Some(ymd(2024, 6, 1)));
    // History rows get completed due dates too.
    assert_eq!(dash.history[1].next_due, Some(ymd(2024, 7, 1)));
    assert_eq!(dash.transmitters, ["Sender 01", "Sender 02"]);
}

#[test]
fn dashboard_serializes_for_the_ui() {
    let snapshot = TableSnapshot::new(vec![Record::new("Sender 01", "Halle A", Some(ymd(2024, 6, 1)))]);
    let dash = Dashboard::derive(&snapshot, ymd(2025, 11, 15), None);
    let json = serde_json::to_value(&dash).unwrap();
    assert_eq!(json["current"][0]["status"], "DUE_SOON");
    assert_eq!(json["current"][0]["record"]["transmitter_name"], "Sender 01");
    assert_eq!(json["current"][0]["record"]["next_due"], "2025-11-30");
}
