//! File-backed sheet store: round trips, schema checks, legacy sheets.

use battery_check_core::{
    clock::FixedClock,
    record::{NewEntry, ReviewReason, StoredStatus},
    schema::{ColumnMapping, SheetTable},
    store::{CachedStore, EventStore, SqliteSheetStore},
    CheckError, ErrorKind, Record, Tracker,
};
use chrono::NaiveDate;
use std::time::Duration;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open(dir: &tempfile::TempDir) -> SqliteSheetStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = dir.path().join("sheet.db");
    SqliteSheetStore::open(path.to_str().unwrap(), "Wartungsliste", ColumnMapping::default())
        .expect("open sheet store")
}

#[test]
fn write_then_read_round_trips_visible_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);

    let mut with_status = Record::new("Sender 02", "Dach", Some(ymd(2023, 3, 15)))
        .with_next_due(Some(ymd(2024, 9, 13)))
        .with_note("2x AA");
    with_status.status = Some(StoredStatus::Ok);
    let written = vec![
        Record::new("Sender 01", "Halle A", Some(ymd(2024, 6, 1))),
        with_status,
        Record::new("Sender 03", "Keller", None).with_note("Ersatz bestellt"),
    ];
    store.write_all(&written).unwrap();

    // A second connection sees the committed sheet.
    let mut reopened = open(&dir);
    let read = reopened.read_all().unwrap();
    assert_eq!(read.len(), written.len());
    for (a, b) in written.iter().zip(&read) {
        assert!(a.same_visible_fields(b), "{a:?} != {b:?}");
    }
}

#[test]
fn submissions_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let today = ymd(2025, 2, 1);
    {
        let mut tracker = Tracker::new(open(&dir), FixedClock(today));
        for name in ["Sender 01", "Sender 02", "Sender 01"] {
            tracker
                .submit(&NewEntry {
                    transmitter_name: name.into(),
                    location:         "Halle A".into(),
                    replaced_on:      today,
                    note:             None,
                })
                .unwrap();
        }
    }
    let mut tracker = Tracker::new(open(&dir), FixedClock(today));
    let dash = tracker.dashboard(None).unwrap();
    assert_eq!(dash.history.len(), 3);
    assert_eq!(dash.current.len(), 2);
    assert_eq!(tracker.store().revision().unwrap(), 3);
}

#[test]
fn missing_column_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    let mut table = SheetTable::new(vec!["Sender Name".into(), "Standort".into()]);
    table.push_row(["Sender 01", "Halle A"]);
    store.write_table(&table).unwrap();

    let err = store.read_all().unwrap_err();
    assert!(matches!(err, CheckError::MissingColumn { .. }));
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn legacy_sheet_is_ported_with_review_flags() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    let mapping = ColumnMapping::default();
    let mut legacy = SheetTable::new(mapping.required().iter().map(|h| h.to_string()).collect());
    legacy.push_row(["Sender 01", "Halle A", "2024-01-01", "CR2032"]);
    legacy.push_row(["Sender 02", "Halle B", "15.03.2024", ""]);
    store.write_table(&legacy).unwrap();

    let mut tracker = Tracker::new(store, FixedClock(ymd(2025, 1, 1)));
    let dash = tracker.dashboard(None).unwrap();
    assert_eq!(dash.needs_review.len(), 1);
    assert_eq!(dash.needs_review[0].note, "CR2032");
    assert_eq!(
        dash.needs_review[0].review,
        [ReviewReason::NoteInDueColumn { raw: "CR2032".into() }]
    );
    let s1 = dash.current.iter().find(|r| r.record.transmitter_name == "Sender 01").unwrap();
    assert_eq!(s1.record.next_due, Some(ymd(2025, 7, 1)));

    // The next write synthesizes the missing columns.
    tracker
        .submit(&NewEntry {
            transmitter_name: "Sender 03".into(),
            location:         "Halle C".into(),
            replaced_on:      ymd(2025, 1, 1),
            note:             None,
        })
        .unwrap();
    let table = tracker.store().read_table().unwrap();
    assert_eq!(table.header, mapping.headers());
    assert_eq!(table.rows[0][4], "CR2032");
    assert_eq!(table.rows[0][3], "");
}

#[test]
fn cached_store_sees_writes_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let store = CachedStore::new(open(&dir), Duration::from_secs(300));
    let mut tracker = Tracker::new(store, FixedClock(ymd(2025, 1, 1)));

    assert!(tracker.dashboard(None).unwrap().current.is_empty());
    tracker
        .submit(&NewEntry {
            transmitter_name: "Sender 01".into(),
            location:         "Halle A".into(),
            replaced_on:      ymd(2025, 1, 1),
            note:             None,
        })
        .unwrap();
    assert_eq!(tracker.dashboard(None).unwrap().current.len(), 1);
}
