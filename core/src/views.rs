//! Derived views over the full table.
//!
//! Everything here is a pure function of a record slice (plus `today`
//! for classification). Nothing mutates the input.

use crate::{
    record::Record,
    schedule::{classify, complete_due_date, Status},
    snapshot::TableSnapshot,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap};

/// The current record for every named transmitter, soonest due first.
///
/// Within a name group the record with the latest replacement date wins;
/// rows without a date rank lowest and a later row beats an earlier one
/// on equal dates.
pub fn latest_per_transmitter(records: &[Record]) -> Vec<Record> {
    let mut slot_by_name: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<&Record> = Vec::new();

    for rec in records {
        let Some(key) = rec.group_key() else { continue };
        match slot_by_name.get(key) {
            Some(&slot) => {
                // Option ordering puts None below every date.
                if rec.last_replaced >= latest[slot].last_replaced {
                    latest[slot] = rec;
                }
            }
            None => {
                slot_by_name.insert(key, latest.len());
                latest.push(rec);
            }
        }
    }

    let mut current: Vec<Record> = latest
        .into_iter()
        .map(|rec| {
            let mut rec = rec.clone();
            complete_due_date(&mut rec);
            rec
        })
        .collect();
    current.sort_by(|a, b| {
        cmp_missing_last(a.next_due, b.next_due)
            .then_with(|| a.transmitter_name.trim().cmp(b.transmitter_name.trim()))
    });
    current
}

/// Full history, newest replacement first, optionally for one transmitter.
pub fn history(records: &[Record], transmitter: Option<&str>) -> Vec<Record> {
    let filter = transmitter.map(str::trim).filter(|f| !f.is_empty());
    let mut rows: Vec<Record> = records
        .iter()
        .filter(|rec| filter.map_or(true, |name| rec.transmitter_name.trim() == name))
        .cloned()
        .collect();
    // Stable sort: equal dates keep sheet order.
    rows.sort_by(|a, b| cmp_newest_first(a.last_replaced, b.last_replaced));
    rows
}

/// Distinct transmitter names in first-seen order, for the history filter.
pub fn transmitter_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for key in records.iter().filter_map(Record::group_key) {
        if !names.iter().any(|n| n == key) {
            names.push(key.to_string());
        }
    }
    names
}

/// Ascending with `None` after every date.
fn cmp_missing_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending with `None` after every date.
fn cmp_newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        _ => cmp_missing_last(a, b),
    }
}

/// One line of the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    pub record: Record,
    pub status: Status,
    pub color:  Option<String>,
}

impl StatusRow {
    pub fn classify(record: Record, today: NaiveDate) -> Self {
        let status = classify(record.next_due, today);
        Self {
            record,
            status,
            color: status.color().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub overdue:  usize,
    pub due_soon: usize,
    pub ok:       usize,
    pub unknown:  usize,
}

impl StatusCounts {
    fn tally(rows: &[StatusRow]) -> Self {
        let mut counts = Self::default();
        for row in rows {
            match row.status {
                Status::Overdue => counts.overdue += 1,
                Status::DueSoon => counts.due_soon += 1,
                Status::Ok      => counts.ok += 1,
                Status::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

/// Every view the UI renders, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub today:        NaiveDate,
    pub filter:       Option<String>,
    pub current:      Vec<StatusRow>,
    pub counts:       StatusCounts,
    pub history:      Vec<Record>,
    pub transmitters: Vec<String>,
    pub needs_review: Vec<Record>,
}

impl Dashboard {
    pub fn derive(snapshot: &TableSnapshot, today: NaiveDate, filter: Option<&str>) -> Self {
        let records = snapshot.completed();
        let current: Vec<StatusRow> = latest_per_transmitter(&records)
            .into_iter()
            .map(|rec| StatusRow::classify(rec, today))
            .collect();
        Self {
            today,
            filter: filter.map(str::trim).filter(|f| !f.is_empty()).map(str::to_string),
            counts: StatusCounts::tally(&current),
            current,
            history: history(&records, filter),
            transmitters: transmitter_names(&records),
            needs_review: records.iter().filter(|r| r.needs_review()).cloned().collect(),
        }
    }
}
