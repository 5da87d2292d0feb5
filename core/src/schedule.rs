//! Replacement schedule: due-date completion and status classification.

use crate::{
    record::Record,
    types::{DUE_SOON_WINDOW_DAYS, REPLACEMENT_INTERVAL_DAYS},
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// `last + 547 days`. `None` only on calendar overflow.
pub fn due_date_for(last_replaced: NaiveDate) -> Option<NaiveDate> {
    last_replaced.checked_add_days(Days::new(REPLACEMENT_INTERVAL_DAYS))
}

/// Fill in a missing due date. Present due dates are never touched.
pub fn complete_due_date(record: &mut Record) {
    if record.next_due.is_none() {
        record.next_due = record.last_replaced.and_then(due_date_for);
    }
}

pub fn complete_due_dates(records: &mut [Record]) {
    records.iter_mut().for_each(complete_due_date);
}

/// Display status derived from the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Overdue,
    DueSoon,
    Ok,
    Unknown,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Overdue, Status::DueSoon, Status::Ok, Status::Unknown];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Overdue => "OVERDUE",
            Status::DueSoon => "DUE_SOON",
            Status::Ok      => "OK",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Row background for the status table. Unknown rows stay uncoloured.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Status::Overdue => Some("#ffcccc"),
            Status::DueSoon => Some("#fff3cd"),
            Status::Ok      => Some("#d4edda"),
            Status::Unknown => None,
        }
    }
}

pub fn classify(next_due: Option<NaiveDate>, today: NaiveDate) -> Status {
    let Some(due) = next_due else {
        return Status::Unknown;
    };
    let days_left = (due - today).num_days();
    if days_left < 0 {
        Status::Overdue
    } else if days_left < DUE_SOON_WINDOW_DAYS {
        Status::DueSoon
    } else {
        Status::Ok
    }
}
