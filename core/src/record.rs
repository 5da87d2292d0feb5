//! The replacement record and the form submission that creates one.

use crate::{
    date::is_supported,
    error::{CheckError, CheckResult},
    schedule::due_date_for,
    types::TransmitterName,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the sheet: one battery replacement event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub transmitter_name: TransmitterName,
    pub location:         String,
    pub last_replaced:    Option<NaiveDate>,
    pub next_due:         Option<NaiveDate>,
    #[serde(default)]
    pub note:             String,
    #[serde(default)]
    pub status:           Option<StoredStatus>,
    /// Set while decoding; never persisted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review:           Vec<ReviewReason>,
}

impl Record {
    pub fn new(
        transmitter_name: impl Into<String>,
        location: impl Into<String>,
        last_replaced: Option<NaiveDate>,
    ) -> Self {
        Self {
            transmitter_name: transmitter_name.into(),
            location:         location.into(),
            last_replaced,
            next_due:         None,
            note:             String::new(),
            status:           None,
            review:           Vec::new(),
        }
    }

    pub fn with_next_due(mut self, next_due: Option<NaiveDate>) -> Self {
        self.next_due = next_due;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Trimmed name, or `None` when the row has no usable transmitter name.
    pub fn group_key(&self) -> Option<&str> {
        let name = self.transmitter_name.trim();
        (!is_placeholder_name(name)).then_some(name)
    }

    pub fn needs_review(&self) -> bool {
        !self.review.is_empty()
    }

    /// Equality over the fields a user can see in the sheet.
    pub fn same_visible_fields(&self, other: &Record) -> bool {
        self.transmitter_name == other.transmitter_name
            && self.location == other.location
            && self.last_replaced == other.last_replaced
            && self.next_due == other.next_due
            && self.note == other.note
            && self.status == other.status
    }
}

/// Empty, `none` or `nan` names never identify a transmitter.
pub fn is_placeholder_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("nan")
}

/// The status column as persisted. Display status is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredStatus {
    #[serde(rename = "OK")]
    Ok,
}

impl StoredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoredStatus::Ok => "OK",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().eq_ignore_ascii_case("ok").then_some(StoredStatus::Ok)
    }
}

/// Why a decoded row needs a human to look at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReviewReason {
    /// Legacy rows kept free text in the next-due column.
    NoteInDueColumn { raw: String },
    UnparsableReplacementDate { raw: String },
}

/// A replacement event as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub transmitter_name: String,
    pub location:         String,
    pub replaced_on:      NaiveDate,
    #[serde(default)]
    pub note:             Option<String>,
}

impl NewEntry {
    /// Check required fields and build the record to append.
    pub fn validate(&self) -> CheckResult<Record> {
        let name = self.transmitter_name.trim();
        if name.is_empty() {
            return Err(CheckError::MissingField { field: "transmitter_name" });
        }
        if is_placeholder_name(name) {
            return Err(CheckError::InvalidField {
                field:  "transmitter_name",
                reason: format!("'{name}' is reserved for empty cells"),
            });
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(CheckError::MissingField { field: "location" });
        }
        let next_due = due_date_for(self.replaced_on)
            .filter(|due| is_supported(self.replaced_on) && is_supported(*due))
            .ok_or_else(|| CheckError::InvalidField {
                field:  "replaced_on",
                reason: format!("{} is outside the dates the sheet can hold", self.replaced_on),
            })?;

        Ok(Record {
            transmitter_name: name.to_string(),
            location:         location.to_string(),
            last_replaced:    Some(self.replaced_on),
            next_due:         Some(next_due),
            note:             self.note.as_deref().map(str::trim).unwrap_or_default().to_string(),
            status:           Some(StoredStatus::Ok),
            review:           Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn entry(name: &str, location: &str) -> NewEntry {
        NewEntry {
            transmitter_name: name.into(),
            location:         location.into(),
            replaced_on:      NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            note:             Some("  CR2032 ".into()),
        }
    }

    #[test]
    fn valid_entry_builds_complete_record() {
        let rec = entry(" Sender 01 ", "Halle A").validate().unwrap();
        assert_eq!(rec.transmitter_name, "Sender 01");
        assert_eq!(rec.next_due, NaiveDate::from_ymd_opt(2025, 11, 30));
        assert_eq!(rec.note, "CR2032");
        assert_eq!(rec.status, Some(StoredStatus::Ok));
    }

    #[test]
    fn missing_name_or_location_is_a_validation_error() {
        let err = entry("  ", "Halle A").validate().unwrap_err();
        assert!(matches!(err, CheckError::MissingField { field: "transmitter_name" }));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_retryable());

        let err = entry("Sender 01", "").validate().unwrap_err();
        assert!(matches!(err, CheckError::MissingField { field: "location" }));
    }

    #[test]
    fn placeholder_names_are_rejected() {
        let err = entry("None", "Halle A").validate().unwrap_err();
        assert!(matches!(err, CheckError::InvalidField { field: "transmitter_name", .. }));
    }

    #[test]
    fn dates_the_sheet_cannot_hold_are_rejected() {
        for day in [(1899, 6, 1), (2199, 12, 1)] {
            let mut e = entry("Sender 01", "Halle A");
            e.replaced_on = NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap();
            let err = e.validate().unwrap_err();
            assert!(matches!(err, CheckError::InvalidField { field: "replaced_on", .. }), "{day:?}");
        }
    }

    #[test]
    fn stored_status_parsing() {
        assert_eq!(StoredStatus::parse(" ok "), Some(StoredStatus::Ok));
        assert_eq!(StoredStatus::parse(""), None);
        assert_eq!(StoredStatus::Ok.as_str(), "OK");
    }
}
