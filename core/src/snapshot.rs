//! Immutable snapshot of the full sheet.
//!
//! A snapshot holds the rows exactly as one read of the store returned
//! them. Appending produces a new snapshot and leaves the old one alone,
//! so a failed write simply drops the new one. Due dates are completed
//! only on the way to a view, never in the persisted rows.

use crate::{record::Record, schedule::complete_due_dates};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    records: Arc<[Record]>,
}

impl TableSnapshot {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records: records.into() }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Rows with missing due dates filled in.
    pub fn completed(&self) -> Vec<Record> {
        let mut records = self.records.to_vec();
        complete_due_dates(&mut records);
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn with_appended(&self, record: Record) -> Self {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend_from_slice(&self.records);
        records.push(record);
        Self { records: records.into() }
    }
}
