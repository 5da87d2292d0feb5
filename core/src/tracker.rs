//! The tracker: one read-modify-write cycle per user interaction.
//!
//! RULES:
//!   - Validation happens before the store is touched.
//!   - A submission reads the full sheet past any cache, appends one row
//!     and writes the full sheet back. Nothing else writes.
//!   - A failed write is reported, never retried here, and the appended
//!     snapshot is dropped.
//!   - Views are derived from a fresh snapshot on every call.

use crate::{
    clock::Clock,
    error::CheckResult,
    record::{NewEntry, Record},
    snapshot::TableSnapshot,
    store::EventStore,
    views::Dashboard,
};

pub struct Tracker<S, C> {
    store: S,
    clock: C,
}

impl<S: EventStore, C: Clock> Tracker<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Read the full sheet.
    pub fn snapshot(&mut self) -> CheckResult<TableSnapshot> {
        let records = self.store.read_all()?;
        Ok(TableSnapshot::new(records))
    }

    /// Register a replacement. Returns the appended record once it is durable.
    pub fn submit(&mut self, entry: &NewEntry) -> CheckResult<Record> {
        let record = match entry.validate() {
            Ok(r) => r,
            Err(e) => {
                log::warn!("submission rejected: {e}");
                return Err(e);
            }
        };

        let current = TableSnapshot::new(self.store.read_fresh()?);
        let next = current.with_appended(record.clone());
        if let Err(e) = self.store.write_all(next.records()) {
            log::error!(
                "write of {} rows failed, '{}' not saved: {e}",
                next.len(),
                record.transmitter_name
            );
            return Err(e);
        }

        log::info!(
            "saved replacement for '{}' at {} (next due {})",
            record.transmitter_name,
            record.location,
            crate::date::format_optional(record.next_due),
        );
        Ok(record)
    }

    /// Everything a front end renders, for today.
    pub fn dashboard(&mut self, filter: Option<&str>) -> CheckResult<Dashboard> {
        let snapshot = self.snapshot()?;
        Ok(Dashboard::derive(&snapshot, self.clock.today(), filter))
    }
}
