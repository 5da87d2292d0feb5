//! Event store adapters.
//!
//! RULE: Stores persist whole sheets. There are no partial updates:
//! `write_all` replaces every row, `read_all` returns every row.

mod cache;
mod memory;
mod sqlite;

pub use cache::CachedStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteSheetStore;

use crate::{error::CheckResult, record::Record};

pub trait EventStore {
    /// All rows in sheet order. An empty sheet yields an empty vec.
    fn read_all(&mut self) -> CheckResult<Vec<Record>>;

    /// Like `read_all`, but never served from a cache. Used before a write.
    fn read_fresh(&mut self) -> CheckResult<Vec<Record>> {
        self.read_all()
    }

    /// Replace the whole sheet with `records`.
    fn write_all(&mut self, records: &[Record]) -> CheckResult<()>;
}

impl<S: EventStore + ?Sized> EventStore for Box<S> {
    fn read_all(&mut self) -> CheckResult<Vec<Record>> {
        (**self).read_all()
    }

    fn read_fresh(&mut self) -> CheckResult<Vec<Record>> {
        (**self).read_fresh()
    }

    fn write_all(&mut self, records: &[Record]) -> CheckResult<()> {
        (**self).write_all(records)
    }
}

impl<S: EventStore + ?Sized> EventStore for &mut S {
    fn read_all(&mut self) -> CheckResult<Vec<Record>> {
        (**self).read_all()
    }

    fn read_fresh(&mut self) -> CheckResult<Vec<Record>> {
        (**self).read_fresh()
    }

    fn write_all(&mut self, records: &[Record]) -> CheckResult<()> {
        (**self).write_all(records)
    }
}
