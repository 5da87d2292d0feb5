//! In-memory sheet with fault injection, for tests and dry runs.

use super::EventStore;
use crate::{
    codec,
    error::{CheckError, CheckResult},
    record::Record,
    schema::{ColumnMapping, SheetTable},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    table:        SheetTable,
    mapping:      ColumnMapping,
    fail_writes:  bool,
    reads:        usize,
    write_calls:  usize,
}

impl MemoryStore {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self { mapping, ..Self::default() }
    }

    /// Start from an existing grid, e.g. a legacy sheet.
    pub fn from_table(table: SheetTable, mapping: ColumnMapping) -> Self {
        Self { table, mapping, ..Self::default() }
    }

    pub fn with_records(records: &[Record]) -> Self {
        let mapping = ColumnMapping::default();
        Self::from_table(codec::encode(records, &mapping), mapping)
    }

    /// Make every following write fail without touching the sheet.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn table(&self) -> &SheetTable {
        &self.table
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Write attempts, including failed ones.
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }
}

impl EventStore for MemoryStore {
    fn read_all(&mut self) -> CheckResult<Vec<Record>> {
        self.reads += 1;
        codec::decode(&self.table, &self.mapping)
    }

    fn write_all(&mut self, records: &[Record]) -> CheckResult<()> {
        self.write_calls += 1;
        if self.fail_writes {
            return Err(CheckError::WriteFailed {
                reason: "sheet is read-only".into(),
            });
        }
        self.table = codec::encode(records, &self.mapping);
        Ok(())
    }
}
