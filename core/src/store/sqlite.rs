//! SQLite-backed sheet.

use super::EventStore;
use crate::{
    codec,
    error::{CheckError, CheckResult},
    record::Record,
    schema::{ColumnMapping, SheetTable},
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteSheetStore {
    conn:    Connection,
    sheet:   String,
    mapping: ColumnMapping,
}

impl SqliteSheetStore {
    /// Open (or create) the database at `path` and apply migrations.
    pub fn open(path: &str, sheet: &str, mapping: ColumnMapping) -> CheckResult<Self> {
        mapping.validate()?;
        let conn = Connection::open(path)?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        let store = Self { conn, sheet: sheet.to_string(), mapping };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory(sheet: &str, mapping: ColumnMapping) -> CheckResult<Self> {
        mapping.validate()?;
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, sheet: sheet.to_string(), mapping };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> CheckResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_sheet.sql"))?;
        Ok(())
    }

    /// Number of completed full-sheet writes.
    pub fn revision(&self) -> CheckResult<u64> {
        let rev: Option<i64> = self
            .conn
            .query_row(
                "SELECT revision FROM sheet_meta WHERE sheet = ?1",
                params![self.sheet],
                |row| row.get(0),
            )
            .optional()?;
        Ok(rev.unwrap_or(0) as u64)
    }

    // ── Grid ───────────────────────────────────────────────────

    pub fn read_table(&self) -> CheckResult<SheetTable> {
        let mut stmt = self.conn.prepare(
            "SELECT header FROM sheet_column WHERE sheet = ?1 ORDER BY position ASC",
        )?;
        let header = stmt
            .query_map(params![self.sheet], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT cells_json FROM sheet_row WHERE sheet = ?1 ORDER BY row_index ASC",
        )?;
        let raw_rows = stmt
            .query_map(params![self.sheet], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let rows = raw_rows
            .iter()
            .map(|json| serde_json::from_str::<Vec<String>>(json))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("read sheet '{}': {} rows", self.sheet, rows.len());
        Ok(SheetTable { header, rows })
    }

    /// Replace the sheet atomically. Either every row lands or none does.
    pub fn write_table(&mut self, table: &SheetTable) -> CheckResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM sheet_column WHERE sheet = ?1", params![self.sheet])?;
        tx.execute("DELETE FROM sheet_row WHERE sheet = ?1", params![self.sheet])?;
        {
            let mut col = tx.prepare(
                "INSERT INTO sheet_column (sheet, position, header) VALUES (?1, ?2, ?3)",
            )?;
            for (i, h) in table.header.iter().enumerate() {
                col.execute(params![self.sheet, i as i64, h])?;
            }
            let mut row = tx.prepare(
                "INSERT INTO sheet_row (sheet, row_index, cells_json) VALUES (?1, ?2, ?3)",
            )?;
            for (i, cells) in table.rows.iter().enumerate() {
                row.execute(params![self.sheet, i as i64, serde_json::to_string(cells)?])?;
            }
        }
        tx.execute(
            "INSERT INTO sheet_meta (sheet, schema_version, revision) VALUES (?1, ?2, 1)
             ON CONFLICT(sheet) DO UPDATE SET schema_version = ?2, revision = revision + 1",
            params![self.sheet, self.mapping.schema_version as i64],
        )?;
        tx.commit().map_err(|e| CheckError::WriteFailed { reason: e.to_string() })?;
        log::debug!("wrote sheet '{}': {} rows", self.sheet, table.rows.len());
        Ok(())
    }
}

impl EventStore for SqliteSheetStore {
    fn read_all(&mut self) -> CheckResult<Vec<Record>> {
        let table = self.read_table()?;
        codec::decode(&table, &self.mapping)
    }

    fn write_all(&mut self, records: &[Record]) -> CheckResult<()> {
        let table = codec::encode(records, &self.mapping);
        self.write_table(&table)
    }
}
