//! Conversion between the raw sheet grid and typed records.

use crate::{
    date::{format_optional, is_blank, normalize, CellValue},
    error::{CheckError, CheckResult},
    record::{Record, ReviewReason, StoredStatus},
    schema::{ColumnMapping, SheetTable},
};

struct Positions {
    name:     usize,
    location: usize,
    last:     usize,
    due:      usize,
    note:     Option<usize>,
    status:   Option<usize>,
}

impl Positions {
    fn resolve(table: &SheetTable, mapping: &ColumnMapping) -> CheckResult<Self> {
        let required = |column: &str| {
            table.column_index(column).ok_or_else(|| CheckError::MissingColumn {
                column: column.to_string(),
            })
        };
        Ok(Self {
            name:     required(&mapping.transmitter_name)?,
            location: required(&mapping.location)?,
            last:     required(&mapping.last_replaced)?,
            due:      required(&mapping.next_due)?,
            note:     table.column_index(&mapping.note),
            status:   table.column_index(&mapping.status),
        })
    }
}

/// Decode every non-blank row. An empty sheet decodes to no records.
pub fn decode(table: &SheetTable, mapping: &ColumnMapping) -> CheckResult<Vec<Record>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let pos = Positions::resolve(table, mapping)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        if row.iter().all(|c| is_blank(c)) {
            continue;
        }
        let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or("");
        let opt_cell = |i: Option<usize>| i.map(cell).unwrap_or("");

        let mut review = Vec::new();
        let last_raw = cell(pos.last);
        let last_replaced = normalize(&CellValue::from(last_raw));
        if last_replaced.is_none() && !is_blank(last_raw) {
            log::warn!("row {}: unreadable replacement date '{last_raw}'", row_no + 2);
            review.push(ReviewReason::UnparsableReplacementDate { raw: last_raw.to_string() });
        }

        let mut note = opt_cell(pos.note).to_string();
        let due_raw = cell(pos.due);
        let next_due = normalize(&CellValue::from(due_raw));
        if next_due.is_none() && !is_blank(due_raw) {
            log::warn!("row {}: free text '{due_raw}' in due-date column, kept as note", row_no + 2);
            note = if note.is_empty() {
                due_raw.to_string()
            } else {
                format!("{note}; {due_raw}")
            };
            review.push(ReviewReason::NoteInDueColumn { raw: due_raw.to_string() });
        }

        records.push(Record {
            transmitter_name: cell(pos.name).to_string(),
            location: cell(pos.location).to_string(),
            last_replaced,
            next_due,
            note,
            status: StoredStatus::parse(opt_cell(pos.status)),
            review,
        });
    }
    Ok(records)
}

/// Encode records under the mapping's full header, so every column exists
/// after the first write.
pub fn encode(records: &[Record], mapping: &ColumnMapping) -> SheetTable {
    let mut table = SheetTable::new(mapping.headers().iter().map(|h| h.to_string()).collect());
    for rec in records {
        table.push_row([
            rec.transmitter_name.clone(),
            rec.location.clone(),
            format_optional(rec.last_replaced),
            format_optional(rec.next_due),
            rec.note.clone(),
            rec.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
        ]);
    }
    table
}
