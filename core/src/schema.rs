//! Sheet layout: the raw grid and the versioned column mapping.

use crate::error::{CheckError, CheckResult};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 2;

/// Header names for each record field.
///
/// Version 1 sheets only had the first four columns and used the
/// next-due column for free-text notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_version")]
    pub schema_version:   u32,
    pub transmitter_name: String,
    pub location:         String,
    pub last_replaced:    String,
    pub next_due:         String,
    pub note:             String,
    pub status:           String,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            schema_version:   SCHEMA_VERSION,
            transmitter_name: "Sender Name".into(),
            location:         "Standort".into(),
            last_replaced:    "Letzter Batteriewechsel".into(),
            next_due:         "Nächster Wechsel (geplant)".into(),
            note:             "Bemerkung".into(),
            status:           "Status".into(),
        }
    }
}

impl ColumnMapping {
    /// Headers in write order.
    pub fn headers(&self) -> [&str; 6] {
        [
            self.transmitter_name.as_str(),
            self.location.as_str(),
            self.last_replaced.as_str(),
            self.next_due.as_str(),
            self.note.as_str(),
            self.status.as_str(),
        ]
    }

    /// Columns that must be present for a sheet to be readable.
    pub fn required(&self) -> [&str; 4] {
        [
            self.transmitter_name.as_str(),
            self.location.as_str(),
            self.last_replaced.as_str(),
            self.next_due.as_str(),
        ]
    }

    pub fn validate(&self) -> CheckResult<()> {
        if self.schema_version == 0 || self.schema_version > SCHEMA_VERSION {
            return Err(CheckError::InvalidMapping {
                reason: format!("unsupported schema version {}", self.schema_version),
            });
        }
        let headers = self.headers();
        for (i, h) in headers.iter().enumerate() {
            if h.trim().is_empty() {
                return Err(CheckError::InvalidMapping {
                    reason: format!("column {} has an empty header", i + 1),
                });
            }
            if headers[..i].iter().any(|prev| prev.trim() == h.trim()) {
                return Err(CheckError::InvalidMapping {
                    reason: format!("header '{h}' is mapped twice"),
                });
            }
        }
        Ok(())
    }
}

/// A sheet as a store sees it: one header row and rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows:   Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(header: Vec<String>) -> Self {
        Self { header, rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name.trim())
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_is_valid() {
        ColumnMapping::default().validate().unwrap();
    }

    #[test]
    fn duplicate_and_empty_headers_rejected() {
        let mapping = ColumnMapping {
            note: "Standort".into(),
            ..ColumnMapping::default()
        };
        assert!(matches!(mapping.validate(), Err(CheckError::InvalidMapping { .. })));

        let mapping = ColumnMapping {
            status: " ".into(),
            ..ColumnMapping::default()
        };
        assert!(matches!(mapping.validate(), Err(CheckError::InvalidMapping { .. })));
    }

    #[test]
    fn future_schema_version_rejected() {
        let mapping = ColumnMapping {
            schema_version: SCHEMA_VERSION + 1,
            ..ColumnMapping::default()
        };
        assert!(mapping.validate().is_err());
    }

    #[test]
    fn column_lookup_ignores_padding() {
        let table = SheetTable::new(vec![" Sender Name".into(), "Standort ".into()]);
        assert_eq!(table.column_index("Standort"), Some(1));
        assert_eq!(table.column_index("Status"), None);
    }
}
