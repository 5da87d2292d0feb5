use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::NewEntry;

/// Commands a front end sends over the IPC channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum UiCommand {
    GetState,
    SetFilter {
        #[serde(default)]
        sender: Option<String>,
    },
    Submit {
        sender:   String,
        location: String,
        /// Defaults to today when omitted.
        #[serde(default)]
        date:     Option<NaiveDate>,
        #[serde(default)]
        note:     Option<String>,
    },
    Quit,
}

impl UiCommand {
    /// Form fields as an entry, or `None` for non-submit commands.
    pub fn into_entry(self, today: NaiveDate) -> Option<NewEntry> {
        match self {
            UiCommand::Submit { sender, location, date, note } => Some(NewEntry {
                transmitter_name: sender,
                location,
                replaced_on: date.unwrap_or(today),
                note,
            }),
            _ => None,
        }
    }
}
