//! Shared primitive types and fixed business constants.

/// Display name of a transmitter. Not unique across rows.
pub type TransmitterName = String;

/// Days between scheduled battery replacements (~18 months).
pub const REPLACEMENT_INTERVAL_DAYS: u64 = 547;

/// A due date closer than this many days counts as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;

/// Canonical on-sheet date format.
pub const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";
