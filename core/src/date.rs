//! Date normalization for sheet cells.
//!
//! Cells arrive as whatever the sheet hands back: empty, already typed,
//! or text in one of several locale formats. Everything funnels into
//! `Option<NaiveDate>`; a value that cannot be read is treated as missing.

use crate::types::SHEET_DATE_FORMAT;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

/// A raw cell value as delivered by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Date(NaiveDate),
    Text(String),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<Option<NaiveDate>> for CellValue {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map_or(CellValue::Empty, CellValue::Date)
    }
}

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2200;

/// Serial numbers at or below this are too small to be a plausible
/// replacement date (10000 = 1927-05-18).
const MIN_SERIAL_DAY: u64 = 10_000;

const DATE_FORMATS: &[&str] = &[
    SHEET_DATE_FORMAT,
    "%d.%m.%Y",
    "%d.%m.%y",
    "%Y/%m/%d",
    "%d/%m/%Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

/// Markers that dataframe exports write into empty cells.
const EMPTY_MARKERS: &[&str] = &["nan", "nat", "none", "null"];

pub fn normalize(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Empty => None,
        CellValue::Date(d) => in_range(*d),
        CellValue::Text(s) => parse_date_text(s),
    }
}

/// Parse free text into a date. Returns `None` for anything unreadable.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if is_blank(s) {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Some(d) = NaiveDate::parse_from_str(s, fmt).ok().and_then(in_range) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return in_range(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return in_range(dt.date_naive());
    }
    parse_serial_day(s)
}

/// True for whitespace and the usual "no value" markers.
pub fn is_blank(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || EMPTY_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}

pub fn format_optional(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// Spreadsheet serial day: days since 1899-12-30, e.g. `45444` or `45444.0`.
fn parse_serial_day(s: &str) -> Option<NaiveDate> {
    let whole = s.strip_suffix(".0").unwrap_or(s);
    let days: u64 = whole.parse().ok()?;
    if days <= MIN_SERIAL_DAY {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(days)).and_then(in_range)
}

/// Whether `date` survives a write and read back through a sheet cell.
pub fn is_supported(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

fn in_range(d: NaiveDate) -> Option<NaiveDate> {
    is_supported(d).then_some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_and_marker_cells_are_missing() {
        assert_eq!(normalize(&CellValue::Empty), None);
        for s in ["", "   ", "nan", "NaT", "None"] {
            assert_eq!(normalize(&CellValue::from(s)), None, "{s:?}");
        }
    }

    #[test]
    fn typed_dates_pass_through() {
        let d = ymd(2024, 6, 1);
        assert_eq!(normalize(&CellValue::Date(d)), Some(d));
    }

    #[test]
    fn iso_and_german_formats_agree() {
        let d = ymd(2024, 6, 1);
        for s in [
            "2024-06-01",
            " 2024-06-01 ",
            "01.06.2024",
            "01.06.24",
            "2024/06/01",
            "01/06/2024",
            "2024-06-01 00:00:00",
            "2024-06-01T08:30:00",
            "2024-06-01T08:30:00+02:00",
        ] {
            assert_eq!(parse_date_text(s), Some(d), "{s:?}");
        }
    }

    #[test]
    fn spreadsheet_serial_numbers() {
        assert_eq!(parse_date_text("45292"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date_text("45444.0"), Some(ymd(2024, 6, 1)));
        // Small numbers read like quantities, not dates.
        assert_eq!(parse_date_text("2"), None);
    }

    #[test]
    fn free_text_is_missing() {
        for s in ["CR2032", "2x AA Lithium", "31.02.2024", "tomorrow"] {
            assert_eq!(parse_date_text(s), None, "{s:?}");
        }
    }

    #[test]
    fn supported_window_matches_parsing() {
        assert!(is_supported(ymd(1900, 1, 1)));
        assert!(is_supported(ymd(2200, 12, 31)));
        assert!(!is_supported(ymd(1899, 12, 31)));
        assert!(!is_supported(ymd(2201, 1, 1)));
        assert_eq!(parse_date_text(&format_date(ymd(2201, 1, 1))), None);
    }

    #[test]
    fn formats_as_iso() {
        assert_eq!(format_date(ymd(2025, 11, 30)), "2025-11-30");
        assert_eq!(format_optional(None), "");
    }
}
