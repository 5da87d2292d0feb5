//! Battery replacement tracking for a fleet of wireless transmitters.
//!
//! Replacement events are appended to a sheet; the current status of each
//! transmitter is derived from its latest event and a fixed 547-day
//! replacement interval.

pub mod clock;
pub mod codec;
pub mod command;
pub mod config;
pub mod date;
pub mod error;
pub mod record;
pub mod schedule;
pub mod schema;
pub mod snapshot;
pub mod store;
pub mod tracker;
pub mod types;
pub mod views;

pub use error::{CheckError, CheckResult, ErrorKind};
pub use record::{NewEntry, Record};
pub use schedule::Status;
pub use tracker::Tracker;
