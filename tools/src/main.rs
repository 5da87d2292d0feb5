//! battery-check: command-line front end for the sender battery tracker.
//!
//! Usage:
//!   battery-check status
//!   battery-check add --sender "Sender 01" --location "Halle A" --date 2024-06-01
//!   battery-check history --sender "Sender 01"
//!   battery-check --db wartung.db ipc

use anyhow::{bail, Result};
use battery_check_core::{
    clock::{Clock, FixedClock, SystemClock},
    command::UiCommand,
    config::TrackerConfig,
    date::{format_optional, parse_date_text},
    record::NewEntry,
    store::{CachedStore, SqliteSheetStore},
    views::{Dashboard, StatusRow},
    CheckError, ErrorKind, Record, Status, Tracker,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

type SheetTracker = Tracker<CachedStore<SqliteSheetStore>, Box<dyn Clock>>;

/// Track battery replacements for wireless transmitters
#[derive(Parser, Debug)]
#[command(name = "battery-check", version, about)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// SQLite database holding the sheet (overrides the config)
    #[arg(long, value_name = "FILE")]
    db: Option<String>,

    /// Classify against this date instead of the system date
    #[arg(long, value_name = "DATE", value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current status of every transmitter, soonest due first
    Status,
    /// Every recorded replacement, newest first
    History {
        #[arg(long)]
        sender: Option<String>,
    },
    /// Register a battery replacement
    Add {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        location: String,
        /// Replacement date, defaults to today
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
        /// Free text, e.g. battery type
        #[arg(long)]
        note: Option<String>,
    },
    /// Rows that need a manual look after import
    Review,
    /// JSON-lines loop on stdin/stdout for a UI front end
    Ipc,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let mut config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(db) = &args.db {
        config.db_path = db.clone();
    }
    log::debug!("using sheet '{}' in {}", config.sheet_name, config.db_path);

    let store = SqliteSheetStore::open(&config.db_path, &config.sheet_name, config.columns.clone())?;
    let clock: Box<dyn Clock> = match args.today {
        Some(day) => Box::new(FixedClock(day)),
        None => Box::new(SystemClock),
    };
    let mut tracker: SheetTracker = Tracker::new(CachedStore::new(store, config.cache_ttl()), clock);

    match args.command {
        Command::Status => print_status(&tracker.dashboard(None)?),
        Command::History { sender } => print_history(&tracker.dashboard(sender.as_deref())?),
        Command::Review => print_review(&tracker.dashboard(None)?),
        Command::Add { sender, location, date, note } => {
            let entry = NewEntry {
                transmitter_name: sender,
                location,
                replaced_on: date.unwrap_or_else(|| tracker.clock().today()),
                note,
            };
            submit(&mut tracker, &entry)?;
        }
        Command::Ipc => run_ipc_loop(&mut tracker)?,
    }
    Ok(())
}

fn submit(tracker: &mut SheetTracker, entry: &NewEntry) -> Result<()> {
    match tracker.submit(entry) {
        Ok(rec) => {
            println!(
                "Saved: {} on {} (next replacement {})",
                rec.transmitter_name,
                format_optional(rec.last_replaced),
                format_optional(rec.next_due)
            );
            Ok(())
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation => eprintln!("Please fill in at least sender name and location ({e})."),
                ErrorKind::Persistence => eprintln!("Could not write the sheet, nothing was saved. Try again. ({e})"),
                ErrorKind::Schema => eprintln!("The sheet layout does not match the configured columns ({e})."),
            }
            bail!(e)
        }
    }
}

fn run_ipc_loop(tracker: &mut SheetTracker) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut filter: Option<String> = None;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cmd: UiCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                write_json(&mut stdout, &error_json(&e.to_string(), false))?;
                continue;
            }
        };

        let reply = match cmd {
            UiCommand::Quit => break,
            UiCommand::GetState => state_json(tracker, filter.as_deref()),
            UiCommand::SetFilter { sender } => {
                filter = sender.filter(|s| !s.trim().is_empty());
                state_json(tracker, filter.as_deref())
            }
            cmd @ UiCommand::Submit { .. } => {
                let today = tracker.clock().today();
                let entry = cmd.into_entry(today);
                match entry.map(|e| tracker.submit(&e)) {
                    Some(Err(e)) => Ok(check_error_json(&e)),
                    _ => state_json(tracker, filter.as_deref()),
                }
            }
        };
        // A failed read is reported to the UI; the loop stays usable.
        let reply = reply.unwrap_or_else(|e| check_error_json(&e));
        write_json(&mut stdout, &reply)?;
    }
    Ok(())
}

fn state_json(tracker: &mut SheetTracker, filter: Option<&str>) -> Result<serde_json::Value, CheckError> {
    let dash = tracker.dashboard(filter)?;
    Ok(serde_json::to_value(&dash)?)
}

fn check_error_json(e: &CheckError) -> serde_json::Value {
    error_json(&e.to_string(), e.is_retryable())
}

fn error_json(message: &str, retryable: bool) -> serde_json::Value {
    serde_json::json!({ "error": message, "retryable": retryable })
}

fn write_json(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    writeln!(out, "{value}")?;
    out.flush()?;
    Ok(())
}

// ── Terminal output ───────────────────────────────────────────

fn print_status(dash: &Dashboard) {
    println!("=== CURRENT STATUS ({}) ===", dash.today);
    if dash.current.is_empty() {
        println!("  (no transmitters recorded yet)");
        return;
    }
    println!("  {:<20} {:<20} {:<12} {:<12} {}", "sender", "location", "replaced", "next due", "status");
    for row in &dash.current {
        print_status_row(row);
    }
    let c = &dash.counts;
    println!();
    println!(
        "  overdue: {}  due soon: {}  ok: {}  unknown: {}",
        c.overdue, c.due_soon, c.ok, c.unknown
    );
}

fn print_status_row(row: &StatusRow) {
    let rec = &row.record;
    println!(
        "{}  {:<20} {:<20} {:<12} {:<12} {}{}",
        ansi(row.status),
        rec.transmitter_name,
        rec.location,
        format_optional(rec.last_replaced),
        format_optional(rec.next_due),
        row.status.label(),
        if row.status.color().is_some() { "\x1b[0m" } else { "" },
    );
}

fn ansi(status: Status) -> &'static str {
    match status {
        Status::Overdue => "\x1b[31m",
        Status::DueSoon => "\x1b[33m",
        Status::Ok      => "\x1b[32m",
        Status::Unknown => "",
    }
}

fn print_history(dash: &Dashboard) {
    match &dash.filter {
        Some(name) => println!("=== HISTORY: {name} ==="),
        None => println!("=== HISTORY ==="),
    }
    for rec in &dash.history {
        print_record(rec);
    }
    if dash.history.is_empty() {
        println!("  (no entries)");
    }
}

fn print_review(dash: &Dashboard) {
    println!("=== NEEDS REVIEW ===");
    for rec in &dash.needs_review {
        print_record(rec);
        for reason in &rec.review {
            println!("      -> {}", serde_json::to_string(reason).unwrap_or_default());
        }
    }
    if dash.needs_review.is_empty() {
        println!("  (nothing to review)");
    }
}

fn print_record(rec: &Record) {
    println!(
        "  {:<20} {:<20} {:<12} {:<12} {}",
        rec.transmitter_name,
        rec.location,
        format_optional(rec.last_replaced),
        format_optional(rec.next_due),
        rec.note
    );
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    parse_date_text(s).ok_or_else(|| format!("'{s}' is not a date (try YYYY-MM-DD)"))
}

fn init_logging(verbose: u8, quiet: bool) {
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
