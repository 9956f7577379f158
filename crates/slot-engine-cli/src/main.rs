//! `slots` CLI: generate bookable slots, validate availability windows, and
//! build booking payloads from JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for a snapshot (windows + busy intervals + link), as of now
//! slots generate -i snapshot.json
//!
//! # Pin the reference time and group by local date
//! slots generate -i snapshot.json --now 2026-03-16T08:00:00Z --by-date
//!
//! # Validate a window before saving it
//! slots check-window -i window-change.json
//!
//! # Propose a non-overlapping window
//! slots suggest-window -i windows.json
//!
//! # Build a booking payload for a chosen slot
//! slots book -i booking.json --timezone America/New_York
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use slot_engine::booking::{AnswerInput, BookingRequestBuilder, ContactDetails};
use slot_engine::generator::{group_by_date, DaySlots, SlotOutcome};
use slot_engine::settings::parse_timezone;
use slot_engine::{window, AvailabilityWindow, SchedulingLinkConfig, SlotCandidate, Snapshot};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable slot generation from weekly availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config.toml (defaults to ~/.config/slot-engine/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone the advisor's windows are declared in (overrides config)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bookable slots from a snapshot JSON document
    Generate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reference time as RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<String>,
        /// Group slots by local calendar date
        #[arg(long)]
        by_date: bool,
    },
    /// Validate a new or edited availability window
    CheckWindow {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Suggest a window that does not overlap the existing ones
    SuggestWindow {
        /// Input file with a JSON array of windows (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Build a booking payload for a chosen slot
    Book {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// `check-window` input: the window being saved and what is already stored.
#[derive(Deserialize)]
struct WindowChange {
    candidate: AvailabilityWindow,
    #[serde(default)]
    existing: Vec<AvailabilityWindow>,
    /// `candidate` replaces the stored window with the same id.
    #[serde(default)]
    edit: bool,
}

/// `book` input.
#[derive(Deserialize)]
struct BookingInput {
    link: SchedulingLinkConfig,
    slot: SlotCandidate,
    contact: ContactDetails,
    #[serde(default)]
    answers: Vec<AnswerInput>,
}

#[derive(Serialize)]
struct GenerateOutput {
    outcome: SlotOutcome,
    reference_now: DateTime<Utc>,
    timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slots: Option<Vec<SlotCandidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<Vec<DaySlots>>,
    /// Records that could not be used, one message each.
    skipped: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config.as_deref() {
        Some(path) => CliConfig::load_from(path)?,
        None => CliConfig::load()?,
    };
    if let Some(name) = cli.timezone.as_deref() {
        config.engine.timezone = parse_timezone(name)?;
    }
    debug!(timezone = config.engine.timezone.name(), "loaded configuration");

    match cli.command {
        Commands::Generate {
            input,
            output,
            now,
            by_date,
        } => {
            let json = read_input(input.as_deref())?;
            let reference_now = match now.as_deref() {
                Some(raw) => DateTime::parse_from_rfc3339(raw)
                    .with_context(|| format!("Invalid --now value: {}", raw))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };

            let snapshot = Snapshot::from_json(&json, &config.engine, &config.defaults)
                .context("Failed to read snapshot")?;
            let schedule = snapshot
                .request(reference_now, &config.engine)
                .generate()
                .context("Failed to generate slots")?;

            let (slots, days) = if by_date {
                (None, Some(group_by_date(&schedule.slots, config.engine.timezone)))
            } else {
                (Some(schedule.slots), None)
            };
            let rendered = GenerateOutput {
                outcome: schedule.outcome,
                reference_now,
                timezone: config.engine.timezone.name().to_string(),
                slots,
                days,
                skipped: snapshot.skipped.iter().map(|e| e.to_string()).collect(),
            };
            write_output(output.as_deref(), &serde_json::to_string_pretty(&rendered)?)?;
        }
        Commands::CheckWindow { input } => {
            let json = read_input(input.as_deref())?;
            let change: WindowChange =
                serde_json::from_str(&json).context("Invalid window change JSON")?;
            if change.edit {
                window::validate_edit(&change.candidate, &change.existing)?;
            } else {
                window::validate_new(&change.candidate, &change.existing)?;
            }
            println!("{}", serde_json::to_string_pretty(&change.candidate)?);
        }
        Commands::SuggestWindow { input } => {
            let json = read_input(input.as_deref())?;
            let existing: Vec<AvailabilityWindow> =
                serde_json::from_str(&json).context("Invalid windows JSON")?;
            let suggested = window::suggest_window(&existing).context(
                "Could not find a non-overlapping time slot. Please adjust a window manually.",
            )?;
            println!("{}", serde_json::to_string_pretty(&suggested)?);
        }
        Commands::Book { input, output } => {
            let json = read_input(input.as_deref())?;
            let booking: BookingInput =
                serde_json::from_str(&json).context("Invalid booking JSON")?;
            booking.link.validate()?;
            let request = BookingRequestBuilder::new(&booking.link, config.engine.timezone)
                .build(&booking.slot, booking.contact, &booking.answers)?;
            write_output(output.as_deref(), &serde_json::to_string_pretty(&request)?)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
