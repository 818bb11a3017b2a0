use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use booking_engine::{BookingFlow, BookingInputs, DayKey, MentorRef};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(
    name = "mentor-booking",
    version,
    about = "Browse mentor availability and build session booking requests"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one week of the mentor's calendar
    Week {
        #[command(flatten)]
        source: Source,
        /// Weeks to page from the current week (negative pages back)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
        /// Print the week as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the slots available on one day
    Slots {
        #[command(flatten)]
        source: Source,
        /// Day to list (YYYY-MM-DD)
        #[arg(long)]
        day: DayKey,
        /// Print the slots as JSON
        #[arg(long)]
        json: bool,
    },
    /// Select a slot and print the resulting booking request as JSON
    Book {
        #[command(flatten)]
        source: Source,
        /// Slot id to book
        #[arg(long)]
        slot: String,
        /// Day the slot is on; located automatically when omitted
        #[arg(long)]
        day: Option<DayKey>,
        /// Session type id (defaults to the first offered)
        #[arg(long)]
        session_type: Option<String>,
        /// Timezone identifier for the session
        #[arg(long)]
        timezone: Option<String>,
        /// Notes for the mentor
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Args)]
struct Source {
    /// Booking inputs JSON file ("-" for stdin)
    input: PathBuf,
    /// Current instant as RFC 3339 (defaults to the system clock)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

impl Source {
    fn open(&self) -> Result<BookingFlow<MentorRef>> {
        let text = if self.input.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read booking inputs from stdin")?;
            buf
        } else {
            fs::read_to_string(&self.input)
                .with_context(|| format!("failed to read {}", self.input.display()))?
        };
        let inputs: BookingInputs<MentorRef> =
            serde_json::from_str(&text).context("invalid booking inputs JSON")?;
        let now = self.now.unwrap_or_else(Utc::now);
        debug!(
            input = %self.input.display(),
            %now,
            entries = inputs.availability.len(),
            "loaded booking inputs"
        );
        Ok(BookingFlow::new(inputs, now)?)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Week {
            source,
            offset,
            json,
        } => {
            let mut flow = source.open()?;
            flow.page_by(i64::from(offset));
            if json {
                println!("{}", serde_json::to_string_pretty(&flow.visible_week())?);
            } else {
                print!("{}", render::week(&flow));
                print!("{}", render::session_types(flow.session_types()));
            }
        }
        Command::Slots { source, day, json } => {
            let flow = source.open()?;
            let slots = flow.index().bucket(&day);
            if json {
                println!("{}", serde_json::to_string_pretty(slots)?);
            } else if slots.is_empty() {
                println!("No slots on {day}");
            } else {
                print!("{}", render::slots(slots, flow.display_timezone()));
            }
        }
        Command::Book {
            source,
            slot,
            day,
            session_type,
            timezone,
            notes,
        } => {
            let mut flow = source.open()?;
            match day {
                Some(day) => {
                    flow.select_day(day)?;
                    flow.select_slot(&slot)?;
                }
                None => flow.choose_slot(&slot)?,
            }
            if let Some(id) = session_type {
                flow.select_session_type_by_id(&id)?;
            }
            if let Some(tz) = timezone {
                flow.select_timezone(&tz);
            }
            if let Some(notes) = notes {
                flow.set_notes(notes);
            }
            let Some(request) = flow.build_request() else {
                bail!("booking is incomplete: the mentor offers no session types");
            };
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}
