//! `tartanilla` CLI: inspect a driver's calendar and edit availability from
//! the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Show March 2025 for driver 42, fetched from the API
//! tartanilla calendar --driver 42 --month 2025-03
//!
//! # Same month from a saved snapshot, as JSON, pretending it is 5 March
//! tartanilla calendar --driver 42 --month 2025-03 --snapshot month.json \
//!     --now 2025-03-05T09:00:00 --json
//!
//! # What would an 8 AM to 6 PM range be stored as?
//! tartanilla encode range --from 08:00 --to 18:00
//!
//! # Which editing mode does a stored slot set reopen as?
//! tartanilla decode --unavailable 06:00,07:00,18:00,19:00,20:00
//!
//! # Save availability (validated against the current time first)
//! tartanilla set --driver 42 --date 2025-03-21 --range 08:00-18:00
//! tartanilla set --driver 42 --date 2025-03-21 --slots 09:00,13:00
//! tartanilla set --driver 42 --date 2025-03-22 --day-off
//! ```

use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tartanilla_schedule::clock::{Clock, FixedClock, SystemClock};
use tartanilla_schedule::editor::{AvailabilityEditor, EditorMode};
use tartanilla_schedule::grid::{grid_for, MonthWindow};
use tartanilla_schedule::resolver::{DayStatus, MonthSchedule};
use tartanilla_schedule::slot::{parse_slot_list, CatalogKind, SlotCatalog, TimeSlot};
use tartanilla_store::controller::{CalendarController, SaveOutcome};
use tartanilla_store::{load_month, wire, HttpScheduleStore, StoreConfig};

#[derive(Parser)]
#[command(
    name = "tartanilla",
    version,
    about = "Tartanilla driver availability and booking calendar"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Slot catalog to edit against, overriding the config
    #[arg(long, global = true)]
    catalog: Option<CatalogKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month with one status per day
    Calendar {
        /// Driver whose schedule to show
        #[arg(long)]
        driver: String,
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<MonthWindow>,
        /// Read `{"bookings": [...], "availability": [...]}` from this file
        /// instead of the API ("-" for stdin)
        #[arg(long)]
        snapshot: Option<String>,
        /// Evaluate as if it were this local time (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        now: Option<NaiveDateTime>,
        /// Print the per-day statuses as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored form of an editing mode
    Encode {
        #[command(subcommand)]
        mode: EncodeMode,
    },
    /// Show which editing mode a stored slot set reopens as
    Decode {
        /// Comma-separated unavailable slots
        #[arg(long, default_value = "")]
        unavailable: String,
        /// The record is a day off
        #[arg(long)]
        day_off: bool,
    },
    /// Validate and save one date's availability
    Set {
        #[arg(long)]
        driver: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[command(flatten)]
        edit: EditArgs,
        /// Evaluate as if it were this local time (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        now: Option<NaiveDateTime>,
        /// Save the remaining slots when some of the selection has passed
        #[arg(long)]
        accept_trimmed: bool,
    },
}

#[derive(Subcommand)]
enum EncodeMode {
    /// A contiguous range; `to` is exclusive
    Range {
        #[arg(long)]
        from: TimeSlot,
        #[arg(long)]
        to: TimeSlot,
    },
    /// An arbitrary set of slots
    Custom {
        /// Comma-separated slots, e.g. 09:00,13:00
        #[arg(long)]
        slots: String,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct EditArgs {
    /// Available range as FROM-TO, e.g. 08:00-18:00
    #[arg(long)]
    range: Option<String>,
    /// Comma-separated available slots
    #[arg(long)]
    slots: Option<String>,
    /// Mark the whole day unavailable
    #[arg(long)]
    day_off: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = StoreConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(kind) = cli.catalog {
        config.catalog = kind;
    }
    let catalog = config.catalog.catalog();

    match cli.command {
        Commands::Calendar {
            driver,
            month,
            snapshot,
            now,
            json,
        } => {
            let clock = clock_at(now);
            let window = month.unwrap_or_else(|| MonthWindow::containing(clock.today()));

            let schedule = match snapshot {
                Some(path) => read_snapshot(&path, window, &catalog, &driver)?,
                None => {
                    let store = HttpScheduleStore::new(&config)
                        .context("Failed to create schedule client")?;
                    let load = load_month(&store, &driver, window).await;
                    if let Some(issue) = &load.issue {
                        eprintln!("warning: {}", issue);
                    }
                    load.schedule
                }
            };

            if json {
                let days = schedule.days(&clock);
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                print!("{}", render_month(&schedule, &clock));
            }
        }
        Commands::Encode { mode } => {
            let mut editor = AvailabilityEditor::new(catalog, SystemClock.today());
            match mode {
                EncodeMode::Range { from, to } => apply_range(&mut editor, from, to)?,
                EncodeMode::Custom { slots } => apply_slots(&mut editor, &slots)?,
            }
            let draft = editor.canonicalize().context("Failed to encode availability")?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Commands::Decode {
            unavailable,
            day_off,
        } => {
            let slots = parse_slot_list(&unavailable).context("Invalid slot list")?;
            let unavailable: BTreeSet<TimeSlot> = slots
                .into_iter()
                .filter(|slot| catalog.contains(*slot))
                .collect();
            let mode = EditorMode::reconstruct(&catalog, !day_off, &unavailable);
            println!("{}", serde_json::to_string_pretty(&mode)?);
        }
        Commands::Set {
            driver,
            date,
            edit,
            now,
            accept_trimmed,
        } => {
            let store =
                HttpScheduleStore::new(&config).context("Failed to create schedule client")?;
            let mut calendar = CalendarController::new(
                &store,
                clock_at(now),
                driver,
                catalog,
                MonthWindow::containing(date),
            );

            let outcome = if edit.day_off {
                calendar.save_day_off(date).await
            } else {
                let mut editor = calendar.open_editor(date)?;
                if let Some(range) = &edit.range {
                    let (from, to) = parse_range(range)?;
                    apply_range(&mut editor, from, to)?;
                } else if let Some(slots) = &edit.slots {
                    apply_slots(&mut editor, slots)?;
                }

                let first = calendar.save(&mut editor).await;
                match first {
                    SaveOutcome::Trimmed { removed } if accept_trimmed => {
                        eprintln!("dropped {} slot(s) that already passed", removed);
                        calendar.save(&mut editor).await
                    }
                    SaveOutcome::Trimmed { removed } => bail!(
                        "{} selected slot(s) already passed; remaining: {}. \
                         Rerun with --accept-trimmed to save them",
                        removed,
                        describe_mode(editor.mode())
                    ),
                    other => other,
                }
            };

            report(date, outcome)?;
        }
    }

    Ok(())
}

fn clock_at(now: Option<NaiveDateTime>) -> FixedClock {
    FixedClock(now.unwrap_or_else(|| SystemClock.now()))
}

fn apply_range(editor: &mut AvailabilityEditor, from: TimeSlot, to: TimeSlot) -> Result<()> {
    editor.set_from(from).context("Invalid range start")?;
    editor.set_to(to).context("Invalid range end")?;
    Ok(())
}

fn apply_slots(editor: &mut AvailabilityEditor, raw: &str) -> Result<()> {
    let slots = parse_slot_list(raw).context("Invalid slot list")?;
    editor.set_selected(slots).context("Invalid slot selection")?;
    Ok(())
}

/// Parse `FROM-TO`, e.g. `08:00-18:00`.
fn parse_range(raw: &str) -> Result<(TimeSlot, TimeSlot)> {
    let (from, to) = raw
        .split_once('-')
        .with_context(|| format!("Range must look like 08:00-18:00, got '{}'", raw))?;
    let from = from.trim().parse().context("Invalid range start")?;
    let to = to.trim().parse().context("Invalid range end")?;
    Ok((from, to))
}

fn describe_mode(mode: &EditorMode) -> String {
    match mode {
        EditorMode::Range { from, to } => format!("{}-{}", from, to),
        EditorMode::Custom { selected } => selected
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn report(date: NaiveDate, outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Saved => {
            println!("Saved availability for {}", date);
            Ok(())
        }
        SaveOutcome::Rejected(err) => bail!("Cannot save {}: {}", date, err),
        SaveOutcome::Invalid(err) => bail!("Cannot save {}: {}", date, err),
        SaveOutcome::Failed(err) => {
            Err(anyhow::Error::new(err).context(format!("Failed to save availability for {}", date)))
        }
        SaveOutcome::Trimmed { removed } => {
            bail!("{} slot(s) already passed on {}; nothing saved", removed, date)
        }
        SaveOutcome::Detached => bail!("Save for {} was abandoned", date),
    }
}

/// Build a month from a JSON snapshot of both feeds.
fn read_snapshot(
    path: &str,
    window: MonthWindow,
    catalog: &SlotCatalog,
    driver: &str,
) -> Result<MonthSchedule> {
    let raw = read_input((path != "-").then_some(path))?;
    let snapshot: Value = serde_json::from_str(&raw).context("Snapshot is not valid JSON")?;
    let feed = |name: &str| {
        snapshot
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))
            .to_string()
    };

    let bookings = wire::decode_bookings(&feed("bookings")).context("Invalid bookings in snapshot")?;
    let availability = wire::decode_availability(&feed("availability"), catalog, driver)
        .context("Invalid availability in snapshot")?;
    Ok(MonthSchedule::new(window, bookings, availability))
}

fn glyph(status: DayStatus) -> char {
    match status {
        DayStatus::Past => '.',
        DayStatus::PastWithBooking => 'b',
        DayStatus::Booked => 'B',
        DayStatus::Unavailable => 'x',
        DayStatus::Partial => '~',
        DayStatus::Available => '+',
        DayStatus::Unset => ' ',
    }
}

/// Render the month as a Sunday-first grid with a status glyph after each
/// day number, followed by a legend.
fn render_month(schedule: &MonthSchedule, clock: &impl Clock) -> String {
    let window = schedule.window();
    let days = schedule.days(clock);
    let mut out = format!("{}\n Su  Mo  Tu  We  Th  Fr  Sa\n", window);

    for week in grid_for(window).weeks() {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let status = days
                        .get(*day as usize - 1)
                        .map_or(DayStatus::Unset, |d| d.status);
                    format!("{:>3}{}", day, glyph(status))
                }
                None => "    ".to_string(),
            })
            .collect();
        out.push_str(line.join("").trim_end());
        out.push('\n');
    }

    let legend: Vec<String> = [
        DayStatus::Booked,
        DayStatus::Unavailable,
        DayStatus::Partial,
        DayStatus::Available,
        DayStatus::PastWithBooking,
        DayStatus::Past,
    ]
    .iter()
    .map(|s| format!("{} {}", glyph(*s), s.label()))
    .collect();
    out.push_str(&legend.join("  "));
    out.push('\n');
    out
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
