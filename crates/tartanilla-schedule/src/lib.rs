//! # tartanilla-schedule
//!
//! Availability and booking calendar engine for tartanilla drivers and owners.
//!
//! Every calendar cell gets exactly one display status, derived from confirmed
//! bookings and the driver's self-declared availability. Availability is edited
//! either as one contiguous time range or as an arbitrary set of hourly slots;
//! both canonicalize to the same persisted shape. Every time-based mutation is
//! checked against an injected clock so nobody declares availability in the past.
//!
//! ## Modules
//!
//! - [`slot`] — hourly `TimeSlot` values and the fixed slot catalogs
//! - [`grid`] — month windows and the padded 7-column day grid
//! - [`record`] — availability and booking records, date keys
//! - [`resolver`] — per-day status derivation over a fetched month
//! - [`editor`] — Range/Custom editing and canonicalization
//! - [`guard`] — past-date / past-slot validation of saves
//! - [`clock`] — injectable source of "now"
//! - [`error`] — Error types

pub mod clock;
pub mod editor;
pub mod error;
pub mod grid;
pub mod guard;
pub mod record;
pub mod resolver;
pub mod slot;

pub use clock::{Clock, FixedClock, SystemClock};
pub use editor::{AvailabilityDraft, AvailabilityEditor, EditorMode};
pub use error::{ScheduleError, TemporalError};
pub use grid::{grid_for, month_grid, MonthGrid, MonthWindow};
pub use guard::{is_date_in_past, is_time_in_past, review_day_off, review_save, SaveDecision};
pub use record::{date_key, parse_date_key, AvailabilityRecord, BookingRecord, BookingStatus};
pub use resolver::{resolve_status, CalendarDate, DayStatus, MonthSchedule};
pub use slot::{compare_by_hour, parse_slot_list, CatalogKind, SlotCatalog, TimeSlot};
