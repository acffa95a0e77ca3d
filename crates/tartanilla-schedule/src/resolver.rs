//! Per-day status derivation over an already-fetched month.
//!
//! Precedence, first match wins:
//!
//! 1. Date before today → `PastWithBooking` if it has bookings, else `Past`.
//! 2. Any booking → `Booked`, whatever the declared availability says.
//! 3. Availability record → `Unavailable` / `Partial` / `Available`.
//! 4. Nothing known → `Unset`.
//!
//! Statuses are recomputed on every query and never cached.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::grid::MonthWindow;
use crate::guard::is_date_in_past;
use crate::record::{AvailabilityRecord, BookingRecord};

/// The single display state of one calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Past,
    PastWithBooking,
    Booked,
    Unavailable,
    Partial,
    Available,
    Unset,
}

impl DayStatus {
    /// Whether tapping the cell does anything. Plain past days are inert.
    pub fn is_interactive(self) -> bool {
        !matches!(self, DayStatus::Past)
    }

    pub fn label(self) -> &'static str {
        match self {
            DayStatus::Past => "Past",
            DayStatus::PastWithBooking => "Past booking",
            DayStatus::Booked => "Booked",
            DayStatus::Unavailable => "Unavailable",
            DayStatus::Partial => "Partially available",
            DayStatus::Available => "Available",
            DayStatus::Unset => "Not set",
        }
    }
}

/// A derived (date, status) pair. Built per render pass, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Map one date's inputs to its display status.
pub fn resolve_status(
    date: NaiveDate,
    now: NaiveDateTime,
    bookings: &[BookingRecord],
    availability: Option<&AvailabilityRecord>,
) -> DayStatus {
    let has_booking = !bookings.is_empty();

    if is_date_in_past(date, now) {
        return if has_booking {
            DayStatus::PastWithBooking
        } else {
            DayStatus::Past
        };
    }

    if has_booking {
        return DayStatus::Booked;
    }

    match availability {
        Some(record) if !record.is_available => DayStatus::Unavailable,
        Some(record) if !record.unavailable_times.is_empty() => DayStatus::Partial,
        Some(_) => DayStatus::Available,
        None => DayStatus::Unset,
    }
}

/// Read-only projection over one fetched month window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSchedule {
    window: MonthWindow,
    bookings: BTreeMap<NaiveDate, Vec<BookingRecord>>,
    availability: BTreeMap<NaiveDate, AvailabilityRecord>,
}

impl MonthSchedule {
    /// Index fetched records by date. Records outside `window` are ignored;
    /// for duplicate availability dates the last record wins.
    pub fn new(
        window: MonthWindow,
        bookings: Vec<BookingRecord>,
        availability: Vec<AvailabilityRecord>,
    ) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<BookingRecord>> = BTreeMap::new();
        for booking in bookings {
            if window.contains(booking.date) {
                by_date.entry(booking.date).or_default().push(booking);
            } else {
                log::debug!("ignoring booking on {} outside {}", booking.date, window);
            }
        }
        for list in by_date.values_mut() {
            list.sort_by_key(|b| b.time);
        }

        let mut records = BTreeMap::new();
        for record in availability {
            if window.contains(record.date) {
                records.insert(record.date, record);
            } else {
                log::debug!("ignoring availability on {} outside {}", record.date, window);
            }
        }

        Self {
            window,
            bookings: by_date,
            availability: records,
        }
    }

    pub fn empty(window: MonthWindow) -> Self {
        Self::new(window, Vec::new(), Vec::new())
    }

    pub fn window(&self) -> MonthWindow {
        self.window
    }

    /// Bookings on `date`, ordered by time.
    pub fn bookings_for(&self, date: NaiveDate) -> &[BookingRecord] {
        self.bookings.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn availability_for(&self, date: NaiveDate) -> Option<&AvailabilityRecord> {
        self.availability.get(&date)
    }

    pub fn status(&self, date: NaiveDate, clock: &impl Clock) -> DayStatus {
        resolve_status(
            date,
            clock.now(),
            self.bookings_for(date),
            self.availability_for(date),
        )
    }

    /// Status of every day in the window, ascending, from one clock reading.
    pub fn days(&self, clock: &impl Clock) -> Vec<CalendarDate> {
        let now = clock.now();
        self.window
            .days()
            .map(|date| CalendarDate {
                date,
                status: resolve_status(
                    date,
                    now,
                    self.bookings_for(date),
                    self.availability_for(date),
                ),
            })
            .collect()
    }
}
