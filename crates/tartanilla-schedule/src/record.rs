//! Availability and booking records as the engine sees them.
//!
//! Records reaching this module have already been validated at the store
//! boundary: dates are real dates, times are real slots, optional fields are
//! explicit. Bookings and availability are joined on the calendar date, whose
//! canonical wire form is the zero-padded `YYYY-MM-DD` key.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slot::{SlotCatalog, TimeSlot};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` join key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a canonical date key. Anything but the exact zero-padded
/// `YYYY-MM-DD` form is rejected, so `2025-3-10` never silently joins.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()?;
    (date_key(date) == key).then_some(date)
}

/// A driver's or owner's declared availability for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub owner_id: String,
    pub date: NaiveDate,
    pub is_available: bool,
    /// Always a subset of the catalog the record was validated against.
    pub unavailable_times: BTreeSet<TimeSlot>,
    pub notes: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AvailabilityRecord {
    /// Slots the owner accepts bookings in. Empty when the whole day is off.
    pub fn available_slots(&self, catalog: &SlotCatalog) -> Vec<TimeSlot> {
        if !self.is_available {
            return Vec::new();
        }
        catalog
            .all()
            .into_iter()
            .filter(|slot| !self.unavailable_times.contains(slot))
            .collect()
    }

    /// Drop slots outside `catalog`, returning how many were removed.
    pub fn retain_catalog(&mut self, catalog: &SlotCatalog) -> usize {
        let before = self.unavailable_times.len();
        self.unavailable_times.retain(|slot| catalog.contains(*slot));
        before - self.unavailable_times.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A reservation created by the booking flow. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: BookingStatus,
    pub customer_ref: Option<String>,
    pub package_ref: Option<String>,
}
