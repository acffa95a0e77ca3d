//! Hourly time slots and the fixed slot catalogs.
//!
//! A [`TimeSlot`] is a whole hour of the local day, written `HH:MM` on the wire.
//! A [`SlotCatalog`] is the contiguous, ordered run of slots a screen offers.
//! Two catalogs exist in the product today and are kept apart on purpose:
//! drivers edit 06:00–20:00, owners edit 08:00–18:00.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScheduleError};

/// One hourly bucket of the local day (`00:00` through `23:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(u8);

impl TimeSlot {
    /// Build a slot from an hour of day. Returns `None` for hours above 23.
    pub fn new(hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self(hour as u8))
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0)
    }

    /// The slot one hour later, or `None` past 23:00.
    pub fn next(self) -> Option<Self> {
        Self::new(self.hour() + 1)
    }

    pub fn start_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The local instant at which this slot starts on `date`.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start_time())
    }

    /// 12-hour display form, e.g. `8:00 AM`, `12:00 PM`.
    pub fn label(self) -> String {
        let hour = self.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let display = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:00 {}", display, suffix)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for TimeSlot {
    type Err = ScheduleError;

    /// Accepts `HH:MM` and the `HH:MM:SS` form some API responses use.
    /// Minutes and seconds must be zero.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidSlot(s.to_string());
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S"))
            .map_err(|_| invalid())?;
        if time.minute() != 0 || time.second() != 0 {
            return Err(invalid());
        }
        Self::new(time.hour()).ok_or_else(invalid)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Order two slots by their hour.
pub fn compare_by_hour(a: &TimeSlot, b: &TimeSlot) -> Ordering {
    a.hour().cmp(&b.hour())
}

/// Parse a comma-separated slot list such as `"08:00, 09:00"`.
pub fn parse_slot_list(raw: &str) -> Result<Vec<TimeSlot>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// A contiguous, ordered run of hourly slots offered for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCatalog {
    first: TimeSlot,
    last: TimeSlot,
}

impl SlotCatalog {
    /// Driver availability screens: 06:00 through 20:00.
    pub const DRIVER: SlotCatalog = SlotCatalog {
        first: TimeSlot(6),
        last: TimeSlot(20),
    };

    /// Owner availability screen: 08:00 through 18:00.
    pub const OWNER: SlotCatalog = SlotCatalog {
        first: TimeSlot(8),
        last: TimeSlot(18),
    };

    /// Build a catalog spanning `first..=last`. Returns `None` if `last < first`.
    pub fn new(first: TimeSlot, last: TimeSlot) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    pub fn first(&self) -> TimeSlot {
        self.first
    }

    pub fn last(&self) -> TimeSlot {
        self.last
    }

    /// Every slot in the catalog, ascending.
    pub fn all(&self) -> Vec<TimeSlot> {
        (self.first.0..=self.last.0).map(TimeSlot).collect()
    }

    pub fn len(&self) -> usize {
        usize::from(self.last.0 - self.first.0) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, slot: TimeSlot) -> bool {
        self.first <= slot && slot <= self.last
    }

    /// Slots strictly later than `slot`. Feeds the "to" picker in Range mode.
    pub fn after(&self, slot: TimeSlot) -> Vec<TimeSlot> {
        self.all().into_iter().filter(|s| *s > slot).collect()
    }

    /// Slots whose start is strictly later than `time`. At 14:30 this starts
    /// at 15:00; at exactly 15:00 it starts at 16:00.
    pub fn strictly_after(&self, time: NaiveTime) -> Vec<TimeSlot> {
        self.all()
            .into_iter()
            .filter(|s| s.start_time() > time)
            .collect()
    }

    /// Reject slots that are not part of this catalog.
    pub fn check(&self, slot: TimeSlot) -> Result<TimeSlot> {
        if self.contains(slot) {
            Ok(slot)
        } else {
            Err(ScheduleError::SlotOutsideCatalog(slot))
        }
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::DRIVER
    }
}

/// Which product catalog a caller edits against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    #[default]
    Driver,
    Owner,
}

impl CatalogKind {
    pub fn catalog(self) -> SlotCatalog {
        match self {
            CatalogKind::Driver => SlotCatalog::DRIVER,
            CatalogKind::Owner => SlotCatalog::OWNER,
        }
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "driver" => Ok(CatalogKind::Driver),
            "owner" => Ok(CatalogKind::Owner),
            other => Err(format!("unknown catalog '{}', expected driver or owner", other)),
        }
    }
}
