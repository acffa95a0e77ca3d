//! Request/response DTOs for the driver-schedule API.
//!
//! Responses are loosely typed: fields may be missing or null, ids may be
//! numbers or strings, times may carry seconds. Everything is normalized here,
//! once, into engine records. A malformed entry is skipped with a warning
//! rather than failing the whole month.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tartanilla_schedule::editor::AvailabilityDraft;
use tartanilla_schedule::record::{
    date_key, parse_date_key, AvailabilityRecord, BookingRecord, BookingStatus,
};
use tartanilla_schedule::slot::{SlotCatalog, TimeSlot};

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// List endpoints answer either with a bare array or with `{"data": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(alias = "results")]
        data: Vec<Value>,
    },
}

impl ListResponse {
    fn into_items(self) -> Vec<Value> {
        match self {
            ListResponse::Bare(items) | ListResponse::Wrapped { data: items } => items,
        }
    }
}

/// Body of a write response. Absent fields mean success.
#[derive(Deserialize, Default)]
struct WriteResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct BookingDto {
    date: String,
    #[serde(alias = "booking_time", alias = "pickup_time")]
    time: String,
    status: String,
    #[serde(default, alias = "customer_name", alias = "customer_id")]
    customer: Option<Value>,
    #[serde(default, alias = "package_name", alias = "package_id")]
    package: Option<Value>,
}

#[derive(Deserialize)]
struct AvailabilityDto {
    #[serde(default, alias = "owner_id", alias = "driver")]
    driver_id: Option<Value>,
    date: String,
    #[serde(default)]
    is_available: Option<bool>,
    #[serde(default)]
    unavailable_times: Option<Vec<String>>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

/// Body of `POST /driver-schedule/set-availability/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetAvailabilityRequest {
    pub driver_id: String,
    pub date: String,
    pub is_available: bool,
    pub unavailable_times: Vec<TimeSlot>,
    pub notes: String,
}

impl SetAvailabilityRequest {
    pub fn from_draft(driver_id: &str, date: NaiveDate, draft: AvailabilityDraft) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            date: date_key(date),
            is_available: draft.is_available,
            unavailable_times: draft.unavailable_times,
            notes: draft.notes,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render an id-ish JSON value as a string reference.
fn value_ref(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => ["name", "id"]
            .iter()
            .find_map(|key| value_ref(map.get(*key).cloned())),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    parse_date_key(raw).ok_or_else(|| StoreError::InvalidRecord(format!("date '{}'", raw)))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| StoreError::InvalidRecord(format!("time '{}'", raw)))
}

fn parse_status(raw: &str) -> Result<BookingStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
        "completed" => Ok(BookingStatus::Completed),
        other => Err(StoreError::InvalidRecord(format!("booking status '{}'", other))),
    }
}

/// Parse an ISO 8601 timestamp. Accepts RFC 3339 and naive local time,
/// which is interpreted as UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .ok()
}

impl BookingDto {
    fn into_record(self) -> Result<BookingRecord> {
        Ok(BookingRecord {
            date: parse_date(&self.date)?,
            time: parse_time(&self.time)?,
            status: parse_status(&self.status)?,
            customer_ref: value_ref(self.customer),
            package_ref: value_ref(self.package),
        })
    }
}

impl AvailabilityDto {
    fn into_record(self, catalog: &SlotCatalog, driver_id: &str) -> Result<AvailabilityRecord> {
        let date = parse_date(&self.date)?;

        let mut unavailable_times = std::collections::BTreeSet::new();
        for raw in self.unavailable_times.unwrap_or_default() {
            match raw.parse::<TimeSlot>() {
                Ok(slot) => {
                    unavailable_times.insert(slot);
                }
                Err(err) => log::warn!("dropping slot on {}: {}", self.date, err),
            }
        }

        let mut record = AvailabilityRecord {
            owner_id: value_ref(self.driver_id).unwrap_or_else(|| driver_id.to_string()),
            date,
            is_available: self.is_available.unwrap_or(true),
            unavailable_times,
            notes: self.notes.unwrap_or_default(),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
        };

        let dropped = record.retain_catalog(catalog);
        if dropped > 0 {
            log::warn!(
                "dropped {} unavailable slot(s) outside the catalog on {}",
                dropped,
                self.date
            );
        }
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn decode_items<T, F>(body: &str, kind: &str, mut convert: F) -> Result<Vec<T>>
where
    F: FnMut(Value) -> Result<T>,
{
    let response: ListResponse = serde_json::from_str(body)?;
    let mut records = Vec::new();
    for item in response.into_items() {
        match convert(item) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("skipping {} entry: {}", kind, err),
        }
    }
    Ok(records)
}

/// Decode the calendar endpoint's body into booking records.
pub fn decode_bookings(body: &str) -> Result<Vec<BookingRecord>> {
    decode_items(body, "booking", |item| {
        serde_json::from_value::<BookingDto>(item)?.into_record()
    })
}

/// Decode the schedule endpoint's body into availability records, keeping
/// slot sets within `catalog`.
pub fn decode_availability(
    body: &str,
    catalog: &SlotCatalog,
    driver_id: &str,
) -> Result<Vec<AvailabilityRecord>> {
    decode_items(body, "availability", |item| {
        serde_json::from_value::<AvailabilityDto>(item)?.into_record(catalog, driver_id)
    })
}

/// Interpret a 2xx write body. Empty or non-JSON bodies count as success.
pub fn check_write_response(body: &str) -> Result<()> {
    let response: WriteResponse = serde_json::from_str(body).unwrap_or_default();
    if response.success == Some(false) {
        let reason = response
            .error
            .or(response.message)
            .unwrap_or_else(|| "unknown reason".to_string());
        return Err(StoreError::Rejected(reason));
    }
    Ok(())
}
