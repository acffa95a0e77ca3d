//! Shared fixtures: an in-memory `ScheduleStore` and record builders.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tartanilla_schedule::grid::MonthWindow;
use tartanilla_schedule::record::{AvailabilityRecord, BookingRecord, BookingStatus};
use tartanilla_schedule::slot::TimeSlot;
use tartanilla_store::client::ScheduleStore;
use tartanilla_store::controller::ScreenHandle;
use tartanilla_store::error::{Result, StoreError};
use tartanilla_store::wire::SetAvailabilityRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Network,
    Timeout,
}

impl Failure {
    fn error(self) -> StoreError {
        match self {
            Failure::Network => StoreError::Network("connection refused".into()),
            Failure::Timeout => StoreError::Timeout { attempts: 2 },
        }
    }
}

/// Behaves like the REST API: writes become visible to later reads.
#[derive(Default)]
pub struct FakeStore {
    pub bookings: RefCell<Vec<BookingRecord>>,
    pub availability: RefCell<Vec<AvailabilityRecord>>,
    pub fail_bookings: Cell<Option<Failure>>,
    pub fail_availability: Cell<Option<Failure>>,
    pub fail_writes: Cell<Option<Failure>>,
    pub writes: RefCell<Vec<SetAvailabilityRequest>>,
    pub windows: RefCell<Vec<MonthWindow>>,
    /// Unmounted while a write is in flight, to simulate navigating away.
    pub unmount_on_write: RefCell<Option<ScreenHandle>>,
}

impl FakeStore {
    pub fn new(bookings: Vec<BookingRecord>, availability: Vec<AvailabilityRecord>) -> Self {
        Self {
            bookings: RefCell::new(bookings),
            availability: RefCell::new(availability),
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.windows.borrow().len()
    }
}

impl ScheduleStore for FakeStore {
    async fn bookings(&self, _driver_id: &str, window: MonthWindow) -> Result<Vec<BookingRecord>> {
        self.windows.borrow_mut().push(window);
        tokio::task::yield_now().await;
        if let Some(failure) = self.fail_bookings.get() {
            return Err(failure.error());
        }
        Ok(self
            .bookings
            .borrow()
            .iter()
            .filter(|b| window.contains(b.date))
            .cloned()
            .collect())
    }

    async fn availability(
        &self,
        _driver_id: &str,
        window: MonthWindow,
    ) -> Result<Vec<AvailabilityRecord>> {
        tokio::task::yield_now().await;
        if let Some(failure) = self.fail_availability.get() {
            return Err(failure.error());
        }
        Ok(self
            .availability
            .borrow()
            .iter()
            .filter(|a| window.contains(a.date))
            .cloned()
            .collect())
    }

    async fn set_availability(&self, request: &SetAvailabilityRequest) -> Result<()> {
        if let Some(screen) = self.unmount_on_write.borrow().as_ref() {
            screen.unmount();
        }
        tokio::task::yield_now().await;
        if let Some(failure) = self.fail_writes.get() {
            return Err(failure.error());
        }
        self.writes.borrow_mut().push(request.clone());

        let date = date(&request.date);
        let mut records = self.availability.borrow_mut();
        records.retain(|r| r.date != date);
        records.push(AvailabilityRecord {
            owner_id: request.driver_id.clone(),
            date,
            is_available: request.is_available,
            unavailable_times: request.unavailable_times.iter().copied().collect(),
            notes: request.notes.clone(),
            updated_at: None,
        });
        Ok(())
    }
}

// ── Builders ────────────────────────────────────────────────────────────────

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn at(s: &str) -> NaiveDateTime {
    s.parse().unwrap()
}

pub fn slot(s: &str) -> TimeSlot {
    s.parse().unwrap()
}

pub fn booking(day: &str, time: &str) -> BookingRecord {
    BookingRecord {
        date: date(day),
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        status: BookingStatus::Confirmed,
        customer_ref: Some("customer-9".into()),
        package_ref: Some("calle-colon-tour".into()),
    }
}

pub fn availability(day: &str, is_available: bool, unavailable: &[&str]) -> AvailabilityRecord {
    AvailabilityRecord {
        owner_id: "42".into(),
        date: date(day),
        is_available,
        unavailable_times: unavailable.iter().map(|s| slot(s)).collect::<BTreeSet<_>>(),
        notes: String::new(),
        updated_at: None,
    }
}
