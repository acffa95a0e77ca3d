//! Parallel month fetch with graceful degradation.
//!
//! Bookings and availability are fetched concurrently and joined before the
//! first render. A failed feed is treated as empty and reported separately;
//! the resolver never sees the failure itself.

use tartanilla_schedule::grid::MonthWindow;
use tartanilla_schedule::resolver::MonthSchedule;

use crate::client::ScheduleStore;
use crate::error::{Feed, FetchIssue};

/// A loaded month plus whatever went wrong loading it.
#[derive(Debug)]
pub struct MonthLoad {
    pub schedule: MonthSchedule,
    pub issue: Option<FetchIssue>,
}

pub async fn load_month<S: ScheduleStore>(
    store: &S,
    driver_id: &str,
    window: MonthWindow,
) -> MonthLoad {
    let (bookings, availability) = tokio::join!(
        store.bookings(driver_id, window),
        store.availability(driver_id, window),
    );

    let (bookings, availability, issue) = match (bookings, availability) {
        (Ok(b), Ok(a)) => (b, a, None),
        (Err(error), Ok(a)) => (
            Vec::new(),
            a,
            Some(FetchIssue::Partial {
                feed: Feed::Bookings,
                error,
            }),
        ),
        (Ok(b), Err(error)) => (
            b,
            Vec::new(),
            Some(FetchIssue::Partial {
                feed: Feed::Availability,
                error,
            }),
        ),
        (Err(bookings), Err(availability)) => (
            Vec::new(),
            Vec::new(),
            Some(FetchIssue::Unavailable {
                bookings,
                availability,
            }),
        ),
    };

    match &issue {
        Some(issue) => log::warn!("month {} for driver {} degraded: {}", window, driver_id, issue),
        None => log::debug!(
            "loaded {} bookings and {} availability records for {}",
            bookings.len(),
            availability.len(),
            window
        ),
    }

    MonthLoad {
        schedule: MonthSchedule::new(window, bookings, availability),
        issue,
    }
}
