//! Calendar screen state and the availability save flow.
//!
//! Screens are thin callers of [`CalendarController`]. It owns the fetched
//! month, hands out editors, and runs saves through the temporal guard before
//! anything reaches the store. Displayed state is never patched locally: after
//! a successful write the month is fetched again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tartanilla_schedule::clock::Clock;
use tartanilla_schedule::editor::{AvailabilityDraft, AvailabilityEditor};
use tartanilla_schedule::error::{ScheduleError, TemporalError};
use tartanilla_schedule::grid::{grid_for, MonthGrid, MonthWindow};
use tartanilla_schedule::guard::{is_date_in_past, review_day_off, review_save, SaveDecision};
use tartanilla_schedule::resolver::{CalendarDate, DayStatus, MonthSchedule};
use tartanilla_schedule::slot::SlotCatalog;

use crate::client::ScheduleStore;
use crate::error::{FetchIssue, StoreError};
use crate::loader::load_month;
use crate::wire::SetAvailabilityRequest;

/// Shared flag telling in-flight work whether its screen is still mounted.
#[derive(Debug, Clone)]
pub struct ScreenHandle(Arc<AtomicBool>);

impl ScreenHandle {
    fn mounted() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the screen as gone. Responses arriving afterwards are dropped.
    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Result of asking the controller to save.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Persisted; the month has been re-fetched.
    Saved,
    /// Some Custom slots had passed. The editor now holds the remaining
    /// slots and is waiting for the user to confirm again.
    Trimmed { removed: usize },
    /// Nothing can be saved as entered.
    Rejected(TemporalError),
    /// The editor content is malformed (empty selection, inverted range).
    Invalid(ScheduleError),
    /// The write failed. The editor is untouched so the user can resubmit.
    Failed(StoreError),
    /// The screen went away while the request was in flight.
    Detached,
}

pub struct CalendarController<S, C> {
    store: S,
    clock: C,
    driver_id: String,
    catalog: SlotCatalog,
    schedule: MonthSchedule,
    issue: Option<FetchIssue>,
    screen: ScreenHandle,
}

impl<S: ScheduleStore, C: Clock> CalendarController<S, C> {
    /// A controller showing `window` with no data yet. Call
    /// [`open_month`](Self::open_month) to fetch it.
    pub fn new(
        store: S,
        clock: C,
        driver_id: impl Into<String>,
        catalog: SlotCatalog,
        window: MonthWindow,
    ) -> Self {
        Self {
            store,
            clock,
            driver_id: driver_id.into(),
            catalog,
            schedule: MonthSchedule::empty(window),
            issue: None,
            screen: ScreenHandle::mounted(),
        }
    }

    pub fn screen(&self) -> ScreenHandle {
        self.screen.clone()
    }

    pub fn catalog(&self) -> SlotCatalog {
        self.catalog
    }

    pub fn schedule(&self) -> &MonthSchedule {
        &self.schedule
    }

    pub fn window(&self) -> MonthWindow {
        self.schedule.window()
    }

    /// The alert from the last month load, if it was degraded.
    pub fn last_issue(&self) -> Option<&FetchIssue> {
        self.issue.as_ref()
    }

    pub fn grid(&self) -> MonthGrid {
        grid_for(self.window())
    }

    pub fn days(&self) -> Vec<CalendarDate> {
        self.schedule.days(&self.clock)
    }

    pub fn status(&self, date: NaiveDate) -> DayStatus {
        self.schedule.status(date, &self.clock)
    }

    /// Fetch `window` and make it the displayed month.
    pub async fn open_month(&mut self, window: MonthWindow) -> Option<&FetchIssue> {
        let load = load_month(&self.store, &self.driver_id, window).await;
        if !self.screen.is_active() {
            log::debug!("discarding load of {} for unmounted screen", window);
            return None;
        }
        self.schedule = load.schedule;
        self.issue = load.issue;
        self.issue.as_ref()
    }

    pub async fn next_month(&mut self) -> Option<&FetchIssue> {
        let window = self.window().next();
        self.open_month(window).await
    }

    pub async fn previous_month(&mut self) -> Option<&FetchIssue> {
        let window = self.window().previous();
        self.open_month(window).await
    }

    /// An editor for `date`, rehydrated from its record when one exists.
    pub fn open_editor(&self, date: NaiveDate) -> Result<AvailabilityEditor, ScheduleError> {
        if is_date_in_past(date, self.clock.now()) {
            return Err(TemporalError::DateInPast.into());
        }
        Ok(match self.schedule.availability_for(date) {
            Some(record) => AvailabilityEditor::from_record(self.catalog, record),
            None => AvailabilityEditor::new(self.catalog, date),
        })
    }

    /// Validate against the current time and persist if accepted.
    ///
    /// On `Trimmed` the editor is replaced by its trimmed form; on every
    /// other outcome it is left as the user entered it.
    pub async fn save(&mut self, editor: &mut AvailabilityEditor) -> SaveOutcome {
        match review_save(editor, self.clock.now()) {
            Err(err) => SaveOutcome::Invalid(err),
            Ok(SaveDecision::Rejected(err)) => SaveOutcome::Rejected(err),
            Ok(SaveDecision::Trimmed {
                editor: trimmed,
                removed,
            }) => {
                *editor = trimmed;
                SaveOutcome::Trimmed { removed }
            }
            Ok(SaveDecision::Accepted(draft)) => self.persist(editor.date(), draft).await,
        }
    }

    /// Mark the whole of `date` unavailable.
    pub async fn save_day_off(&mut self, date: NaiveDate) -> SaveOutcome {
        match review_day_off(&self.catalog, date, self.clock.now()) {
            SaveDecision::Accepted(draft) => self.persist(date, draft).await,
            SaveDecision::Rejected(err) => SaveOutcome::Rejected(err),
            SaveDecision::Trimmed { removed, .. } => SaveOutcome::Trimmed { removed },
        }
    }

    async fn persist(&mut self, date: NaiveDate, draft: AvailabilityDraft) -> SaveOutcome {
        let request = SetAvailabilityRequest::from_draft(&self.driver_id, date, draft);
        let result = self.store.set_availability(&request).await;

        if !self.screen.is_active() {
            log::debug!("discarding save response for {} on unmounted screen", request.date);
            return SaveOutcome::Detached;
        }

        match result {
            Ok(()) => {
                log::debug!("saved availability for {}", request.date);
                let window = self.window();
                self.open_month(window).await;
                SaveOutcome::Saved
            }
            Err(err) => {
                log::warn!("saving availability for {} failed: {}", request.date, err);
                SaveOutcome::Failed(err)
            }
        }
    }
}
