//! Validation of availability saves against "now".
//!
//! Saving moves `Editing → Validating` and ends in one of three decisions:
//!
//! - `Rejected`: nothing is persisted.
//! - `Trimmed`: some Custom slots had already passed; the trimmed editor goes
//!   back to the user with a count of removed slots. The save is not retried.
//! - `Accepted`: the draft may be persisted.
//!
//! Range mode only checks the start of the range. Custom mode checks every
//! selected slot. "Now" is read when the save happens, not when the editor
//! was opened, so a form left open on today is judged against the current hour.

use chrono::{NaiveDate, NaiveDateTime};

use crate::editor::{AvailabilityDraft, AvailabilityEditor, EditorMode};
use crate::error::{Result, ScheduleError, TemporalError};
use crate::slot::{SlotCatalog, TimeSlot};

/// Whether `date` is before today. Today itself is not past.
pub fn is_date_in_past(date: NaiveDate, now: NaiveDateTime) -> bool {
    date < now.date()
}

/// Whether the local instant `date@slot` is at or before `now`.
pub fn is_time_in_past(date: NaiveDate, slot: TimeSlot, now: NaiveDateTime) -> bool {
    slot.on(date) <= now
}

/// Outcome of validating a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDecision {
    Accepted(AvailabilityDraft),
    Trimmed {
        editor: AvailabilityEditor,
        removed: usize,
    },
    Rejected(TemporalError),
}

/// Validate `editor` against `now` and, if it passes, canonicalize it.
///
/// Errors are for malformed input (an empty selection, an inverted range),
/// which the editor should not have allowed in the first place.
pub fn review_save(editor: &AvailabilityEditor, now: NaiveDateTime) -> Result<SaveDecision> {
    let date = editor.date();
    if is_date_in_past(date, now) {
        return Ok(SaveDecision::Rejected(TemporalError::DateInPast));
    }

    match editor.mode() {
        EditorMode::Range { from, .. } => {
            if is_time_in_past(date, *from, now) {
                return Ok(SaveDecision::Rejected(TemporalError::RangeStartInPast {
                    from: *from,
                }));
            }
            editor.canonicalize().map(SaveDecision::Accepted)
        }
        EditorMode::Custom { selected } => {
            if selected.is_empty() {
                return Err(ScheduleError::EmptySelection);
            }
            let (future, past): (Vec<TimeSlot>, Vec<TimeSlot>) = selected
                .iter()
                .copied()
                .partition(|slot| !is_time_in_past(date, *slot, now));

            if future.is_empty() {
                return Ok(SaveDecision::Rejected(TemporalError::AllSlotsPast {
                    removed: past.len(),
                }));
            }
            if !past.is_empty() {
                let mut trimmed = editor.clone();
                trimmed.set_selected(future)?;
                return Ok(SaveDecision::Trimmed {
                    editor: trimmed,
                    removed: past.len(),
                });
            }
            editor.canonicalize().map(SaveDecision::Accepted)
        }
    }
}

/// Validate marking the whole of `date` unavailable.
pub fn review_day_off(catalog: &SlotCatalog, date: NaiveDate, now: NaiveDateTime) -> SaveDecision {
    if is_date_in_past(date, now) {
        SaveDecision::Rejected(TemporalError::DateInPast)
    } else {
        SaveDecision::Accepted(AvailabilityDraft::day_off(catalog))
    }
}
