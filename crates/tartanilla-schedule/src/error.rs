//! Error types for schedule engine operations.

use thiserror::Error;

use crate::slot::TimeSlot;

/// A mutation that refers to a past date or instant.
///
/// Always resolved locally: the save is trimmed or rejected and never reaches
/// the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Cannot set availability for a past date")]
    DateInPast,

    #[error("Start time {from} has already passed")]
    RangeStartInPast { from: TimeSlot },

    #[error("All {removed} selected time slots have already passed")]
    AllSlotsPast { removed: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid time slot: {0}")]
    InvalidSlot(String),

    #[error("Time slot {0} is not in the catalog")]
    SlotOutsideCatalog(TimeSlot),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("End time {to} must be later than start time {from}")]
    InvalidRange { from: TimeSlot, to: TimeSlot },

    #[error("No time slots selected")]
    EmptySelection,

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
