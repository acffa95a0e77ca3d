//! Range/Custom availability editing and its canonical persisted shape.
//!
//! Both modes reduce to an [`AvailabilityDraft`]: the slots that are *not*
//! available plus a human-readable note. The mode itself is never stored; on
//! reopen it is re-derived from the slot set. A contiguous run of available
//! hours comes back as Range, anything else as Custom. A Custom selection that
//! happens to be contiguous therefore reopens as Range.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::record::AvailabilityRecord;
use crate::slot::{SlotCatalog, TimeSlot};

/// How availability is being entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum EditorMode {
    /// One window `[from, to)`. `to` is an end bound and may be the hour
    /// just past the catalog's last slot.
    Range { from: TimeSlot, to: TimeSlot },
    /// An arbitrary set of available slots, kept sorted ascending.
    Custom { selected: Vec<TimeSlot> },
}

/// The persisted form of an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDraft {
    pub is_available: bool,
    pub unavailable_times: Vec<TimeSlot>,
    pub notes: String,
}

impl AvailabilityDraft {
    /// The whole day off: every catalog slot unavailable.
    pub fn day_off(catalog: &SlotCatalog) -> Self {
        Self {
            is_available: false,
            unavailable_times: catalog.all(),
            notes: "Not available".to_string(),
        }
    }
}

impl EditorMode {
    /// Reduce this mode to the persisted slot set and note.
    pub fn canonicalize(&self, catalog: &SlotCatalog) -> Result<AvailabilityDraft> {
        match self {
            EditorMode::Range { from, to } => {
                if to <= from {
                    return Err(ScheduleError::InvalidRange {
                        from: *from,
                        to: *to,
                    });
                }
                let unavailable_times = catalog
                    .all()
                    .into_iter()
                    .filter(|s| s.hour() < from.hour() || s.hour() >= to.hour())
                    .collect();
                Ok(AvailabilityDraft {
                    is_available: true,
                    unavailable_times,
                    notes: format!("Available {} - {}", from.label(), to.label()),
                })
            }
            EditorMode::Custom { selected } => {
                let notes = match selected.as_slice() {
                    [] => return Err(ScheduleError::EmptySelection),
                    [only] => format!("Available at {}", only.label()),
                    many => format!(
                        "Available: {}",
                        many.iter()
                            .map(|s| s.label())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                };
                let unavailable_times = catalog
                    .all()
                    .into_iter()
                    .filter(|s| !selected.contains(s))
                    .collect();
                Ok(AvailabilityDraft {
                    is_available: true,
                    unavailable_times,
                    notes,
                })
            }
        }
    }

    /// Rebuild an editing mode from a persisted slot set.
    ///
    /// A day off, or a record with no available slot left, reopens as an
    /// empty Custom selection.
    pub fn reconstruct(
        catalog: &SlotCatalog,
        is_available: bool,
        unavailable: &BTreeSet<TimeSlot>,
    ) -> Self {
        let available: Vec<TimeSlot> = if is_available {
            catalog
                .all()
                .into_iter()
                .filter(|s| !unavailable.contains(s))
                .collect()
        } else {
            Vec::new()
        };

        if let (Some(first), Some(last)) = (available.first(), available.last()) {
            let contiguous = available
                .windows(2)
                .all(|pair| pair[1].hour() == pair[0].hour() + 1);
            if contiguous {
                if let Some(to) = last.next() {
                    return EditorMode::Range { from: *first, to };
                }
            }
        }

        EditorMode::Custom {
            selected: available,
        }
    }
}

/// Editing state for one date's availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityEditor {
    catalog: SlotCatalog,
    date: NaiveDate,
    mode: EditorMode,
}

impl AvailabilityEditor {
    /// A fresh editor in Range mode spanning the whole catalog.
    pub fn new(catalog: SlotCatalog, date: NaiveDate) -> Self {
        Self {
            catalog,
            date,
            mode: default_range(&catalog),
        }
    }

    /// Reopen an existing record for editing.
    pub fn from_record(catalog: SlotCatalog, record: &AvailabilityRecord) -> Self {
        Self {
            catalog,
            date: record.date,
            mode: EditorMode::reconstruct(
                &catalog,
                record.is_available,
                &record.unavailable_times,
            ),
        }
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Set the Range start. If the current end would no longer be strictly
    /// later, it advances to the next slot after `from`.
    pub fn set_from(&mut self, from: TimeSlot) -> Result<()> {
        self.catalog.check(from)?;
        let current_to = match &self.mode {
            EditorMode::Range { to, .. } => Some(*to),
            EditorMode::Custom { .. } => None,
        };
        let to = match current_to {
            Some(to) if to > from => to,
            _ => self
                .first_end_after(from)
                .ok_or(ScheduleError::InvalidRange { from, to: from })?,
        };
        self.mode = EditorMode::Range { from, to };
        Ok(())
    }

    /// Set the Range end. Must be one of [`to_options`](Self::to_options).
    pub fn set_to(&mut self, to: TimeSlot) -> Result<()> {
        self.use_range();
        let from = self.range_start();
        if !self.to_options().contains(&to) {
            return Err(ScheduleError::InvalidRange { from, to });
        }
        self.mode = EditorMode::Range { from, to };
        Ok(())
    }

    /// Valid end bounds for the current Range start: every catalog slot after
    /// `from`, plus the hour closing the catalog's last slot.
    pub fn to_options(&self) -> Vec<TimeSlot> {
        let EditorMode::Range { from, .. } = &self.mode else {
            return Vec::new();
        };
        let mut options = self.catalog.after(*from);
        options.extend(self.catalog.last().next());
        options
    }

    /// Flip one slot in Custom mode. Switching from Range first carries the
    /// range over as the selection. Returns whether the slot is now selected.
    pub fn toggle(&mut self, slot: TimeSlot) -> Result<bool> {
        self.catalog.check(slot)?;
        self.use_custom();
        let EditorMode::Custom { selected } = &mut self.mode else {
            return Ok(false);
        };
        match selected.binary_search(&slot) {
            Ok(index) => {
                selected.remove(index);
                Ok(false)
            }
            Err(index) => {
                selected.insert(index, slot);
                Ok(true)
            }
        }
    }

    /// Switch to Range mode, spanning the current selection if there is one.
    pub fn use_range(&mut self) {
        if let EditorMode::Custom { selected } = &self.mode {
            self.mode = match (selected.first(), selected.last().and_then(|s| s.next())) {
                (Some(from), Some(to)) => EditorMode::Range { from: *from, to },
                _ => default_range(&self.catalog),
            };
        }
    }

    /// Switch to Custom mode, selecting the slots the current range covers.
    pub fn use_custom(&mut self) {
        if let EditorMode::Range { from, to } = &self.mode {
            let selected = self
                .catalog
                .all()
                .into_iter()
                .filter(|s| s >= from && s < to)
                .collect();
            self.mode = EditorMode::Custom { selected };
        }
    }

    /// Replace the Custom selection, keeping it sorted and within the catalog.
    pub fn set_selected(&mut self, slots: impl IntoIterator<Item = TimeSlot>) -> Result<()> {
        let mut selected = slots
            .into_iter()
            .map(|s| self.catalog.check(s))
            .collect::<Result<Vec<_>>>()?;
        selected.sort();
        selected.dedup();
        self.mode = EditorMode::Custom { selected };
        Ok(())
    }

    pub fn canonicalize(&self) -> Result<AvailabilityDraft> {
        self.mode.canonicalize(&self.catalog)
    }

    fn range_start(&self) -> TimeSlot {
        match &self.mode {
            EditorMode::Range { from, .. } => *from,
            EditorMode::Custom { selected } => {
                selected.first().copied().unwrap_or(self.catalog.first())
            }
        }
    }

    fn first_end_after(&self, from: TimeSlot) -> Option<TimeSlot> {
        self.catalog.after(from).first().copied().or_else(|| from.next())
    }
}

/// `to` is exclusive, so the full span ends at the hour closing the last slot.
fn default_range(catalog: &SlotCatalog) -> EditorMode {
    let from = catalog.first();
    let to = catalog.last().next().unwrap_or(catalog.last());
    EditorMode::Range { from, to }
}
