//! Month windows and the padded day grid rendered as a 7-column calendar.
//!
//! Months are addressed 0-based (`0` = January) on this API. All rollover is
//! done with date arithmetic so December → January moves the year as well.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{Result, ScheduleError};

/// The `[first, last]` day range of one calendar month.
///
/// This is the window the store is queried with and the only range a
/// [`MonthSchedule`](crate::resolver::MonthSchedule) can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthWindow {
    first: NaiveDate,
}

impl MonthWindow {
    /// Window for `year` and 0-based `month`.
    pub fn new(year: i32, month0: u32) -> Result<Self> {
        month0
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
            .map(|first| Self { first })
            .ok_or_else(|| ScheduleError::InvalidMonth(format!("{}-{}", year, month0)))
    }

    /// The window of the month `date` falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 0-based month.
    pub fn month0(&self) -> u32 {
        self.first.month0()
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.next().first.pred_opt().unwrap_or(self.first)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last()
    }

    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    pub fn previous(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Every date in the month, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last();
        self.first.iter_days().take_while(move |d| *d <= last)
    }
}

impl fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

impl FromStr for MonthWindow {
    type Err = ScheduleError;

    /// Parses `YYYY-MM` (1-based month, as people write it).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if month == 0 {
            return Err(invalid());
        }
        Self::new(year, month - 1).map_err(|_| invalid())
    }
}

/// A month laid out for a Sunday-first 7-column grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub window: MonthWindow,
    /// `None` for leading blanks, then day numbers `1..=days_in_month`.
    pub cells: Vec<Option<u32>>,
}

impl MonthGrid {
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }

    /// The cells split into rows of seven. The final row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<u32>]> {
        self.cells.chunks(7)
    }

    /// The date behind a cell, if the cell is not a blank.
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        let day = (*self.cells.get(index)?)?;
        self.window.first().with_day(day)
    }
}

/// Expand `(year, 0-based month)` into a padded sequence of day cells.
///
/// Length is `leading_blanks + days_in_month`, where `leading_blanks` is the
/// weekday index of the 1st with Sunday = 0.
pub fn month_grid(year: i32, month0: u32) -> Result<MonthGrid> {
    let window = MonthWindow::new(year, month0)?;
    Ok(grid_for(window))
}

pub fn grid_for(window: MonthWindow) -> MonthGrid {
    let leading = window.first().weekday().num_days_from_sunday() as usize;
    let days = window.days_in_month();

    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.resize(leading, None);
    cells.extend((1..=days).map(Some));

    MonthGrid { window, cells }
}
