//! Month-grid builder.
//!
//! A month is always laid out as 6 rows of 7 days, starting on the configured
//! first weekday, padded with the tail of the previous month and the head of
//! the next one.

use crate::bucket::DateKey;
use crate::error::CalendarError;
use crate::month::CalendarMonth;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_ROWS: usize = 6;
pub const GRID_CELLS: usize = DAYS_PER_WEEK * GRID_ROWS;

/// Which weekday occupies the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column (0..=6) a weekday lands in.
    ///
    /// Monday start rotates the Sunday-based index: Sunday (0) goes to 6,
    /// Monday..Saturday (1..=6) go to 0..=5.
    pub fn column_of(&self, weekday: Weekday) -> u32 {
        let from_sunday = weekday.num_days_from_sunday();
        match self {
            WeekStart::Sunday => from_sunday,
            WeekStart::Monday => (from_sunday + 6) % 7,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        }
    }
}

impl FromStr for WeekStart {
    type Err = CalendarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(CalendarError::InvalidWeekStart(value.to_string())),
        }
    }
}

/// One grid cell.
///
/// Whether the cell is "today" is not stored; ask with [`CalendarDay::is_today`]
/// when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
}

impl CalendarDay {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn key(&self) -> DateKey {
        DateKey::from(self.date)
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

/// Exactly [`GRID_CELLS`] days, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    month: CalendarMonth,
    week_start: WeekStart,
    days: Vec<CalendarDay>,
}

impl CalendarGrid {
    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(DAYS_PER_WEEK)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CalendarDay> {
        if row >= GRID_ROWS || column >= DAYS_PER_WEEK {
            return None;
        }
        self.days.get(row * DAYS_PER_WEEK + column)
    }

    pub fn current_month_days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days.iter().filter(|day| day.is_current_month)
    }

    pub fn first(&self) -> Option<&CalendarDay> {
        self.days.first()
    }

    pub fn last(&self) -> Option<&CalendarDay> {
        self.days.last()
    }
}

/// Lay out `month` as a 6x7 grid.
pub fn build_month_grid(month: CalendarMonth, week_start: WeekStart) -> CalendarGrid {
    let first = month.first_day();
    let leading = week_start.column_of(first.weekday());

    let start = first
        .checked_sub_days(Days::new(u64::from(leading)))
        .unwrap_or(first);

    // Previous-month tail, the month itself, then the next month from day 1.
    let days = start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| CalendarDay {
            date,
            is_current_month: month.contains(date),
        })
        .collect();

    CalendarGrid {
        month,
        week_start,
        days,
    }
}
