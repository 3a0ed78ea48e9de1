//! Month navigation.

use crate::month::CalendarMonth;
use chrono::{Local, NaiveDate};
use tracing::debug;

/// Holds the displayed month and moves it one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNavigator {
    current: CalendarMonth,
}

impl MonthNavigator {
    /// Start at the month containing today.
    pub fn new() -> Self {
        MonthNavigator::starting_at(CalendarMonth::containing(today()))
    }

    pub fn starting_at(month: CalendarMonth) -> Self {
        MonthNavigator { current: month }
    }

    pub fn current(&self) -> CalendarMonth {
        self.current
    }

    pub fn go_to_previous_month(&mut self) -> CalendarMonth {
        self.move_to(self.current.previous(), "previous")
    }

    pub fn go_to_next_month(&mut self) -> CalendarMonth {
        self.move_to(self.current.next(), "next")
    }

    /// Jump to the month containing the current date, read at call time.
    pub fn go_to_today(&mut self) -> CalendarMonth {
        self.move_to(CalendarMonth::containing(today()), "today")
    }

    pub fn go_to_date(&mut self, date: NaiveDate) -> CalendarMonth {
        self.move_to(CalendarMonth::containing(date), "date")
    }

    fn move_to(&mut self, month: CalendarMonth, via: &str) -> CalendarMonth {
        debug!(from = %self.current, to = %month, via, "calendar month changed");
        self.current = month;
        month
    }
}

impl Default for MonthNavigator {
    fn default() -> Self {
        MonthNavigator::new()
    }
}

/// The viewer's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
