//! The displayed month.
//!
//! Months are zero-based (0 = January) in the constructor, like the browser
//! calendars this replaces. Out-of-range indices carry into the year.

use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

/// A year and a zero-based month, always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month0: u32,
}

impl CalendarMonth {
    /// Build a month from any integer month index.
    ///
    /// `month0 = -1` is December of `year - 1`, `month0 = 12` is January of
    /// `year + 1`. Years outside what chrono can represent (with a month of
    /// padding on either side) are clamped to the nearest supported month.
    pub fn new(year: i32, month0: i32) -> Self {
        let total = i64::from(year) * 12 + i64::from(month0);
        let carried_year = total.div_euclid(12);
        let carried_month = total.rem_euclid(12) as u32;

        let min_year = i64::from(NaiveDate::MIN.year()) + 1;
        let max_year = i64::from(NaiveDate::MAX.year()) - 1;

        if carried_year < min_year {
            CalendarMonth { year: min_year as i32, month0: 0 }
        } else if carried_year > max_year {
            CalendarMonth { year: max_year as i32, month0: 11 }
        } else {
            CalendarMonth {
                year: carried_year as i32,
                month0: carried_month,
            }
        }
    }

    /// The month a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        CalendarMonth::new(date.year(), date.month0() as i32)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index, 0..=11.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// One-based month number, 1..=12.
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month(), 1).unwrap_or_default()
    }

    /// Day 0 of the following month.
    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(first)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn previous(&self) -> Self {
        CalendarMonth::new(self.year, self.month0 as i32 - 1)
    }

    pub fn next(&self) -> Self {
        CalendarMonth::new(self.year, self.month0 as i32 + 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarMonth;
    use chrono::NaiveDate;

    #[test]
    fn negative_month_carries_into_previous_year() {
        let month = CalendarMonth::new(2024, -1);
        assert_eq!((month.year(), month.month0()), (2023, 11));

        let month = CalendarMonth::new(2024, -13);
        assert_eq!((month.year(), month.month0()), (2022, 11));
    }

    #[test]
    fn overflowing_month_carries_into_next_year() {
        let month = CalendarMonth::new(2024, 12);
        assert_eq!((month.year(), month.month0()), (2025, 0));

        let month = CalendarMonth::new(2024, 25);
        assert_eq!((month.year(), month.month0()), (2026, 1));
    }

    #[test]
    fn days_in_month_covers_every_length() {
        assert_eq!(CalendarMonth::new(2023, 1).days_in_month(), 28);
        assert_eq!(CalendarMonth::new(2024, 1).days_in_month(), 29);
        assert_eq!(CalendarMonth::new(2024, 3).days_in_month(), 30);
        assert_eq!(CalendarMonth::new(2024, 0).days_in_month(), 31);
        assert_eq!(CalendarMonth::new(1900, 1).days_in_month(), 28);
        assert_eq!(CalendarMonth::new(2000, 1).days_in_month(), 29);
    }

    #[test]
    fn previous_and_next_roll_over_year_boundaries() {
        let december = CalendarMonth::new(2023, 11);
        assert_eq!(december.next(), CalendarMonth::new(2024, 0));

        let january = CalendarMonth::new(2024, 0);
        assert_eq!(january.previous(), CalendarMonth::new(2023, 11));
    }

    #[test]
    fn containing_and_display() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
        let month = CalendarMonth::containing(date);
        assert_eq!(month.to_string(), "2024-02");
        assert!(month.contains(date));
        assert_eq!(month.last_day(), date);
    }

    #[test]
    fn extreme_years_are_clamped() {
        let month = CalendarMonth::new(i32::MAX, 0);
        assert_eq!(month.month0(), 11);
        assert!(month.first_day() > NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"));

        let month = CalendarMonth::new(i32::MIN, 0);
        assert_eq!(month.month0(), 0);
    }
}
