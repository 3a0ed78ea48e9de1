//! Calendar view state.
//!
//! This module provides the CalendarView struct which owns the displayed
//! month, the active language and the event list, and keeps the derived grid
//! and day buckets in step with them. Rendering is left to the caller.

use crate::bucket::{bucket_timed_events, DateBucketMap};
use crate::config::CalendarConfig;
use crate::error::CalendarResult;
use crate::grid::{build_month_grid, CalendarDay, CalendarGrid, WeekStart, DAYS_PER_WEEK};
use crate::locale::{LanguageProfile, LocaleTable};
use crate::models::TimedEvent;
use crate::month::CalendarMonth;
use crate::navigation::MonthNavigator;
use chrono::NaiveDate;
use std::fmt;
use tracing::debug;

/// How many events a cell lists before collapsing the rest.
pub const PREVIEW_LIMIT: usize = 2;

type MonthChangeHandler = Box<dyn FnMut(CalendarMonth)>;
type DayClickHandler<E> = Box<dyn FnMut(NaiveDate, &[E])>;
type EventClickHandler<E> = Box<dyn FnMut(&E)>;

/// The first few events of a day and how many were left out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPreview<'a, E> {
    pub shown: &'a [E],
    pub hidden: usize,
}

impl<'a, E> DayPreview<'a, E> {
    pub fn of(events: &'a [E], limit: usize) -> Self {
        let shown = &events[..events.len().min(limit)];
        DayPreview {
            shown,
            hidden: events.len() - shown.len(),
        }
    }

    /// "+3 more", or nothing when every event is shown.
    pub fn more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("+{} more", self.hidden))
    }
}

/// One grid cell together with its events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellView<'a, E> {
    pub day: CalendarDay,
    pub events: &'a [E],
    pub is_today: bool,
}

impl<'a, E> CellView<'a, E> {
    pub fn preview(&self, limit: usize) -> DayPreview<'a, E> {
        DayPreview::of(self.events, limit)
    }
}

pub struct CalendarView<E> {
    navigator: MonthNavigator,
    locales: LocaleTable,
    profile: LanguageProfile,
    events: Vec<E>,
    grid: CalendarGrid,
    buckets: DateBucketMap<E>,
    on_month_change: Option<MonthChangeHandler>,
    on_day_click: Option<DayClickHandler<E>>,
    on_event_click: Option<EventClickHandler<E>>,
}

impl<E: TimedEvent + Clone> CalendarView<E> {
    /// A view on the current month.
    pub fn new(events: Vec<E>, language: &str, locales: LocaleTable) -> Self {
        CalendarView::with_navigator(events, language, locales, MonthNavigator::new())
    }

    pub fn at_month(events: Vec<E>, language: &str, locales: LocaleTable, month: CalendarMonth) -> Self {
        CalendarView::with_navigator(events, language, locales, MonthNavigator::starting_at(month))
    }

    /// A view on the current month using the configured language table.
    pub fn from_config(events: Vec<E>, config: &CalendarConfig) -> CalendarResult<Self> {
        let locales = LocaleTable::from_config(config)?;
        Ok(CalendarView::new(events, &config.language, locales))
    }

    fn with_navigator(events: Vec<E>, language: &str, locales: LocaleTable, navigator: MonthNavigator) -> Self {
        let profile = locales.resolve(language);
        let grid = build_month_grid(navigator.current(), profile.week_start);
        let buckets = bucket_timed_events(&events);

        CalendarView {
            navigator,
            locales,
            profile,
            events,
            grid,
            buckets,
            on_month_change: None,
            on_day_click: None,
            on_event_click: None,
        }
    }

    pub fn month(&self) -> CalendarMonth {
        self.navigator.current()
    }

    pub fn language(&self) -> &str {
        &self.profile.code
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    pub fn week_start(&self) -> WeekStart {
        self.profile.week_start
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    pub fn buckets(&self) -> &DateBucketMap<E> {
        &self.buckets
    }

    pub fn weekday_labels(&self) -> [String; DAYS_PER_WEEK] {
        self.profile.weekday_labels()
    }

    pub fn month_label(&self) -> String {
        self.profile.month_label(self.month())
    }

    /// Events on `date`, sorted by time.
    pub fn events_on(&self, date: NaiveDate) -> &[E] {
        self.buckets.get(date)
    }

    /// Every cell of the grid with its events; `today` marks the current day.
    pub fn cells(&self, today: NaiveDate) -> Vec<CellView<'_, E>> {
        self.grid
            .days()
            .iter()
            .map(|day| CellView {
                day: *day,
                events: self.buckets.get(day.date),
                is_today: day.is_today(today),
            })
            .collect()
    }

    pub fn set_events(&mut self, events: Vec<E>) {
        self.events = events;
        self.buckets = bucket_timed_events(&self.events);
        debug!(
            events = self.events.len(),
            days = self.buckets.len(),
            "calendar events replaced"
        );
    }

    pub fn set_language(&mut self, language: &str) {
        self.profile = self.locales.resolve(language);
        self.rebuild_grid();
    }

    pub fn go_to_previous_month(&mut self) -> CalendarMonth {
        let month = self.navigator.go_to_previous_month();
        self.month_changed(month)
    }

    pub fn go_to_next_month(&mut self) -> CalendarMonth {
        let month = self.navigator.go_to_next_month();
        self.month_changed(month)
    }

    pub fn go_to_today(&mut self) -> CalendarMonth {
        let month = self.navigator.go_to_today();
        self.month_changed(month)
    }

    pub fn go_to_date(&mut self, date: NaiveDate) -> CalendarMonth {
        let month = self.navigator.go_to_date(date);
        self.month_changed(month)
    }

    pub fn on_month_change<F: FnMut(CalendarMonth) + 'static>(&mut self, handler: F) {
        self.on_month_change = Some(Box::new(handler));
    }

    pub fn on_day_click<F: FnMut(NaiveDate, &[E]) + 'static>(&mut self, handler: F) {
        self.on_day_click = Some(Box::new(handler));
    }

    pub fn on_event_click<F: FnMut(&E) + 'static>(&mut self, handler: F) {
        self.on_event_click = Some(Box::new(handler));
    }

    /// Report a click on grid cell `index` (0..42). Returns false if there is
    /// no such cell.
    pub fn click_day(&mut self, index: usize) -> bool {
        let Some(day) = self.grid.days().get(index).copied() else {
            return false;
        };
        if let Some(handler) = self.on_day_click.as_mut() {
            handler(day.date, self.buckets.get(day.date));
        }
        true
    }

    /// Report a click on the `position`-th event of `date`. Returns false if
    /// the day has no such event.
    pub fn click_event(&mut self, date: NaiveDate, position: usize) -> bool {
        let Some(event) = self.buckets.get(date).get(position) else {
            return false;
        };
        if let Some(handler) = self.on_event_click.as_mut() {
            handler(event);
        }
        true
    }

    fn month_changed(&mut self, month: CalendarMonth) -> CalendarMonth {
        self.rebuild_grid();
        if let Some(handler) = self.on_month_change.as_mut() {
            handler(month);
        }
        month
    }

    fn rebuild_grid(&mut self) {
        self.grid = build_month_grid(self.navigator.current(), self.profile.week_start);
        debug!(
            month = %self.navigator.current(),
            week_start = self.profile.week_start.name(),
            "calendar grid rebuilt"
        );
    }
}

impl<E> fmt::Display for CalendarView<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalendarView({}, language={}, days_with_events={})",
            self.navigator.current(),
            self.profile.code,
            self.buckets.len()
        )
    }
}
