//! Month calendars for the clinic front-end.
//!
//! The appointments calendar and the staff availability calendar share one
//! pipeline: a [`CalendarMonth`] is laid out as a 42-cell [`CalendarGrid`],
//! events are grouped into a [`DateBucketMap`] keyed by local date, and a
//! [`CalendarView`] keeps both current as the user navigates or the event
//! list changes.

pub mod adapters;
pub mod bucket;
pub mod config;
pub mod date_format;
pub mod error;
pub mod grid;
pub mod locale;
pub mod models;
pub mod month;
pub mod navigation;
pub mod view;

pub use adapters::{AppointmentCalendar, AvailabilityCalendar, EventSummary, MonthSnapshot};
pub use bucket::{bucket_events, bucket_events_in, bucket_timed_events, parse_timestamp, DateBucketMap, DateKey};
pub use config::CalendarConfig;
pub use error::{CalendarError, CalendarResult};
pub use grid::{build_month_grid, CalendarDay, CalendarGrid, WeekStart};
pub use locale::{LanguageProfile, LocaleTable};
pub use models::{unwrap_list, Appointment, AppointmentStatus, AvailabilityEntry, SlotKind, TimedEvent};
pub use month::CalendarMonth;
pub use navigation::MonthNavigator;
pub use view::{CalendarView, CellView, DayPreview};
