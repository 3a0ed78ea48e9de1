use chrono::{Datelike, NaiveDate, Weekday};
use clinicflow_calendar::{
    build_month_grid, bucket_timed_events, unwrap_list, AppointmentCalendar, CalendarConfig, CalendarMonth,
    LocaleTable, MonthNavigator, WeekStart,
};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn french_february_2024_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("calendar.toml");
    fs::write(&path, "fallback_language = \"en\"\n").expect("write config");

    let mut config = CalendarConfig::load(Some(path.as_path())).expect("load config");
    config.apply_language_override(Some("fr-FR".to_string()));
    let locales = LocaleTable::from_config(&config).expect("locales");
    assert_eq!(locales.week_start_for(&config.language), WeekStart::Monday);

    let appointments = unwrap_list(json!({
        "count": 4,
        "results": [
            { "id": 30, "scheduled_at": "2024-02-06T09:00", "status": "CONFIRMED", "patient": 1 },
            { "id": 20, "scheduled_at": "2024-02-05T14:30", "status": "SCHEDULED", "patient": 2 },
            { "id": 10, "scheduled_at": "2024-02-05T08:00", "status": "SCHEDULED", "patient": 3 },
            { "id": 40, "scheduled_at": "not-a-time", "patient": 4 }
        ]
    }))
    .expect("decode appointments");

    let mut calendar =
        AppointmentCalendar::at_month(appointments, &config.language, locales, CalendarMonth::new(2024, 1));

    let grid = calendar.grid();
    assert_eq!(grid.len(), 42);
    assert_eq!(grid.first().map(|d| d.date), Some(date(2024, 1, 29)));
    assert_eq!(grid.last().map(|d| d.date), Some(date(2024, 3, 10)));
    assert_eq!(grid.days()[0].date.weekday(), Weekday::Mon);

    let keys: Vec<String> = calendar.buckets().keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["2024-02-05", "2024-02-06"]);
    let fifth: Vec<u64> = calendar.events_on(date(2024, 2, 5)).iter().map(|a| a.id).collect();
    assert_eq!(fifth, vec![10, 20]);

    calendar.go_to_next_month();
    calendar.go_to_next_month();
    assert_eq!(calendar.month(), CalendarMonth::new(2024, 3));
    assert_eq!(calendar.grid().days()[0].date.weekday(), Weekday::Mon);
    // Buckets are independent of the displayed month.
    assert_eq!(calendar.buckets().total_events(), 3);
}

#[test]
fn year_rollover_through_navigator() {
    let mut navigator = MonthNavigator::starting_at(CalendarMonth::new(2024, 11));
    assert_eq!(navigator.go_to_next_month(), CalendarMonth::new(2025, 0));
    assert_eq!(navigator.go_to_previous_month(), CalendarMonth::new(2024, 11));

    let mut navigator = MonthNavigator::starting_at(CalendarMonth::new(2024, 0));
    let december = navigator.go_to_previous_month();
    assert_eq!((december.year(), december.month()), (2023, 12));

    let grid = build_month_grid(december, WeekStart::Sunday);
    assert_eq!(grid.days()[0].date.weekday(), Weekday::Sun);
    assert_eq!(grid.current_month_days().count(), 31);
}

#[test]
fn availability_records_bucket_without_envelope() {
    let entries: Vec<clinicflow_calendar::AvailabilityEntry> = unwrap_list(json!([
        { "id": 1, "date": "2024-02-05", "slot": "MORNING" },
        { "id": 2, "date": "2024-02-05", "slot": "AFTERNOON" },
        { "id": 3, "slot": "FULL_DAY" }
    ]))
    .expect("decode availability");

    let buckets = bucket_timed_events(&entries);
    assert_eq!(buckets.len(), 1);
    let ids: Vec<u64> = buckets.get(date(2024, 2, 5)).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
}
