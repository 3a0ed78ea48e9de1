//! The two calendars built on [`CalendarView`]: appointments and staff
//! availability. They differ only in the record type and its one-line text.

use crate::bucket::DateKey;
use crate::date_format::format_time;
use crate::models::{Appointment, AvailabilityEntry, TimedEvent};
use crate::view::{CalendarView, PREVIEW_LIMIT};
use chrono::NaiveDate;
use serde::Serialize;

pub type AppointmentCalendar = CalendarView<Appointment>;
pub type AvailabilityCalendar = CalendarView<AvailabilityEntry>;

/// Short text shown for an event inside a day cell.
pub trait EventSummary: TimedEvent {
    fn summary(&self) -> String;
}

impl EventSummary for Appointment {
    /// `08:00 Jane Doe - Checkup`; the reason is omitted when empty.
    fn summary(&self) -> String {
        let time = format_time(self.timestamp());
        let patient = self.patient_display_name();
        if self.reason.is_empty() {
            format!("{} {}", time, patient)
        } else {
            format!("{} {} - {}", time, patient, self.reason)
        }
    }
}

impl EventSummary for AvailabilityEntry {
    fn summary(&self) -> String {
        if self.note.is_empty() {
            self.slot.name().to_string()
        } else {
            format!("{} - {}", self.slot.name(), self.note)
        }
    }
}

/// A rendered month, ready to hand to a presentation layer as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MonthSnapshot {
    pub month: String,
    pub label: String,
    pub language: String,
    pub weekdays: Vec<String>,
    pub cells: Vec<CellSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellSnapshot {
    pub date: DateKey,
    pub day: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<EventSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSnapshot {
    pub id: u64,
    pub summary: String,
}

impl MonthSnapshot {
    pub fn capture<E: EventSummary + Clone>(view: &CalendarView<E>, today: NaiveDate) -> Self {
        let cells = view
            .cells(today)
            .iter()
            .map(|cell| {
                let preview = cell.preview(PREVIEW_LIMIT);
                CellSnapshot {
                    date: cell.day.key(),
                    day: cell.day.day(),
                    is_current_month: cell.day.is_current_month,
                    is_today: cell.is_today,
                    events: preview
                        .shown
                        .iter()
                        .map(|event| EventSnapshot {
                            id: event.event_id(),
                            summary: event.summary(),
                        })
                        .collect(),
                    more: preview.more_label(),
                }
            })
            .collect();

        MonthSnapshot {
            month: view.month().to_string(),
            label: view.month_label(),
            language: view.language().to_string(),
            weekdays: view.weekday_labels().to_vec(),
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppointmentCalendar, AvailabilityCalendar, EventSummary, MonthSnapshot};
    use crate::locale::LocaleTable;
    use crate::models::{unwrap_list, Appointment, AppointmentStatus, AvailabilityEntry, PatientRef, SlotKind};
    use crate::month::CalendarMonth;
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn appointment_summary() {
        let mut appointment = Appointment {
            id: 1,
            scheduled_at: Some("2024-02-05T08:00".to_string()),
            status: AppointmentStatus::Confirmed,
            patient: Some(PatientRef::Id(7)),
            doctor: None,
            reason: "Checkup".to_string(),
            notes: String::new(),
        };
        assert_eq!(appointment.summary(), "08:00 Patient #7 - Checkup");

        appointment.reason.clear();
        appointment.scheduled_at = None;
        assert_eq!(appointment.summary(), "- Patient #7");
    }

    #[test]
    fn availability_summary() {
        let entry = AvailabilityEntry {
            id: 2,
            date: Some("2024-02-05".to_string()),
            slot: SlotKind::FullDay,
            note: "Ward round".to_string(),
        };
        assert_eq!(entry.summary(), "Full day - Ward round");
    }

    #[test]
    fn appointments_calendar_from_paged_response() {
        let appointments: Vec<Appointment> = unwrap_list(json!({
            "count": 3,
            "results": [
                { "id": 1, "scheduled_at": "2024-02-05T14:30", "patient": 3 },
                { "id": 2, "scheduled_at": "2024-02-05T08:00", "patient": 4 },
                { "id": 3, "scheduled_at": null, "patient": 5 }
            ]
        }))
        .expect("decode appointments");

        let calendar =
            AppointmentCalendar::at_month(appointments, "fr", LocaleTable::builtin(), CalendarMonth::new(2024, 1));
        let ids: Vec<u64> = calendar.events_on(date(2024, 2, 5)).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(calendar.buckets().total_events(), 2);
    }

    #[test]
    fn availability_calendar_buckets_on_the_stated_day() {
        let entries: Vec<AvailabilityEntry> = unwrap_list(json!([
            { "id": 1, "date": "2024-03-01", "slot": "MORNING" },
            { "id": 2, "date": "2024-02-29", "slot": "AFTERNOON" },
            { "id": 3, "date": "someday", "slot": "UNAVAILABLE" }
        ]))
        .expect("decode availability");

        let calendar =
            AvailabilityCalendar::at_month(entries, "en", LocaleTable::builtin(), CalendarMonth::new(2024, 1));
        assert_eq!(calendar.events_on(date(2024, 2, 29)).len(), 1);
        assert_eq!(calendar.events_on(date(2024, 3, 1)).len(), 1);
        assert_eq!(calendar.buckets().total_events(), 2);

        // 1 March is a padding cell of the February grid but still shows its entry.
        let cells = calendar.cells(date(2000, 1, 1));
        let march_first = cells
            .iter()
            .find(|cell| cell.day.date == date(2024, 3, 1))
            .expect("padding cell");
        assert!(!march_first.day.is_current_month);
        assert_eq!(march_first.events[0].slot, SlotKind::Morning);
    }

    #[test]
    fn snapshot_serializes_cells_with_overflow() {
        let entries: Vec<AvailabilityEntry> = (1..=4)
            .map(|id| AvailabilityEntry {
                id,
                date: Some("2024-02-12".to_string()),
                slot: SlotKind::Morning,
                note: String::new(),
            })
            .collect();
        let calendar =
            AvailabilityCalendar::at_month(entries, "en", LocaleTable::builtin(), CalendarMonth::new(2024, 1));

        let snapshot = MonthSnapshot::capture(&calendar, date(2024, 2, 12));
        assert_eq!(snapshot.month, "2024-02");
        assert_eq!(snapshot.label, "February 2024");
        assert_eq!(snapshot.weekdays[0], "Sun");
        assert_eq!(snapshot.cells.len(), 42);

        let value = serde_json::to_value(&snapshot).expect("serialize snapshot");
        let cell = value["cells"]
            .as_array()
            .and_then(|cells| cells.iter().find(|cell| cell["date"] == "2024-02-12"))
            .expect("cell for 12 February");
        assert_eq!(cell["is_today"], true);
        assert_eq!(cell["events"].as_array().map(Vec::len), Some(2));
        assert_eq!(cell["more"], "+2 more");
        assert!(value["cells"][0].get("more").is_none());
    }
}
