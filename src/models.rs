//! Data models for the clinic calendars.
//!
//! This module defines the records the calendars display, as the REST backend
//! delivers them:
//! - AppointmentStatus: lifecycle state of an appointment
//! - PatientRef: a patient id or an embedded patient summary
//! - Appointment: a scheduled patient visit
//! - SlotKind / AvailabilityEntry: a staff member's availability for a day
//! - TimedEvent: what the calendar needs from any of them

use crate::error::{CalendarError, CalendarResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Anything the calendar can place on a day.
pub trait TimedEvent {
    fn event_id(&self) -> u64;

    /// Raw timestamp as delivered; may be absent or malformed.
    fn timestamp(&self) -> Option<&str>;
}

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    /// Anything the backend sends that this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    /// Convert a string to an AppointmentStatus value.
    pub fn from_string(value: &str) -> Result<Self, String> {
        match value.trim().to_uppercase().as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "NO_SHOW" => Ok(AppointmentStatus::NoShow),
            _ => Err(format!(
                "Invalid status: '{}'. Must be one of: scheduled, confirmed, cancelled, completed, no_show",
                value
            )),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::NoShow => "NO_SHOW",
            AppointmentStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Patient fields embedded in an appointment when the backend expands them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Either a bare patient id or an expanded summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatientRef {
    Summary(PatientSummary),
    Id(u64),
}

impl PatientRef {
    pub fn id(&self) -> u64 {
        match self {
            PatientRef::Summary(summary) => summary.id,
            PatientRef::Id(id) => *id,
        }
    }

    /// "First Last", or `Patient #<id>` when no name is known.
    pub fn display_name(&self) -> String {
        if let PatientRef::Summary(summary) = self {
            let first = summary.first_name.as_deref().unwrap_or("");
            let last = summary.last_name.as_deref().unwrap_or("");
            let name = format!("{} {}", first, last).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
        format!("Patient #{}", self.id())
    }
}

/// Represents a scheduled appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default)]
    pub doctor: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

impl Appointment {
    pub fn patient_display_name(&self) -> String {
        self.patient
            .as_ref()
            .map(PatientRef::display_name)
            .unwrap_or_else(|| "-".to_string())
    }
}

impl TimedEvent for Appointment {
    fn event_id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> Option<&str> {
        self.scheduled_at.as_deref()
    }
}

/// Part of the day a staff member is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotKind {
    Morning,
    Afternoon,
    FullDay,
    Unavailable,
    #[serde(other)]
    Unknown,
}

impl SlotKind {
    pub fn name(&self) -> &str {
        match self {
            SlotKind::Morning => "Morning",
            SlotKind::Afternoon => "Afternoon",
            SlotKind::FullDay => "Full day",
            SlotKind::Unavailable => "Unavailable",
            SlotKind::Unknown => "Other",
        }
    }
}

/// One availability record.
///
/// `date` is usually a bare `YYYY-MM-DD`, which buckets on that same local day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub id: u64,
    #[serde(default)]
    pub date: Option<String>,
    pub slot: SlotKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

impl TimedEvent for AvailabilityEntry {
    fn event_id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Blank text fields come back as `null` as often as they are left out.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Extract the records from a list response.
///
/// The backend answers either with a bare array or with a paginated envelope
/// carrying the records under `results`. Any other shape is treated as empty.
pub fn unwrap_list<T: DeserializeOwned>(value: Value) -> CalendarResult<Vec<T>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    serde_json::from_value(Value::Array(items)).map_err(CalendarError::EventsDecode)
}

#[cfg(test)]
mod tests {
    use super::{unwrap_list, Appointment, AppointmentStatus, AvailabilityEntry, PatientRef, SlotKind, TimedEvent};
    use serde_json::json;

    #[test]
    fn decodes_appointment_with_embedded_patient() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 12,
            "scheduled_at": "2024-02-05T08:00:00Z",
            "status": "NO_SHOW",
            "patient": { "id": 4, "first_name": "Jane", "last_name": "Doe" },
            "doctor": 2,
            "reason": "Checkup"
        }))
        .expect("decode appointment");

        assert_eq!(appointment.event_id(), 12);
        assert_eq!(appointment.timestamp(), Some("2024-02-05T08:00:00Z"));
        assert_eq!(appointment.status, AppointmentStatus::NoShow);
        assert_eq!(appointment.patient_display_name(), "Jane Doe");
        assert_eq!(appointment.notes, "");
    }

    #[test]
    fn patient_name_falls_back_to_id() {
        let bare = PatientRef::Id(9);
        assert_eq!(bare.display_name(), "Patient #9");

        let appointment: Appointment = serde_json::from_value(json!({
            "id": 1,
            "patient": { "id": 5, "first_name": "", "last_name": null }
        }))
        .expect("decode appointment");
        assert_eq!(appointment.patient_display_name(), "Patient #5");
        assert_eq!(appointment.timestamp(), None);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn unknown_status_does_not_fail_decoding() {
        let appointment: Appointment =
            serde_json::from_value(json!({ "id": 3, "status": "RESCHEDULED" })).expect("decode");
        assert_eq!(appointment.status, AppointmentStatus::Unknown);
    }

    #[test]
    fn null_text_fields_decode_as_empty() {
        let appointments: Vec<Appointment> = unwrap_list(json!([
            { "id": 1, "scheduled_at": "2024-02-05T08:00", "reason": null, "notes": null },
            { "id": 2, "scheduled_at": "2024-02-05T09:00", "reason": "Checkup" }
        ]))
        .expect("decode appointments");
        assert_eq!(appointments.len(), 2);
        assert_eq!(appointments[0].reason, "");
        assert_eq!(appointments[0].notes, "");
        assert_eq!(appointments[1].reason, "Checkup");

        let entries: Vec<AvailabilityEntry> =
            unwrap_list(json!([{ "id": 3, "date": "2024-02-05", "slot": "MORNING", "note": null }]))
                .expect("decode availability");
        assert_eq!(entries[0].note, "");
    }

    #[test]
    fn unknown_slot_does_not_fail_the_list() {
        let entries: Vec<AvailabilityEntry> = unwrap_list(json!([
            { "id": 1, "date": "2024-02-05", "slot": "EVENING" },
            { "id": 2, "date": "2024-02-05", "slot": "MORNING" }
        ]))
        .expect("decode availability");
        assert_eq!(entries[0].slot, SlotKind::Unknown);
        assert_eq!(entries[0].slot.name(), "Other");
        assert_eq!(entries[1].slot, SlotKind::Morning);
    }

    #[test]
    fn status_from_string() {
        assert_eq!(AppointmentStatus::from_string(" no_show "), Ok(AppointmentStatus::NoShow));
        assert!(AppointmentStatus::from_string("later").is_err());
        assert_eq!(AppointmentStatus::Confirmed.name(), "CONFIRMED");
    }

    #[test]
    fn unwraps_bare_arrays_and_envelopes() {
        let bare: Vec<AvailabilityEntry> = unwrap_list(json!([
            { "id": 1, "date": "2024-02-05", "slot": "MORNING" }
        ]))
        .expect("bare list");
        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].slot, SlotKind::Morning);

        let paged: Vec<AvailabilityEntry> = unwrap_list(json!({
            "count": 2,
            "next": null,
            "results": [
                { "id": 1, "date": "2024-02-05", "slot": "FULL_DAY" },
                { "id": 2, "date": null, "slot": "UNAVAILABLE", "note": "leave" }
            ]
        }))
        .expect("paged list");
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[1].timestamp(), None);
        assert_eq!(paged[1].note, "leave");
    }

    #[test]
    fn odd_shapes_are_empty_and_bad_items_are_errors() {
        let empty: Vec<Appointment> = unwrap_list(json!({ "detail": "ok" })).expect("object");
        assert!(empty.is_empty());
        let empty: Vec<Appointment> = unwrap_list(json!("nope")).expect("string");
        assert!(empty.is_empty());

        let bad = unwrap_list::<Appointment>(json!([{ "id": "abc" }]));
        assert!(bad.is_err());
    }
}
