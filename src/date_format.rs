//! Display formatting shared by tables and calendar cells.
//!
//! Dates are `DD/MM/YYYY`, times are 24-hour `HH:MM`, both in the viewer's
//! zone. Absent or unreadable input renders as `-`.

use crate::bucket::parse_timestamp;
use chrono::{DateTime, Local, Locale};

pub const PLACEHOLDER: &str = "-";

fn parse_local(raw: Option<&str>) -> Option<DateTime<Local>> {
    raw.and_then(|raw| parse_timestamp(raw, &Local))
}

pub fn format_date(raw: Option<&str>) -> String {
    parse_local(raw)
        .map(|at| at.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_time(raw: Option<&str>) -> String {
    parse_local(raw)
        .map(|at| at.format("%H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_date_time(raw: Option<&str>) -> String {
    parse_local(raw)
        .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Day, month name and year, e.g. "15 January 2024".
pub fn format_date_long(raw: Option<&str>, locale: Locale) -> String {
    parse_local(raw)
        .map(|at| at.format_localized("%-d %B %Y", locale).to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_date, format_date_long, format_date_time, format_time};
    use chrono::Locale;

    #[test]
    fn formats_wall_clock_values() {
        assert_eq!(format_date(Some("2024-02-05T08:07")), "05/02/2024");
        assert_eq!(format_time(Some("2024-02-05T08:07")), "08:07");
        assert_eq!(format_date_time(Some("2024-02-05T18:30:00")), "05/02/2024 18:30");
        assert_eq!(format_date_long(Some("2024-01-15"), Locale::en_GB), "15 January 2024");
    }

    #[test]
    fn invalid_input_is_a_dash() {
        assert_eq!(format_date(None), "-");
        assert_eq!(format_time(Some("")), "-");
        assert_eq!(format_date_time(Some("tomorrow")), "-");
        assert_eq!(format_date_long(Some("15/01/2024"), Locale::en_GB), "-");
    }
}
