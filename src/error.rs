//! Error types for the clinic calendar.
//!
//! Grid building, bucketing and navigation are total and never fail. Errors
//! only come from the edges: reading configuration and decoding event lists.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid week start '{0}': expected 'sunday' or 'monday'")]
    InvalidWeekStart(String),
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
    #[error("failed to read events file: {0}")]
    EventsRead(std::io::Error),
    #[error("failed to decode events: {0}")]
    EventsDecode(serde_json::Error),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
