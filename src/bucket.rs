//! Event bucketing by local calendar date.
//!
//! Keys are derived from the date the viewer's wall clock shows for the
//! timestamp, not from UTC. Two viewers in different zones can see the same
//! appointment on different days; that matches how clinic staff read the
//! calendar and is kept on purpose.

use crate::models::TimedEvent;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// `%#z` takes `+01:00`, `+0100`, `+01` and `Z`.
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// A `YYYY-MM-DD` day key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(value, DATE_KEY_FORMAT).map(DateKey)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a backend timestamp into the viewer's zone.
///
/// Accepts RFC 3339 and other ISO 8601 date-times carrying an offset or `Z`
/// (seconds optional), naive date-times (read as wall-clock time in `tz`)
/// and bare dates (midnight in `tz`). A naive time that falls in a DST gap
/// moves forward one hour; an ambiguous one takes the earlier instant.
/// Returns `None` for anything else.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(instant) = parse_instant(raw) {
        return Some(instant.with_timezone(tz));
    }

    let naive = parse_naive(raw).or_else(|| {
        NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let zoned = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|format| DateTime::<FixedOffset>::parse_from_str(raw, format).ok())
    });
    if let Some(parsed) = zoned {
        return Some(parsed.with_timezone(&Utc));
    }
    let utc = raw.strip_suffix(['Z', 'z']).and_then(parse_naive)?;
    Some(Utc.from_utc_datetime(&utc))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Events grouped per local day, each day sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub struct DateBucketMap<E> {
    buckets: BTreeMap<DateKey, Vec<E>>,
}

impl<E> Default for DateBucketMap<E> {
    fn default() -> Self {
        DateBucketMap {
            buckets: BTreeMap::new(),
        }
    }
}

impl<E> DateBucketMap<E> {
    /// Events on `date`, empty if none.
    pub fn get(&self, date: NaiveDate) -> &[E] {
        self.get_key(&DateKey::from(date))
    }

    pub fn get_key(&self, key: &DateKey) -> &[E] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of days that have at least one event.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_events(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DateKey> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &[E])> {
        self.buckets.iter().map(|(key, events)| (key, events.as_slice()))
    }
}

/// Group `events` by their local date in `tz`.
///
/// Events whose timestamp is missing or unparseable are left out. Within a
/// day, events are ordered by instant; equal instants keep input order.
pub fn bucket_events_in<E, Tz, F>(events: &[E], tz: &Tz, timestamp_of: F) -> DateBucketMap<E>
where
    E: Clone,
    Tz: TimeZone,
    F: Fn(&E) -> Option<&str>,
{
    let mut staged: BTreeMap<DateKey, Vec<(DateTime<Utc>, &E)>> = BTreeMap::new();
    let mut dropped = 0usize;

    for event in events {
        let Some(local) = timestamp_of(event).and_then(|raw| parse_timestamp(raw, tz)) else {
            dropped += 1;
            continue;
        };
        staged
            .entry(DateKey::from(local.date_naive()))
            .or_default()
            .push((local.with_timezone(&Utc), event));
    }

    if dropped > 0 {
        debug!(dropped, "skipped events without a usable timestamp");
    }

    let buckets = staged
        .into_iter()
        .map(|(key, mut day)| {
            // Stable: ties keep their input order.
            day.sort_by_key(|(instant, _)| *instant);
            (key, day.into_iter().map(|(_, event)| event.clone()).collect())
        })
        .collect();

    DateBucketMap { buckets }
}

/// [`bucket_events_in`] using the process-local time zone.
pub fn bucket_events<E, F>(events: &[E], timestamp_of: F) -> DateBucketMap<E>
where
    E: Clone,
    F: Fn(&E) -> Option<&str>,
{
    bucket_events_in(events, &Local, timestamp_of)
}

/// Bucket any [`TimedEvent`] in the process-local time zone.
pub fn bucket_timed_events<E: TimedEvent + Clone>(events: &[E]) -> DateBucketMap<E> {
    bucket_events(events, |event| event.timestamp())
}
