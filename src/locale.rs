//! Language-dependent calendar layout.
//!
//! The week start is looked up in a table keyed by language code rather than
//! branched on inline, so adding a language is a configuration change.

use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult};
use crate::grid::{WeekStart, DAYS_PER_WEEK};
use crate::month::CalendarMonth;
use chrono::{Days, Locale, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_LANGUAGE: &str = "en";

/// How one language lays out the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub code: String,
    pub week_start: WeekStart,
    pub locale: Locale,
}

impl LanguageProfile {
    pub fn new(code: &str, week_start: WeekStart, locale: Locale) -> Self {
        LanguageProfile {
            code: normalize_language(code),
            week_start,
            locale,
        }
    }

    pub fn weekday_labels(&self) -> [String; DAYS_PER_WEEK] {
        weekday_labels(self.week_start, self.locale)
    }

    pub fn month_label(&self, month: CalendarMonth) -> String {
        month_label(month, self.locale)
    }
}

/// Language code to layout table.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    profiles: HashMap<String, LanguageProfile>,
    fallback: LanguageProfile,
}

impl LocaleTable {
    /// English starts weeks on Sunday, French on Monday.
    pub fn builtin() -> Self {
        let english = LanguageProfile::new("en", WeekStart::Sunday, Locale::en_US);
        let french = LanguageProfile::new("fr", WeekStart::Monday, Locale::fr_FR);

        let mut table = LocaleTable {
            profiles: HashMap::new(),
            fallback: english.clone(),
        };
        table.insert(english);
        table.insert(french);
        table
    }

    pub fn from_config(config: &CalendarConfig) -> CalendarResult<Self> {
        let mut profiles = HashMap::new();
        for (code, settings) in &config.languages {
            let profile = LanguageProfile::new(code, settings.week_start, parse_locale(&settings.locale)?);
            profiles.insert(profile.code.clone(), profile);
        }

        let fallback_code = normalize_language(&config.fallback_language);
        let fallback = profiles
            .get(&fallback_code)
            .cloned()
            .unwrap_or_else(|| LanguageProfile::new(&fallback_code, WeekStart::Sunday, Locale::en_US));

        Ok(LocaleTable { profiles, fallback })
    }

    pub fn insert(&mut self, profile: LanguageProfile) {
        self.profiles.insert(profile.code.clone(), profile);
    }

    pub fn contains(&self, language: &str) -> bool {
        self.profiles.contains_key(&normalize_language(language))
    }

    /// Configured week start, Sunday for any language not in the table.
    pub fn week_start_for(&self, language: &str) -> WeekStart {
        self.profiles
            .get(&normalize_language(language))
            .map(|profile| profile.week_start)
            .unwrap_or(WeekStart::Sunday)
    }

    /// Profile for `language`.
    ///
    /// Unknown languages start weeks on Sunday and borrow the fallback
    /// language's locale for names.
    pub fn resolve(&self, language: &str) -> LanguageProfile {
        let code = normalize_language(language);
        match self.profiles.get(&code) {
            Some(profile) => profile.clone(),
            None => {
                debug!(language = %code, fallback = %self.fallback.code, "language not configured");
                LanguageProfile {
                    code,
                    week_start: WeekStart::Sunday,
                    locale: self.fallback.locale,
                }
            }
        }
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        LocaleTable::builtin()
    }
}

/// Primary subtag, lowercased: `fr-FR` and `FR_ca` both become `fr`.
pub fn normalize_language(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Parse a POSIX-style locale tag such as `fr_FR` (a dash also works).
pub fn parse_locale(tag: &str) -> CalendarResult<Locale> {
    let normalized = tag.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).map_err(|_| CalendarError::UnknownLocale(tag.to_string()))
}

fn localized(date: NaiveDate, format: &str, locale: Locale) -> String {
    match date.and_hms_opt(12, 0, 0) {
        Some(noon) => Utc.from_utc_datetime(&noon).format_localized(format, locale).to_string(),
        None => date.format(format).to_string(),
    }
}

/// Short weekday names in column order.
///
/// Formats seven consecutive days of a reference week beginning on the
/// configured weekday (1 January 2024 was a Monday).
pub fn weekday_labels(week_start: WeekStart, locale: Locale) -> [String; DAYS_PER_WEEK] {
    let reference_monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let first = match week_start {
        WeekStart::Monday => reference_monday,
        WeekStart::Sunday => reference_monday
            .checked_add_days(Days::new(6))
            .unwrap_or(reference_monday),
    };

    std::array::from_fn(|offset| {
        let date = first
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(first);
        localized(date, "%a", locale)
    })
}

/// Header text such as "February 2024".
pub fn month_label(month: CalendarMonth, locale: Locale) -> String {
    localized(month.first_day(), "%B %Y", locale)
}
