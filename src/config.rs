//! Calendar configuration.
//!
//! Resolved once at startup: built-in defaults, then an optional TOML file,
//! then the language override from the environment.
//!
//! ```toml
//! language = "fr"
//! fallback_language = "en"
//!
//! [languages.de]
//! week_start = "monday"
//! locale = "de_DE"
//! ```

use crate::error::{CalendarError, CalendarResult};
use crate::grid::WeekStart;
use crate::locale::{normalize_language, DEFAULT_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Path of the TOML config file, when not given explicitly.
pub const CONFIG_PATH_ENV: &str = "CLINICFLOW_CALENDAR_CONFIG";
/// Display language override.
pub const LANGUAGE_ENV: &str = "CLINICFLOW_LANGUAGE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub week_start: WeekStart,
    pub locale: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    language: Option<String>,
    fallback_language: Option<String>,
    #[serde(default)]
    languages: BTreeMap<String, LanguageSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    pub language: String,
    pub fallback_language: String,
    pub languages: BTreeMap<String, LanguageSettings>,
    pub loaded_file: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert(
            "en".to_string(),
            LanguageSettings {
                week_start: WeekStart::Sunday,
                locale: "en_US".to_string(),
            },
        );
        languages.insert(
            "fr".to_string(),
            LanguageSettings {
                week_start: WeekStart::Monday,
                locale: "fr_FR".to_string(),
            },
        );

        CalendarConfig {
            language: DEFAULT_LANGUAGE.to_string(),
            fallback_language: DEFAULT_LANGUAGE.to_string(),
            languages,
            loaded_file: None,
        }
    }
}

impl CalendarConfig {
    /// Load defaults, the config file and the environment override.
    ///
    /// `path` wins over `CLINICFLOW_CALENDAR_CONFIG`. A file named only by
    /// the environment that does not exist is skipped with a warning.
    #[tracing::instrument]
    pub fn load(path: Option<&Path>) -> CalendarResult<Self> {
        let mut config = CalendarConfig::default();

        match path {
            Some(path) => config.merge_file(path)?,
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(env_path) => {
                    let env_path = PathBuf::from(env_path);
                    if env_path.exists() {
                        config.merge_file(&env_path)?;
                    } else {
                        warn!(path = %env_path.display(), "config file from environment not found; using defaults");
                    }
                }
                None => debug!("no calendar config file; using defaults"),
            },
        }

        config.apply_language_override(std::env::var(LANGUAGE_ENV).ok());
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> CalendarResult<()> {
        info!(path = %path.display(), "loading calendar config");
        let text = fs::read_to_string(path).map_err(|source| CalendarError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&text, path)?;
        self.loaded_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Overlay TOML text on the current values. `origin` is only used in errors.
    pub fn merge_toml(&mut self, text: &str, origin: &Path) -> CalendarResult<()> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| CalendarError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;

        if let Some(language) = file.language {
            self.language = normalize_language(&language);
        }
        if let Some(fallback) = file.fallback_language {
            self.fallback_language = normalize_language(&fallback);
        }
        for (code, settings) in file.languages {
            debug!(language = %code, week_start = settings.week_start.name(), "configured language");
            self.languages.insert(normalize_language(&code), settings);
        }
        Ok(())
    }

    /// Replace the display language when `language` is a non-empty code.
    pub fn apply_language_override(&mut self, language: Option<String>) {
        let Some(language) = language else {
            return;
        };
        let code = normalize_language(&language);
        if code.is_empty() {
            warn!(value = %language, "ignoring empty language override");
            return;
        }
        debug!(language = %code, "applying language override");
        self.language = code;
    }
}
