use std::fs;
use std::path::Path;
use std::time::Duration;

use iced::Theme;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "config.json";
pub const API_URL_ENV: &str = "SCHOOL_ADMIN_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme_name: String,
    pub api_base_url: String,
    pub cookie_file: String,
    pub cookie_name: String,
    pub section_transition_ms: u64,
    pub request_timeout_secs: Option<u64>,
    /// Idempotent match-or-create endpoint for grades, when the server has one.
    pub grades_upsert_path: Option<String>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_name: "Dark".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            cookie_file: "session.cookie".to_string(),
            cookie_name: "token".to_string(),
            section_transition_ms: 500,
            request_timeout_secs: None,
            grades_upsert_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn theme(&self) -> Theme {
        theme_from_str(&self.theme_name).unwrap_or(Theme::Dark)
    }

    pub fn section_transition(&self) -> Duration {
        Duration::from_millis(self.section_transition_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Reads `path`; a missing file is not an error and yields defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Loads [`CONFIG_FILE`] and applies the environment override for the API url.
/// A broken file is reported alongside the defaults instead of aborting startup.
pub fn load_config() -> (Config, Option<ConfigError>) {
    let (mut config, err) = match load_config_from(CONFIG_FILE) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_base_url = url;
        }
    }
    (config, err)
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name.trim()))
        .cloned()
}

pub fn theme_to_str(theme: &Theme) -> String {
    theme.to_string().replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_base_url":"http://school.test","section_transition_ms":120}}"#).unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.api_base_url, "http://school.test");
        assert_eq!(config.section_transition(), Duration::from_millis(120));
        assert_eq!(config.cookie_name, "token");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(load_config_from(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn theme_names_ignore_case_and_spaces() {
        assert_eq!(theme_from_str("dark"), Some(Theme::Dark));
        assert_eq!(theme_from_str("TokyoNight"), Some(Theme::TokyoNight));
        assert_eq!(theme_from_str("nonsense"), None);
    }
}
