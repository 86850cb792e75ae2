//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ScheduleSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP request settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Poll loop settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Persistent state location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification delivery
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Markup contract overrides
    #[serde(default)]
    pub markup: ScheduleSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Render the effective configuration, defaults included.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.url.trim().is_empty() {
            return Err(AppError::validation("fetcher.url is empty"));
        }
        url::Url::parse(&self.fetcher.url)?;
        if self.fetcher.cookie_name.trim().is_empty() {
            return Err(AppError::validation("fetcher.cookie_name is empty"));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.poll.interval_secs == 0 {
            return Err(AppError::validation("poll.interval_secs must be > 0"));
        }
        if let Some(ntfy_url) = &self.notify.ntfy_url {
            url::Url::parse(ntfy_url)?;
        }
        for (key, css) in self.markup.css() {
            scraper::Selector::parse(css)
                .map_err(|e| AppError::selector(format!("markup.{key} = {css}"), format!("{e:?}")))?;
        }
        Ok(())
    }
}

/// HTTP request settings for fetching the schedule page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Daily schedule endpoint
    #[serde(default = "defaults::url")]
    pub url: String,

    /// Cookie carrying the employee identifier
    #[serde(default = "defaults::cookie_name")]
    pub cookie_name: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            cookie_name: defaults::cookie_name(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Which change detection policy drives the poll loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Digest of the raw document; any byte change counts
    #[default]
    Fingerprint,
    /// Persisted schedule date label; survives restarts
    DateLabel,
}

impl std::str::FromStr for Strategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fingerprint" => Ok(Self::Fingerprint),
            "date-label" | "date" => Ok(Self::DateLabel),
            other => Err(AppError::config(format!("unknown strategy: {other}"))),
        }
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    #[serde(default)]
    pub strategy: Strategy,

    /// Emit a failure event to the sink when a cycle fails
    #[serde(default)]
    pub report_failures: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            strategy: Strategy::default(),
            report_failures: false,
        }
    }
}

/// Persistent state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Optional ntfy-style endpoint receiving a POST per notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntfy_url: Option<String>,
}

mod defaults {
    use std::path::PathBuf;

    pub fn url() -> String {
        "https://scheduling.lindypaving.com/tpjwebsite.nsf/xhtmlDailySchedule?openForm".into()
    }
    pub fn cookie_name() -> String {
        "schedulingEmpID".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; shiftwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn interval() -> u64 {
        600
    }
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll.interval_secs, 600);
        assert_eq!(config.fetcher.cookie_name, "schedulingEmpID");
        assert_eq!(config.poll.strategy, Strategy::Fingerprint);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            [poll]
            interval_secs = 60
            strategy = "date-label"

            [markup]
            other_row_class = "staffRow"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.poll.interval_secs, 60);
        assert_eq!(config.poll.strategy, Strategy::DateLabel);
        assert_eq!(config.markup.other_row_class, "staffRow");
        assert_eq!(config.markup.self_row_class, "current");
        assert_eq!(config.fetcher.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.poll.interval_secs = 0;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.markup.job_cell = "[[invalid".to_string();
        assert!(matches!(config.validate(), Err(AppError::Selector { .. })));
    }

    #[test]
    fn test_validate_checks_every_markup_selector() {
        let keys: Vec<&str> = Config::default()
            .markup
            .css()
            .iter()
            .map(|(key, _)| *key)
            .collect();
        assert!(keys.contains(&"crew_cell"));

        for key in keys {
            let mut config = Config::default();
            let markup = &mut config.markup;
            let field = match key {
                "header_selector" => &mut markup.header_selector,
                "table_selector" => &mut markup.table_selector,
                "row_selector" => &mut markup.row_selector,
                "address_selector" => &mut markup.address_selector,
                "employee_cell" => &mut markup.employee_cell,
                "employee_phone" => &mut markup.employee_phone,
                "shift_cell" => &mut markup.shift_cell,
                "job_cell" => &mut markup.job_cell,
                "foreman_cell" => &mut markup.foreman_cell,
                "foreman_phone" => &mut markup.foreman_phone,
                "crew_cell" => &mut markup.crew_cell,
                other => panic!("unexpected selector key {other}"),
            };
            *field = "[[bad".to_string();

            assert!(
                matches!(config.validate(), Err(AppError::Selector { .. })),
                "markup.{key} was not validated"
            );
            assert!(crate::services::ScheduleParser::new(&config.markup).is_err());
        }
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("fingerprint".parse::<Strategy>().unwrap(), Strategy::Fingerprint);
        assert_eq!("date".parse::<Strategy>().unwrap(), Strategy::DateLabel);
        assert!("weekly".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_to_toml_round_trips_through_load() {
        let mut config = Config::default();
        config.poll.strategy = Strategy::DateLabel;
        config.notify.ntfy_url = Some("https://ntfy.sh/crew-4".to_string());
        config.markup.crew_cell = "td.crew".to_string();

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.poll.strategy, Strategy::DateLabel);
        assert_eq!(loaded.notify.ntfy_url.as_deref(), Some("https://ntfy.sh/crew-4"));
        assert_eq!(loaded.markup, config.markup);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.fetcher.timeout_secs, 30);
    }
}
