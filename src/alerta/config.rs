use crate::error::{AlertaError, Result};
use crate::pager::DEFAULT_PAGE_SIZE;
use chrono::{FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
pub const HOME_ENV: &str = "ALERTA_HOME";

const DEFAULT_API_URL: &str = "https://alerta-conecta-backend-production.up.railway.app/database";
const DEFAULT_UTC_OFFSET: &str = "-03:00";

pub const KEYS: [&str; 7] = [
    "api-url",
    "page-size",
    "utc-offset",
    "token",
    "occurrences-path",
    "logs-path",
    "profile-path",
];

/// Client configuration, stored as config.json in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AlertaConfig {
    /// Base URL of the dispatch API, without a trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Rows per page in list views
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Offset used to display timestamps (e.g. "-03:00")
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_occurrences_path")]
    pub occurrences_path: String,

    #[serde(default = "default_logs_path")]
    pub logs_path: String,

    #[serde(default = "default_profile_path")]
    pub profile_path: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

fn default_occurrences_path() -> String {
    "occurrence/getall".to_string()
}

fn default_logs_path() -> String {
    "logs/getall".to_string()
}

fn default_profile_path() -> String {
    "user/profile".to_string()
}

impl Default for AlertaConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            utc_offset: default_utc_offset(),
            token: None,
            occurrences_path: default_occurrences_path(),
            logs_path: default_logs_path(),
            profile_path: default_profile_path(),
        }
    }
}

/// `$ALERTA_HOME` if set, else the platform data directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("br", "alertaconecta", "alerta")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| AlertaError::Config("Could not determine config dir".to_string()))
}

impl AlertaConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(AlertaError::Io)?;
        let config: AlertaConfig =
            serde_json::from_str(&content).map_err(AlertaError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(AlertaError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(AlertaError::Serialization)?;
        fs::write(config_path, content).map_err(AlertaError::Io)?;
        Ok(())
    }

    /// Display offset; an unparseable value falls back to -03:00.
    pub fn offset(&self) -> FixedOffset {
        parse_offset(&self.utc_offset).unwrap_or_else(|| {
            tracing::warn!(value = %self.utc_offset, "invalid utc-offset, using -03:00");
            FixedOffset::west_opt(3 * 3600).unwrap_or_else(|| Utc.fix())
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api-url" => Some(self.api_url.clone()),
            "page-size" => Some(self.page_size.to_string()),
            "utc-offset" => Some(self.utc_offset.clone()),
            // The token itself is never echoed back.
            "token" => Some(if self.token.is_some() { "(set)" } else { "(unset)" }.to_string()),
            "occurrences-path" => Some(self.occurrences_path.clone()),
            "logs-path" => Some(self.logs_path.clone()),
            "profile-path" => Some(self.profile_path.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "api-url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(format!("api-url must be an http(s) URL: {}", value));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            "page-size" => {
                self.page_size = match value.parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => return Err(format!("page-size must be a positive number: {}", value)),
                };
            }
            "utc-offset" => {
                if parse_offset(value).is_none() {
                    return Err(format!("utc-offset must look like -03:00: {}", value));
                }
                self.utc_offset = value.to_string();
            }
            "token" => {
                self.token = (!value.is_empty()).then(|| value.to_string());
            }
            "occurrences-path" => self.occurrences_path = value.to_string(),
            "logs-path" => self.logs_path = value.to_string(),
            "profile-path" => self.profile_path = value.to_string(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

/// Parses `±HH:MM`.
pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    value.trim().parse().ok()
}
