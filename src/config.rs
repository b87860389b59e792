//! Configuration, loaded once at startup.
//!
//! Settings come from an optional TOML file; credentials come from the
//! environment (a `.env` file in the working directory is honoured).
//!
//! # Configuration file format
//!
//! review-watch looks for `.review-watch/config.toml` by default (override
//! with `--config`). Every key is optional.
//!
//! ```toml
//! # How often to poll the status endpoint, in seconds (default: 600).
//! poll_interval_secs = 600
//!
//! # Status endpoint (default: the Practicum homework status API).
//! endpoint = "https://practicum.yandex.ru/api/user_api/homework_statuses/"
//!
//! # Request timeout in seconds. Omit to use the HTTP client default.
//! # request_timeout_secs = 30
//!
//! # Telegram Bot API base URL.
//! telegram_api_base = "https://api.telegram.org"
//!
//! [log]
//! level = "info"      # overridden by RUST_LOG
//! file  = "main.log"  # "" logs to the console only
//! ```
//!
//! # Environment
//!
//! - `PRACTICUM_TOKEN`: OAuth token for the status endpoint.
//! - `TELEGRAM_TOKEN`: bot token.
//! - `TELEGRAM_CHAT_ID`: numeric id of the chat that receives notifications.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Startup configuration failures. These are the only fatal errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),

    #[error("TELEGRAM_CHAT_ID must be an integer chat id, got {0:?}")]
    InvalidChatId(String),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Non-secret settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Seconds to sleep between polls (default: 600).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Status endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout. `None` keeps the HTTP client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Telegram Bot API base URL, without trailing slash.
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-only log file. An empty path disables file logging.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            endpoint: default_endpoint(),
            request_timeout_secs: None,
            telegram_api_base: default_telegram_api_base(),
            log: LogConfig::default(),
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log warnings for settings that are legal but probably unintended.
    pub fn validate(&self) {
        if self.poll_interval_secs == 0 {
            tracing::warn!(
                "poll_interval_secs is 0, the endpoint will be polled as fast as possible"
            );
        }
        if self.request_timeout_secs == Some(0) {
            tracing::warn!("request_timeout_secs is 0, every request will time out");
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Secrets and the destination chat, read from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: i64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`. Empty values count as missing, and
    /// every missing name is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let practicum_token = read(PRACTICUM_TOKEN_VAR);
        let telegram_token = read(TELEGRAM_TOKEN_VAR);
        let chat_id = read(TELEGRAM_CHAT_ID_VAR);

        let missing: Vec<&'static str> = [
            (PRACTICUM_TOKEN_VAR, practicum_token.is_none()),
            (TELEGRAM_TOKEN_VAR, telegram_token.is_none()),
            (TELEGRAM_CHAT_ID_VAR, chat_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(practicum_token), Some(telegram_token), Some(chat_id)) =
            (practicum_token, telegram_token, chat_id)
        else {
            return Err(ConfigError::MissingVars(missing));
        };

        let telegram_chat_id = chat_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidChatId(chat_id.clone()))?;

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

fn default_poll_interval() -> u64 {
    600
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("main.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_credentials_all_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("PRACTICUM_TOKEN", "p-token"),
            ("TELEGRAM_TOKEN", "t-token"),
            ("TELEGRAM_CHAT_ID", "563177556"),
        ]))
        .unwrap();
        assert_eq!(creds.practicum_token, "p-token");
        assert_eq!(creds.telegram_token, "t-token");
        assert_eq!(creds.telegram_chat_id, 563177556);
    }

    #[test]
    fn test_credentials_report_every_missing_var() {
        let err = Credentials::from_lookup(lookup_from(&[("TELEGRAM_TOKEN", "t")])).unwrap_err();
        match err {
            ConfigError::MissingVars(names) => {
                assert_eq!(names, vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
            }
            other => panic!("expected MissingVars, got {other:?}"),
        }
    }

    #[test]
    fn test_credentials_empty_value_is_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("PRACTICUM_TOKEN", ""),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "1"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PRACTICUM_TOKEN"));
    }

    #[test]
    fn test_credentials_reject_non_numeric_chat_id() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "@mychannel"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChatId(ref v) if v == "@mychannel"));
    }

    #[test]
    fn test_credentials_debug_hides_tokens() {
        let creds = Credentials {
            practicum_token: "secret-p".into(),
            telegram_token: "secret-t".into(),
            telegram_chat_id: 7,
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: WatchConfig = toml::from_str("").unwrap();
        assert_eq!(config.poll_interval_secs, 600);
        assert!(config.endpoint.contains("homework_statuses"));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log.file, PathBuf::from("main.log"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: WatchConfig = toml::from_str(
            r#"
poll_interval_secs = 30
request_timeout_secs = 10

[log]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.telegram_api_base, "https://api.telegram.org");
    }
}
