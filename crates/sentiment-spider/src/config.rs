use crate::error::ConfigError;
use crate::http::*;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::trace;

/// Reddit sentiment endpoint; one request per `?date=YYYY-MM-DD`.
pub const DEFAULT_API_URL: &str = "https://tradestie.com/api/v1/apps/reddit";

pub const DEFAULT_LOG_PATH: &str = "results/sentiment.txt";

pub const DEFAULT_USER_AGENT: &str = concat!("sentiment-spider/", env!("CARGO_PKG_VERSION"));

/// Where progress lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
}

impl FromStr for SinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "stdout" => Ok(SinkKind::Console),
            "file" => Ok(SinkKind::File),
            _ => Err(ConfigError::UnknownSink(s.to_string())),
        }
    }
}

/// Run settings, read from the environment (and `.env`, when present).
///
/// | variable             | default                  |
/// |----------------------|--------------------------|
/// | `SENTIMENT_API_URL`  | [`DEFAULT_API_URL`]      |
/// | `SENTIMENT_LOG_SINK` | `file`                   |
/// | `SENTIMENT_LOG_PATH` | [`DEFAULT_LOG_PATH`]     |
/// | `USER_AGENT`         | [`DEFAULT_USER_AGENT`]   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub sink: SinkKind,
    pub log_path: PathBuf,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            sink: SinkKind::File,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Build a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            api_url: lookup("SENTIMENT_API_URL").unwrap_or(defaults.api_url),
            sink: match lookup("SENTIMENT_LOG_SINK") {
                Some(sink) => sink.parse()?,
                None => defaults.sink,
            },
            log_path: lookup("SENTIMENT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
        };
        trace!("configuration loaded: {config:?}");
        Ok(config)
    }

    pub fn http_client(&self) -> Result<HttpClient, ConfigError> {
        Ok(reqwest::ClientBuilder::new()
            .user_agent(&self.user_agent)
            .build()?)
    }
}
