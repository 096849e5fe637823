use serde::Serialize;
use std::{env::VarError, num::NonZeroUsize, str::FromStr, time::Duration};
use thiserror::Error;

const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_CAPACITY: usize = 32;
const DEFAULT_LIMIT: u32 = 10;
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable `RESOURCE_API_URL` is unable to be retrieved: {0:#?}")]
    RetrieveApiUrl(VarError),

    #[error("environment variable `{key}` is unable to be retrieved: {source:#?}")]
    RetrieveVariable { key: &'static str, source: VarError },

    #[error("environment variable `{key}` has an invalid value `{value}`")]
    InvalidValue { key: &'static str, value: String },
}

/// When edits to the filter and sort controls reach the backend.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    /// Edits stay pending until the user applies them.
    #[default]
    Explicit,
    /// Every edit is applied and fetched right away.
    Immediate,
}

impl FromStr for ApplyMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explicit" => Ok(ApplyMode::Explicit),
            "immediate" => Ok(ApplyMode::Immediate),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Every fetch goes to the backend.
    Disabled,
    Enabled { ttl: Duration, capacity: NonZeroUsize },
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub api_timeout: Duration,
    pub apply_mode: ApplyMode,
    pub cache_mode: CacheMode,
    pub default_limit: u32,
    /// How long a console session may sit unused before it is dropped.
    pub session_ttl: Duration,
    pub port: u16,
}

impl ConsoleConfig {
    pub fn init() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, VarError>,
    ) -> Result<Self, ConfigError> {
        let api_url = lookup("RESOURCE_API_URL").map_err(ConfigError::RetrieveApiUrl)?;

        let api_timeout = Duration::from_secs(parse_or(
            &lookup,
            "RESOURCE_API_TIMEOUT_SECS",
            DEFAULT_API_TIMEOUT_SECS,
        )?);
        let apply_mode = parse_or(&lookup, "CONSOLE_APPLY_MODE", ApplyMode::default())?;

        let cache_ttl = parse_or(&lookup, "CONSOLE_CACHE_TTL_SECS", 0u64)?;
        let cache_capacity = parse_or(&lookup, "CONSOLE_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;
        let cache_mode = match (cache_ttl, NonZeroUsize::new(cache_capacity)) {
            (0, _) | (_, None) => CacheMode::Disabled,
            (ttl, Some(capacity)) => CacheMode::Enabled {
                ttl: Duration::from_secs(ttl),
                capacity,
            },
        };

        let default_limit = parse_or(&lookup, "CONSOLE_DEFAULT_LIMIT", DEFAULT_LIMIT)?;
        if default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CONSOLE_DEFAULT_LIMIT",
                value: "0".to_owned(),
            });
        }

        let session_ttl = parse_or(
            &lookup,
            "CONSOLE_SESSION_TTL_SECS",
            DEFAULT_SESSION_TTL_SECS,
        )?;
        if session_ttl == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CONSOLE_SESSION_TTL_SECS",
                value: "0".to_owned(),
            });
        }

        let port = parse_or(&lookup, "CONSOLE_PORT", DEFAULT_PORT)?;

        Ok(Self {
            api_url,
            api_timeout,
            apply_mode,
            cache_mode,
            default_limit,
            session_ttl: Duration::from_secs(session_ttl),
            port,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: impl Fn(&str) -> Result<String, VarError>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(VarError::NotPresent) => Ok(default),
        Err(source) => Err(ConfigError::RetrieveVariable { key, source }),
    }
}
