//! Environment-driven configuration of the OCR invoker.

use std::{str::FromStr, time::Duration};
use thiserror::Error;

/// Default bound on a single OCR invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which OCR capability to invoke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineConfig {
    /// Built-in fixed results, no external capability
    Test,
    /// Spawn `program` with `args` for every image
    Process { program: String, args: Vec<String> },
    /// POST every image to `url`
    Remote { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerConfig {
    pub engine: EngineConfig,
    pub timeout: Duration,
    /// Normalize production output into VIN candidates
    pub vin_filter: bool,
    /// Answer from the test engine when the real one is unavailable
    pub fallback: bool,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::Test,
            timeout: DEFAULT_TIMEOUT,
            vin_filter: true,
            fallback: false,
        }
    }
}

impl InvokerConfig {
    /// Reads the configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let engine = match lookup("OCR_ENGINE").as_deref().map(str::trim) {
            None | Some("") | Some("test") => EngineConfig::Test,
            Some("process") => EngineConfig::Process {
                program: required(&lookup, "OCR_COMMAND")?,
                args: lookup("OCR_ARGS")
                    .map(|args| args.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
            },
            Some("remote") => EngineConfig::Remote {
                url: required(&lookup, "OCR_URL")?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "OCR_ENGINE",
                    value: other.to_string(),
                    reason: "expected one of test, process, remote".to_string(),
                });
            }
        };

        let defaults = Self::default();
        let timeout = parse_var::<u64>(&lookup, "OCR_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        if timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "OCR_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }

        Ok(Self {
            engine,
            timeout,
            vin_filter: parse_flag(&lookup, "OCR_VIN_FILTER")?.unwrap_or(defaults.vin_filter),
            fallback: parse_flag(&lookup, "OCR_FALLBACK")?.unwrap_or(defaults.fallback),
        })
    }
}

/// Fetches a non-empty variable or fails with [`ConfigError::Missing`]
pub fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Parses an optional variable with its [`FromStr`] implementation
pub fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    lookup(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Parses an optional boolean variable (`true`/`false`, `1`/`0`, `yes`/`no`)
pub fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    lookup(key)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: "expected a boolean".to_string(),
            }),
        })
        .transpose()
}
