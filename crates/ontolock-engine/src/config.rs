//! Gate configuration from the environment.
//!
//! [`GateConfig::load`] merges an optional env file with the process
//! environment (process wins) and hands the result to the pure
//! [`GateConfig::from_kv`], which is what tests call.

#![allow(clippy::result_large_err)]

use ontolock_core::errors::{ExError, ExErrorKind};
use ontolock_core::gate::Mode;
use ontolock_core::logging_facility::Profile;
use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_MODE: &str = "ONTOLOCK_MODE";
pub const ENV_LOCK_DIR: &str = "ONTOLOCK_LOCK_DIR";
pub const ENV_AUTO_APPROVE: &str = "ONTOLOCK_AUTO_APPROVE";
pub const ENV_LOG_FORMAT: &str = "ONTOLOCK_LOG_FORMAT";
pub const ENV_FILE: &str = "ONTOLOCK_ENV_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub mode: Mode,
    /// Directory holding `ontology.lock.json`
    pub lock_dir: PathBuf,
    /// Write the lock on drift without asking (development only)
    pub auto_approve: bool,
    pub log_profile: Profile,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Production,
            lock_dir: PathBuf::from("."),
            auto_approve: false,
            log_profile: Profile::Production,
        }
    }
}

impl GateConfig {
    /// Load from `ONTOLOCK_ENV_FILE` (if set) overlaid by the process environment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the env file cannot be read or any value is invalid.
    pub fn load() -> Result<Self, ExError> {
        let mut merged = HashMap::new();

        if let Ok(env_file) = std::env::var(ENV_FILE) {
            let env_file = env_file.trim();
            if !env_file.is_empty() {
                merged.extend(parse_env_file(env_file)?);
            }
        }

        merged.extend(std::env::vars());

        Self::from_kv(&merged)
    }

    /// Build a configuration from key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for unknown modes, unparsable booleans, an
    /// unknown log format, or auto-approve combined with production mode.
    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, ExError> {
        let mode = match non_empty(kv, ENV_MODE) {
            Some(value) => value.parse::<Mode>()?,
            None => Mode::Production,
        };

        let lock_dir = non_empty(kv, ENV_LOCK_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let auto_approve = match non_empty(kv, ENV_AUTO_APPROVE) {
            Some(value) => parse_bool(value).ok_or_else(|| {
                invalid_config(format!(
                    "{} must be a boolean (true/false/1/0), got '{}'",
                    ENV_AUTO_APPROVE, value
                ))
            })?,
            None => false,
        };
        if auto_approve && mode == Mode::Production {
            return Err(invalid_config(format!(
                "{} is not allowed in production mode",
                ENV_AUTO_APPROVE
            )));
        }

        let log_profile = match non_empty(kv, ENV_LOG_FORMAT) {
            Some("pretty") => Profile::Development,
            Some("json") => Profile::Production,
            Some(other) => {
                return Err(invalid_config(format!(
                    "{} must be 'pretty' or 'json', got '{}'",
                    ENV_LOG_FORMAT, other
                )))
            }
            None => match mode {
                Mode::Development => Profile::Development,
                Mode::Production => Profile::Production,
            },
        };

        Ok(Self {
            mode,
            lock_dir,
            auto_approve,
            log_profile,
        })
    }
}

fn non_empty<'a>(kv: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    kv.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

fn parse_env_file(path: &str) -> Result<HashMap<String, String>, ExError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        invalid_config(format!("failed to read env file at {}: {}", path, e)).with_path(path)
    })?;

    let mut kv = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| {
            invalid_config(format!("failed to parse env file at {}: {}", path, e)).with_path(path)
        })?;
        kv.insert(key, value);
    }
    Ok(kv)
}

fn invalid_config(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_config")
        .with_message(message)
}
