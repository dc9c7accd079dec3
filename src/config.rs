use std::path::PathBuf;

use anyhow::{bail, Result};

pub const LOG_VAR: &str = "RPNCALC_LOG";
pub const LOG_FILE_VAR: &str = "RPNCALC_LOG_FILE";
pub const DETAILS_VAR: &str = "RPNCALC_DETAILS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directives; logging is off when unset.
    pub log_filter: Option<String>,
    pub log_file: Option<PathBuf>,
    /// Start every evaluation in `details` mode.
    pub details: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let details = match non_empty(DETAILS_VAR) {
            Some(value) => parse_bool(DETAILS_VAR, &value)?,
            None => false,
        };

        Ok(Config {
            log_filter: non_empty(LOG_VAR),
            log_file: non_empty(LOG_FILE_VAR).map(PathBuf::from),
            details,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be a boolean, got '{}'", key, other),
    }
}
