//! Core runtime configuration.
//!
//! Resolved once at startup and passed into the core explicitly. Nothing in
//! the core reads process environment while handling a request.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default cap on the discharged-patients scan.
pub const DEFAULT_PATIENT_SCAN_LIMIT: usize = 10_000;

/// Default currency symbol for exports.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

pub const ENV_DB_PATH: &str = "HOSPITAL_DB_PATH";
pub const ENV_PATIENT_SCAN_LIMIT: &str = "HOSPITAL_PATIENT_SCAN_LIMIT";
pub const ENV_CURRENCY_SYMBOL: &str = "HOSPITAL_CURRENCY_SYMBOL";

/// Configuration errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    database_path: PathBuf,
    patient_scan_limit: usize,
    currency_symbol: String,
}

impl CoreConfig {
    pub fn new(
        database_path: PathBuf,
        patient_scan_limit: usize,
        currency_symbol: String,
    ) -> ConfigResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing(ENV_DB_PATH));
        }
        if patient_scan_limit == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_PATIENT_SCAN_LIMIT,
                value: "0".into(),
            });
        }

        Ok(Self {
            database_path,
            patient_scan_limit,
            currency_symbol,
        })
    }

    /// Build from optional raw values; blank values fall back to defaults.
    ///
    /// The caller decides where the values come from (env, settings file, FFI).
    pub fn from_env_values(
        database_path: Option<String>,
        patient_scan_limit: Option<String>,
        currency_symbol: Option<String>,
    ) -> ConfigResult<Self> {
        let database_path =
            non_blank(database_path).ok_or(ConfigError::Missing(ENV_DB_PATH))?;

        let patient_scan_limit = match non_blank(patient_scan_limit) {
            Some(raw) => raw.parse::<usize>().map_err(|_| ConfigError::Invalid {
                key: ENV_PATIENT_SCAN_LIMIT,
                value: raw.clone(),
            })?,
            None => DEFAULT_PATIENT_SCAN_LIMIT,
        };

        let currency_symbol =
            non_blank(currency_symbol).unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());

        Self::new(
            PathBuf::from(database_path),
            patient_scan_limit,
            currency_symbol,
        )
    }

    /// Read the `HOSPITAL_*` variables. Call once at startup.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_values(
            std::env::var(ENV_DB_PATH).ok(),
            std::env::var(ENV_PATIENT_SCAN_LIMIT).ok(),
            std::env::var(ENV_CURRENCY_SYMBOL).ok(),
        )
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn patient_scan_limit(&self) -> usize {
        self.patient_scan_limit
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
