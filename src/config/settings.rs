//! Application settings loaded from config.toml.
//!
//! Everything has a sensible default so the binary runs without a config
//! file; the file only needs to exist when a deployment overrides something.

use crate::core::attendance::AttendancePolicy;
use crate::errors::{Error, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Database URL override; `DATABASE_URL` in the environment wins
    pub database_url: Option<String>,
    /// Attendance policy overrides
    #[serde(default)]
    pub attendance: AttendanceConfig,
    /// Username of the bootstrap admin account
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
}

/// Attendance section of config.toml
#[derive(Debug, Deserialize)]
pub struct AttendanceConfig {
    /// Workday start as `HH:MM`
    #[serde(default = "default_workday_start")]
    pub workday_start: String,
    /// Minutes of delay tolerated without penalty
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,
}

fn default_workday_start() -> String {
    "09:00".to_string()
}

const fn default_grace_minutes() -> i64 {
    15
}

fn default_admin_username() -> String {
    "admin".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            attendance: AttendanceConfig::default(),
            admin_username: default_admin_username(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            workday_start: default_workday_start(),
            grace_minutes: default_grace_minutes(),
        }
    }
}

impl AttendanceConfig {
    /// Builds the runtime policy from the configured strings.
    ///
    /// # Errors
    /// Returns a config error for an unparseable `workday_start`.
    pub fn to_policy(&self) -> Result<AttendancePolicy> {
        let workday_start = NaiveTime::parse_from_str(&self.workday_start, "%H:%M")
            .map_err(|e| Error::Config {
                message: format!("invalid workday_start '{}': {e}", self.workday_start),
            })?;
        Ok(AttendancePolicy {
            workday_start,
            grace_minutes: self.grace_minutes,
        })
    }
}

/// Loads application configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from the default location (./config.toml), falling
/// back to the built-in defaults when the file is absent.
pub fn load_default_config() -> Result<AppConfig> {
    if Path::new("config.toml").exists() {
        load_config("config.toml")
    } else {
        Ok(AppConfig::default())
    }
}
