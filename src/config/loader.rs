//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings, the employee roster and overtime approvals from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AttendanceConfig, EngineSettings, MAX_TOLERANCE_MINUTES, OvertimeApprovalsConfig,
    RosterConfig,
};

/// Loads and validates attendance configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml              # Tolerance window, end-of-day cutoff, listen address
/// ├── employees.yaml           # Roster with badges and shift schedules
/// └── overtime_approvals.yaml  # Approved overtime days
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Tolerance: {} minutes", loader.settings().tolerance_minutes);
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AttendanceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if a file is missing, is not valid YAML, or holds
    /// values the engine cannot run with (negative tolerance, duplicate or
    /// empty badge ids, duplicate employee ids).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        let roster = Self::load_yaml::<RosterConfig>(&path.join("employees.yaml"))?;
        let approvals =
            Self::load_yaml::<OvertimeApprovalsConfig>(&path.join("overtime_approvals.yaml"))?;

        let config = AttendanceConfig::new(settings, roster.employees, approvals.approvals);
        Self::validate(&config)?;

        Ok(Self { config })
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: AttendanceConfig) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &AttendanceConfig) -> EngineResult<()> {
        let tolerance = config.settings().tolerance_minutes;
        if !(0..=MAX_TOLERANCE_MINUTES).contains(&tolerance) {
            return Err(EngineError::InvalidConfig {
                field: "tolerance_minutes".to_string(),
                message: format!("must be between 0 and {MAX_TOLERANCE_MINUTES}, got {tolerance}"),
            });
        }

        let mut ids = HashSet::new();
        let mut badges = HashSet::new();
        for employee in config.employees() {
            if employee.badge_id.trim().is_empty() {
                return Err(EngineError::InvalidConfig {
                    field: "badge_id".to_string(),
                    message: format!("employee {} has an empty badge id", employee.id),
                });
            }
            if !ids.insert(employee.id) {
                return Err(EngineError::InvalidConfig {
                    field: "id".to_string(),
                    message: format!("employee id {} appears more than once", employee.id),
                });
            }
            if !badges.insert(employee.badge_id.as_str()) {
                return Err(EngineError::InvalidConfig {
                    field: "badge_id".to_string(),
                    message: format!("badge '{}' is assigned more than once", employee.badge_id),
                });
            }
        }

        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AttendanceConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }
}
