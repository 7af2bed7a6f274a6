//! Configuration types for the attendance engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveTime;
use serde::Deserialize;

use crate::models::{Employee, OvertimeApproval};

/// Default tolerance around scheduled shift boundaries, in minutes.
pub const DEFAULT_TOLERANCE_MINUTES: i64 = 10;

/// Largest tolerance window the loader accepts, in minutes.
pub const MAX_TOLERANCE_MINUTES: i64 = 120;

/// Engine tuning from `engine.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    /// Minutes around shift start/end treated as on time.
    #[serde(default = "default_tolerance_minutes")]
    pub tolerance_minutes: i64,
    /// Punches at or after this time of day trigger the defaulter sweep.
    #[serde(default = "default_end_of_day")]
    pub end_of_day: NaiveTime,
    /// Socket address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_tolerance_minutes() -> i64 {
    DEFAULT_TOLERANCE_MINUTES
}

fn default_end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tolerance_minutes: default_tolerance_minutes(),
            end_of_day: default_end_of_day(),
            listen_addr: default_listen_addr(),
        }
    }
}

/// Roster file structure (`employees.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Every employee known to the directory, active or not.
    pub employees: Vec<Employee>,
}

/// Overtime approvals file structure (`overtime_approvals.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeApprovalsConfig {
    /// Approval decisions, approved or not.
    #[serde(default)]
    pub approvals: Vec<OvertimeApproval>,
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    settings: EngineSettings,
    employees: Vec<Employee>,
    approvals: Vec<OvertimeApproval>,
}

impl AttendanceConfig {
    /// Creates a new AttendanceConfig from its component parts.
    pub fn new(
        settings: EngineSettings,
        employees: Vec<Employee>,
        approvals: Vec<OvertimeApproval>,
    ) -> Self {
        let mut employees = employees;
        employees.sort_by_key(|e| e.id);
        Self {
            settings,
            employees,
            approvals,
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the roster, ordered by employee id.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Returns the overtime approvals.
    pub fn approvals(&self) -> &[OvertimeApproval] {
        &self.approvals
    }
}
