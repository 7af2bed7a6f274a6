//! Configuration loading and management for the attendance engine.
//!
//! This module loads engine settings, the employee roster and overtime
//! approvals from a directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Roster size: {}", config.config().employees().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceConfig, DEFAULT_TOLERANCE_MINUTES, EngineSettings, MAX_TOLERANCE_MINUTES,
    OvertimeApprovalsConfig, RosterConfig,
};
