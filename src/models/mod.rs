//! Core data models for the attendance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod overtime;
mod punch;
mod work_hours;

pub use employee::{Employee, EmployeeId, ShiftWindow};
pub use overtime::OvertimeApproval;
pub use punch::{PunchDirection, PunchEvent, PunchType};
pub use work_hours::WorkHoursSummary;
