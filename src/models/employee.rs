//! Employee model and shift schedule.
//!
//! This module defines the Employee struct and the ShiftWindow it is
//! scheduled against.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Identifier of an employee record.
pub type EmployeeId = u64;

/// A scheduled shift as a pair of times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    /// Scheduled start of the shift.
    pub start: NaiveTime,
    /// Scheduled end of the shift.
    pub end: NaiveTime,
}

impl ShiftWindow {
    /// Creates a shift window from its start and end times.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// Represents an employee who punches with a badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Badge identifier scanned at the reader. Unique across the roster.
    pub badge_id: String,
    /// Inactive employees cannot punch.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Scheduled shift start time of day.
    pub shift_start_time: NaiveTime,
    /// Scheduled shift end time of day.
    pub shift_end_time: NaiveTime,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns the employee's scheduled shift window.
    pub fn shift_window(&self) -> ShiftWindow {
        ShiftWindow::new(self.shift_start_time, self.shift_end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": 1,
            "badge_id": "123456",
            "is_active": true,
            "shift_start_time": "09:00:00",
            "shift_end_time": "17:00:00"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, 1);
        assert_eq!(employee.badge_id, "123456");
        assert!(employee.is_active);
        assert_eq!(employee.shift_start_time, time(9, 0));
        assert_eq!(employee.shift_end_time, time(17, 0));
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let json = r#"{
            "id": 2,
            "badge_id": "654321",
            "shift_start_time": "22:00:00",
            "shift_end_time": "06:00:00"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(employee.is_active);
    }

    #[test]
    fn test_shift_window_matches_schedule() {
        let employee = Employee {
            id: 1,
            badge_id: "123456".to_string(),
            is_active: true,
            shift_start_time: time(9, 0),
            shift_end_time: time(17, 0),
        };

        let window = employee.shift_window();
        assert_eq!(window.start, time(9, 0));
        assert_eq!(window.end, time(17, 0));
    }
}
