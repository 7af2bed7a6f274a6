//! Overtime approval model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;

/// A manager's decision on overtime for one employee and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeApproval {
    /// The employee the approval applies to.
    pub employee_id: EmployeeId,
    /// The calendar date the approval covers.
    pub date: NaiveDate,
    /// Only approved records open the overtime gate.
    pub is_approved: bool,
}

impl OvertimeApproval {
    /// Returns true if this record approves overtime for the employee on the date.
    pub fn approves(&self, employee_id: EmployeeId, date: NaiveDate) -> bool {
        self.is_approved && self.employee_id == employee_id && self.date == date
    }
}
