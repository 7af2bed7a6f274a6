//! Storage collaborator contract.
//!
//! The engine reads employees, punches and overtime approvals and appends
//! punches through [`AttendanceStore`]. Adapters for real databases implement
//! the same trait; [`InMemoryStore`] backs tests and the bundled server.

mod memory;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{Employee, EmployeeId, OvertimeApproval, PunchEvent, PunchType, ShiftWindow};

pub use memory::InMemoryStore;

/// Type of the last punch of the day.
///
/// Classification, the duplicate guard and the defaulter sweep all read the
/// day's history through this one accessor.
pub fn last_punch_type(
    store: &dyn AttendanceStore,
    employee_id: EmployeeId,
    date: NaiveDate,
) -> EngineResult<Option<PunchType>> {
    Ok(store
        .find_last_punch(employee_id, date)?
        .map(|punch| punch.punch_type))
}

/// Read/write contract the engine needs from persistent storage.
///
/// Every method may fail with
/// [`EngineError::StorageUnavailable`](crate::error::EngineError::StorageUnavailable);
/// adapters talking to remote systems are expected to bound their calls with
/// timeouts and report expiry through that variant.
pub trait AttendanceStore: Send + Sync {
    /// Finds the employee carrying a badge, active or not.
    fn find_employee_by_badge(&self, badge_id: &str) -> EngineResult<Option<Employee>>;

    /// Lists active employees ordered by ascending id.
    fn list_active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Returns the punch with the greatest timestamp on `date`.
    ///
    /// When several punches share that timestamp the most recently inserted
    /// one is returned.
    fn find_last_punch(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> EngineResult<Option<PunchEvent>>;

    /// Appends a punch to the ledger.
    fn insert_punch(&self, punch: PunchEvent) -> EngineResult<()>;

    /// Returns an approved overtime record for the employee and date, if any.
    fn find_overtime_approval(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> EngineResult<Option<OvertimeApproval>>;

    /// Lists the punches on `date` in ascending timestamp order, insertion
    /// order breaking ties.
    fn list_punches_for_day(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> EngineResult<Vec<PunchEvent>>;

    /// Returns the scheduled shift of an employee.
    fn shift_window(&self, employee_id: EmployeeId) -> EngineResult<Option<ShiftWindow>>;
}
