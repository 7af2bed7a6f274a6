//! In-memory implementation of the storage contract.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::config::AttendanceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeId, OvertimeApproval, PunchEvent, ShiftWindow};

use super::AttendanceStore;

/// A process-local store holding the roster, approvals and punch ledger.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Employee;
/// use attendance_engine::storage::{AttendanceStore, InMemoryStore};
/// use chrono::NaiveTime;
///
/// let store = InMemoryStore::new();
/// store.add_employee(Employee {
///     id: 1,
///     badge_id: "123456".to_string(),
///     is_active: true,
///     shift_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     shift_end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
/// })?;
///
/// let found = store.find_employee_by_badge("123456")?;
/// assert_eq!(found.map(|e| e.id), Some(1));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    employees: RwLock<Vec<Employee>>,
    approvals: RwLock<Vec<OvertimeApproval>>,
    punches: RwLock<Vec<PunchEvent>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the configured roster and approvals.
    pub fn from_config(config: &AttendanceConfig) -> Self {
        Self {
            employees: RwLock::new(config.employees().to_vec()),
            approvals: RwLock::new(config.approvals().to_vec()),
            punches: RwLock::new(Vec::new()),
        }
    }

    /// Adds an employee, replacing any record with the same id.
    ///
    /// Fails with `InvalidConfig` if another employee already carries the
    /// badge.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<()> {
        let mut employees = write(&self.employees)?;
        if let Some(holder) = employees
            .iter()
            .find(|e| e.badge_id == employee.badge_id && e.id != employee.id)
        {
            return Err(EngineError::InvalidConfig {
                field: "badge_id".to_string(),
                message: format!(
                    "badge '{}' is already assigned to employee {}",
                    employee.badge_id, holder.id
                ),
            });
        }
        employees.retain(|e| e.id != employee.id);
        employees.push(employee);
        employees.sort_by_key(|e| e.id);
        Ok(())
    }

    /// Records an overtime decision.
    pub fn add_overtime_approval(&self, approval: OvertimeApproval) -> EngineResult<()> {
        write(&self.approvals)?.push(approval);
        Ok(())
    }

    /// Returns a copy of the whole ledger in insertion order.
    pub fn punches(&self) -> EngineResult<Vec<PunchEvent>> {
        Ok(read(&self.punches)?.clone())
    }
}

fn read<T>(lock: &RwLock<T>) -> EngineResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| EngineError::storage("in-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> EngineResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| EngineError::storage("in-memory store lock poisoned"))
}

impl AttendanceStore for InMemoryStore {
    fn find_employee_by_badge(&self, badge_id: &str) -> EngineResult<Option<Employee>> {
        Ok(read(&self.employees)?
            .iter()
            .find(|e| e.badge_id == badge_id)
            .cloned())
    }

    fn list_active_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(read(&self.employees)?
            .iter()
            .filter(|e| e.is_active)
            .cloned()
            .collect())
    }

    fn find_last_punch(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> EngineResult<Option<PunchEvent>> {
        // max_by_key keeps the last of equal maxima, i.e. the latest insert.
        Ok(read(&self.punches)?
            .iter()
            .filter(|p| p.employee_id == employee_id && p.date() == date)
            .max_by_key(|p| p.timestamp)
            .cloned())
    }

    fn insert_punch(&self, punch: PunchEvent) -> EngineResult<()> {
        write(&self.punches)?.push(punch);
        Ok(())
    }

    fn find_overtime_approval(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> EngineResult<Option<OvertimeApproval>> {
        Ok(read(&self.approvals)?
            .iter()
            .find(|a| a.approves(employee_id, date))
            .cloned())
    }

    fn list_punches_for_day(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> EngineResult<Vec<PunchEvent>> {
        let mut punches: Vec<PunchEvent> = read(&self.punches)?
            .iter()
            .filter(|p| p.employee_id == employee_id && p.date() == date)
            .cloned()
            .collect();
        punches.sort_by_key(|p| p.timestamp);
        Ok(punches)
    }

    fn shift_window(&self, employee_id: EmployeeId) -> EngineResult<Option<ShiftWindow>> {
        Ok(read(&self.employees)?
            .iter()
            .find(|e| e.id == employee_id)
            .map(Employee::shift_window))
    }
}
