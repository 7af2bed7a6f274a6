//! Per-employee, per-day mutual exclusion.
//!
//! Classification and the duplicate guard read the last punch of the day and
//! then write a new one. Two punches for the same employee and date must not
//! interleave that read and write, so each (employee, date) key gets its own
//! mutex. Different keys never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::models::EmployeeId;

type DayKey = (EmployeeId, NaiveDate);

/// Table of per-(employee, date) locks, created on first use.
#[derive(Debug, Default)]
pub struct DayLocks {
    slots: Mutex<HashMap<DayKey, Arc<Mutex<()>>>>,
}

// The guarded value is `()`, so a poisoned lock holds no broken state.
fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DayLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, employee_id: EmployeeId, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut slots = lock_ignoring_poison(&self.slots);
        Arc::clone(slots.entry((employee_id, date)).or_default())
    }

    /// Runs `f` while holding the lock for (employee, date).
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::engine::DayLocks;
    /// use chrono::NaiveDate;
    ///
    /// let locks = DayLocks::new();
    /// let date = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();
    /// let value = locks.run_exclusive(1, date, || 42);
    /// assert_eq!(value, 42);
    /// ```
    pub fn run_exclusive<T>(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
        f: impl FnOnce() -> T,
    ) -> T {
        let slot = self.slot(employee_id, date);
        let _guard = lock_ignoring_poison(&slot);
        f()
    }

    /// Drops idle locks for dates before `date` and returns how many were
    /// dropped. Locks currently held or awaited are kept.
    pub fn release_before(&self, date: NaiveDate) -> usize {
        let mut slots = lock_ignoring_poison(&self.slots);
        let before = slots.len();
        slots.retain(|(_, day), slot| *day >= date || Arc::strong_count(slot) > 1);
        before - slots.len()
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        lock_ignoring_poison(&self.slots).len()
    }

    /// Returns true if no key has been locked since the last release.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
