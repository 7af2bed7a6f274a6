//! End-of-day defaulter sweep.
//!
//! Employees whose last punch of the day is IN-like never punched out. The
//! sweep closes their day with a synthetic DEFAULTER record at the cutoff,
//! which the hours aggregator later settles against the scheduled shift end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::EngineResult;
use crate::models::{Employee, EmployeeId, PunchEvent};
use crate::storage::{AttendanceStore, last_punch_type};

use super::alert::{Alert, AlertSink};
use super::day_lock::DayLocks;

/// One employee the fleet sweep could not handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    /// The employee whose sweep failed.
    pub employee_id: EmployeeId,
    /// The error message.
    pub message: String,
    /// Whether retrying the employee may succeed.
    pub retryable: bool,
}

/// Outcome of a fleet-wide sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// The cutoff the sweep ran with.
    pub cutoff: NaiveDateTime,
    /// Number of employees examined before completion or cancellation.
    pub examined: usize,
    /// Employees closed with a DEFAULTER record.
    pub closed: Vec<EmployeeId>,
    /// Employees whose sweep failed; the rest of the roster still ran.
    pub failures: Vec<SweepFailure>,
    /// True if the sweep stopped early on request.
    pub cancelled: bool,
    /// Last employee id handled, to pass back when resuming a cancelled sweep.
    pub resume_after: Option<EmployeeId>,
}

impl SweepReport {
    fn new(cutoff: NaiveDateTime) -> Self {
        Self {
            cutoff,
            examined: 0,
            closed: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
            resume_after: None,
        }
    }

    /// Returns true if every examined employee was handled without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Closes open days with DEFAULTER records.
#[derive(Clone)]
pub struct DefaulterSweep {
    store: Arc<dyn AttendanceStore>,
    alerts: Arc<dyn AlertSink>,
    locks: Arc<DayLocks>,
}

impl DefaulterSweep {
    /// Creates a sweep over the given store, sharing `locks` with the punch
    /// processor.
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        alerts: Arc<dyn AlertSink>,
        locks: Arc<DayLocks>,
    ) -> Self {
        Self {
            store,
            alerts,
            locks,
        }
    }

    /// Closes the employee's day at `cutoff` if the last punch on the
    /// cutoff's date is IN-like.
    ///
    /// Returns true when a DEFAULTER record was inserted. Running it again on
    /// the same day is a no-op because DEFAULTER is not IN-like.
    pub fn sweep_one(&self, employee: &Employee, cutoff: NaiveDateTime) -> EngineResult<bool> {
        self.locks.run_exclusive(employee.id, cutoff.date(), || {
            self.close_if_open(employee.id, cutoff)
        })
    }

    /// Sweep body; the caller must hold the day lock for (employee, cutoff date).
    pub(crate) fn close_if_open(
        &self,
        employee_id: EmployeeId,
        cutoff: NaiveDateTime,
    ) -> EngineResult<bool> {
        let last = last_punch_type(self.store.as_ref(), employee_id, cutoff.date())?;
        if !last.is_some_and(|t| t.is_in_like()) {
            return Ok(false);
        }

        self.store
            .insert_punch(PunchEvent::defaulter(employee_id, cutoff))?;
        warn!(employee_id, cutoff = %cutoff, "Defaulter punch recorded");
        self.alerts.raise(Alert::missing_out_punch(employee_id, cutoff));
        Ok(true)
    }

    /// Sweeps every active employee, see [`DefaulterSweep::resume_sweep`].
    pub fn sweep_all(
        &self,
        cutoff: NaiveDateTime,
        cancel: &AtomicBool,
    ) -> EngineResult<SweepReport> {
        self.resume_sweep(cutoff, None, cancel)
    }

    /// Sweeps active employees with ids greater than `resume_after`, in
    /// ascending id order.
    ///
    /// A failure for one employee is recorded in the report and the sweep
    /// moves on. `cancel` is checked before each employee; when it is set the
    /// sweep stops and the report's `resume_after` says where to pick up.
    /// Only a failure to list the roster fails the whole call.
    pub fn resume_sweep(
        &self,
        cutoff: NaiveDateTime,
        resume_after: Option<EmployeeId>,
        cancel: &AtomicBool,
    ) -> EngineResult<SweepReport> {
        info!(cutoff = %cutoff, resume_after = ?resume_after, "Running end-of-day defaulter sweep");

        let roster = self.store.list_active_employees()?;
        let mut report = SweepReport::new(cutoff);
        report.resume_after = resume_after;

        for employee in roster
            .iter()
            .filter(|e| resume_after.is_none_or(|after| e.id > after))
        {
            if cancel.load(Ordering::SeqCst) {
                report.cancelled = true;
                break;
            }

            report.examined += 1;
            match self.sweep_one(employee, cutoff) {
                Ok(true) => report.closed.push(employee.id),
                Ok(false) => {}
                Err(err) => {
                    error!(employee_id = employee.id, error = %err, "Defaulter sweep failed for employee");
                    report.failures.push(SweepFailure {
                        employee_id: employee.id,
                        message: err.to_string(),
                        retryable: err.is_retryable(),
                    });
                }
            }
            report.resume_after = Some(employee.id);
        }

        if report.cancelled {
            warn!(
                examined = report.examined,
                resume_after = ?report.resume_after,
                "Defaulter sweep cancelled"
            );
        } else {
            report.resume_after = None;
            let released = self.locks.release_before(cutoff.date());
            info!(
                examined = report.examined,
                closed = report.closed.len(),
                failed = report.failures.len(),
                released_locks = released,
                "Defaulter sweep completed"
            );
        }

        Ok(report)
    }
}
