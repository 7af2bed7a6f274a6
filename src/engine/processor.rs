//! Punch processing.
//!
//! This module orchestrates one badge scan: resolve the employee, classify
//! the punch against the shift and the day's last punch, apply the duplicate
//! and overtime rules, persist, and close the day when the scan arrives at
//! the end-of-day cutoff.

use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use tracing::{debug, error, info, warn};

use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PunchEvent, PunchType};
use crate::storage::{AttendanceStore, last_punch_type};

use super::alert::{Alert, AlertSink};
use super::classifier::{ClassificationInput, classify_punch};
use super::day_lock::DayLocks;
use super::defaulter::DefaulterSweep;

/// Returns true if `next` points the same direction as `last`.
///
/// # Examples
///
/// ```
/// use attendance_engine::engine::is_duplicate;
/// use attendance_engine::models::PunchType;
///
/// assert!(is_duplicate(PunchType::In, PunchType::LateIn));
/// assert!(is_duplicate(PunchType::Out, PunchType::OvertimeOut));
/// assert!(!is_duplicate(PunchType::Defaulter, PunchType::In));
/// ```
pub fn is_duplicate(last: PunchType, next: PunchType) -> bool {
    match (last.direction(), next.direction()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Classifies and records badge scans.
#[derive(Clone)]
pub struct PunchProcessor {
    store: Arc<dyn AttendanceStore>,
    alerts: Arc<dyn AlertSink>,
    locks: Arc<DayLocks>,
    sweep: DefaulterSweep,
    settings: EngineSettings,
}

impl PunchProcessor {
    /// Creates a processor and the defaulter sweep it shares locks with.
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        alerts: Arc<dyn AlertSink>,
        settings: EngineSettings,
    ) -> Self {
        let locks = Arc::new(DayLocks::new());
        let sweep = DefaulterSweep::new(Arc::clone(&store), Arc::clone(&alerts), Arc::clone(&locks));
        Self {
            store,
            alerts,
            locks,
            sweep,
            settings,
        }
    }

    /// The defaulter sweep bound to the same store and lock table.
    pub fn sweep(&self) -> &DefaulterSweep {
        &self.sweep
    }

    /// The settings the processor was built with.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns true if a punch at `timestamp` should close out the day.
    pub fn is_end_of_day(&self, timestamp: NaiveDateTime) -> bool {
        timestamp.time() >= self.settings.end_of_day
    }

    /// Processes one badge scan and returns the stored punch.
    ///
    /// Sub-second precision is dropped from `timestamp`. Rejections
    /// (`UnknownBadge`, `UnclassifiedPunch`, `DuplicatePunch`,
    /// `OvertimeNotApproved`) write nothing and raise an alert; storage
    /// failures come back as `StorageUnavailable`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use attendance_engine::config::EngineSettings;
    /// use attendance_engine::engine::{PunchProcessor, TracingAlertSink};
    /// use attendance_engine::models::{Employee, PunchType};
    /// use attendance_engine::storage::InMemoryStore;
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// store.add_employee(Employee {
    ///     id: 1,
    ///     badge_id: "123456".to_string(),
    ///     is_active: true,
    ///     shift_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     shift_end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    /// })?;
    /// let processor = PunchProcessor::new(store, Arc::new(TracingAlertSink), EngineSettings::default());
    ///
    /// let at = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap().and_hms_opt(9, 5, 0).unwrap();
    /// let punch = processor.process("123456", at)?;
    /// assert_eq!(punch.punch_type, PunchType::In);
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn process(&self, badge_id: &str, timestamp: NaiveDateTime) -> EngineResult<PunchEvent> {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);

        let employee = match self.store.find_employee_by_badge(badge_id)? {
            Some(employee) if employee.is_active => employee,
            _ => {
                return Err(self.reject(EngineError::UnknownBadge {
                    badge_id: badge_id.to_string(),
                }));
            }
        };

        self.locks
            .run_exclusive(employee.id, timestamp.date(), || {
                self.record(&employee, timestamp)
            })
    }

    /// Classify-and-insert body; runs under the (employee, date) lock.
    fn record(&self, employee: &Employee, timestamp: NaiveDateTime) -> EngineResult<PunchEvent> {
        let date = timestamp.date();
        let last = last_punch_type(self.store.as_ref(), employee.id, date)?;

        let classification = classify_punch(
            &ClassificationInput {
                shift: employee.shift_window(),
                punch_time: timestamp.time(),
                last_punch: last,
            },
            self.settings.tolerance_minutes,
        );
        let punch_type = classification.punch_type;
        debug!(employee_id = employee.id, last = ?last, punch_type = %punch_type, "Classified punch");

        if punch_type == PunchType::Unknown {
            return Err(self.reject(EngineError::UnclassifiedPunch {
                employee_id: employee.id,
                timestamp,
            }));
        }

        if let Some(last) = last {
            if is_duplicate(last, punch_type) {
                return Err(self.reject(EngineError::DuplicatePunch {
                    employee_id: employee.id,
                    last,
                    attempted: punch_type,
                }));
            }
        }

        if punch_type.is_overtime()
            && self
                .store
                .find_overtime_approval(employee.id, date)?
                .is_none()
        {
            return Err(self.reject(EngineError::OvertimeNotApproved {
                employee_id: employee.id,
                date,
            }));
        }

        let punch = classification.into_punch(employee.id, timestamp);
        self.store.insert_punch(punch.clone())?;
        info!(
            employee_id = employee.id,
            punch_type = %punch.punch_type,
            timestamp = %punch.timestamp,
            lateness_minutes = punch.lateness_minutes,
            earliness_minutes = punch.earliness_minutes,
            "Punch recorded"
        );

        // The punch is already stored; a failed close is left for the fleet sweep.
        if self.is_end_of_day(timestamp) {
            if let Err(err) = self.sweep.close_if_open(employee.id, timestamp) {
                error!(employee_id = employee.id, error = %err, "End-of-day close failed");
            }
        }

        Ok(punch)
    }

    fn reject(&self, error: EngineError) -> EngineError {
        warn!(error = %error, "Punch rejected");
        if let Some(alert) = Alert::for_rejection(&error) {
            self.alerts.raise(alert);
        }
        error
    }
}
