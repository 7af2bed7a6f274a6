//! Work-hours aggregation.
//!
//! This module replays one employee's punches for a day into work, break and
//! overtime totals.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeId, PunchEvent, PunchType, WorkHoursSummary};
use crate::storage::AttendanceStore;

const SECONDS_PER_HOUR: i64 = 3600;

/// Converts whole seconds to hours rounded to two decimal places.
///
/// The result always carries a scale of two, so it serializes as `"7.00"`
/// rather than `"7"`.
///
/// # Examples
///
/// ```
/// use attendance_engine::engine::seconds_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(seconds_to_hours(6600), Decimal::new(183, 2));
/// assert_eq!(seconds_to_hours(27000).to_string(), "7.50");
/// ```
pub fn seconds_to_hours(seconds: i64) -> Decimal {
    let mut hours = (Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)).round_dp(2);
    hours.rescale(2);
    hours
}

/// Replays a day's punches, already in ascending order, into hour totals.
///
/// An IN-like punch opens an interval, replacing any interval still open. An
/// OUT-like punch closes the open interval into overtime when it was opened
/// by OVERTIME_IN and into work otherwise. A DEFAULTER punch closes the open
/// interval into work at `shift_end` on the punch's date. That duration is
/// signed: an interval opened after the scheduled end subtracts from work.
/// Closing punches with nothing open are ignored.
///
/// Break hours come from a separate pass: each BREAK_OUT immediately followed
/// by a BREAK_IN adds the gap between them.
///
/// # Examples
///
/// ```
/// use attendance_engine::engine::summarize_punches;
/// use attendance_engine::models::{PunchEvent, PunchType};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();
/// let punch = |punch_type, h| PunchEvent {
///     employee_id: 1,
///     punch_type,
///     timestamp: day.and_hms_opt(h, 0, 0).unwrap(),
///     is_late: false,
///     lateness_minutes: 0,
///     is_early: false,
///     earliness_minutes: 0,
/// };
///
/// let summary = summarize_punches(
///     &[punch(PunchType::In, 9), punch(PunchType::Out, 17)],
///     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
/// );
/// assert_eq!(summary.work_hours, Decimal::new(800, 2));
/// ```
pub fn summarize_punches(punches: &[PunchEvent], shift_end: NaiveTime) -> WorkHoursSummary {
    let mut work_seconds = 0i64;
    let mut overtime_seconds = 0i64;
    let mut open: Option<(NaiveDateTime, PunchType)> = None;

    for punch in punches {
        let punch_type = punch.punch_type;
        if punch_type.is_in_like() {
            open = Some((punch.timestamp, punch_type));
        } else if punch_type.is_out_like() {
            if let Some((opened_at, opened_as)) = open.take() {
                let seconds = (punch.timestamp - opened_at).num_seconds();
                if opened_as == PunchType::OvertimeIn {
                    overtime_seconds += seconds;
                } else {
                    work_seconds += seconds;
                }
            }
        } else if punch_type == PunchType::Defaulter {
            if let Some((opened_at, _)) = open.take() {
                let scheduled_end = punch.date().and_time(shift_end);
                work_seconds += (scheduled_end - opened_at).num_seconds();
            }
        }
    }

    let break_seconds: i64 = punches
        .windows(2)
        .filter(|pair| {
            pair[0].punch_type == PunchType::BreakOut && pair[1].punch_type == PunchType::BreakIn
        })
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_seconds())
        .sum();

    WorkHoursSummary {
        work_hours: seconds_to_hours(work_seconds),
        break_hours: seconds_to_hours(break_seconds),
        overtime_hours: seconds_to_hours(overtime_seconds),
    }
}

/// Aggregates one employee's punches on `date`.
///
/// A day without punches yields zeros. A day with punches for an employee who
/// has no shift window fails with [`EngineError::UnknownEmployee`].
pub fn aggregate_work_hours(
    store: &dyn AttendanceStore,
    employee_id: EmployeeId,
    date: NaiveDate,
) -> EngineResult<WorkHoursSummary> {
    let punches = store.list_punches_for_day(employee_id, date)?;
    if punches.is_empty() {
        // Zeros at scale two; the shift window is not consulted.
        return Ok(summarize_punches(&[], NaiveTime::MIN));
    }

    let shift = store
        .shift_window(employee_id)?
        .ok_or(EngineError::UnknownEmployee { employee_id })?;

    let summary = summarize_punches(&punches, shift.end);
    debug!(
        employee_id,
        date = %date,
        punches = punches.len(),
        work_hours = %summary.work_hours,
        break_hours = %summary.break_hours,
        overtime_hours = %summary.overtime_hours,
        "Aggregated work hours"
    );
    Ok(summary)
}
