//! Punch classification.
//!
//! This module turns a punch time into a typed punch given the employee's
//! shift window and the type of the last punch of the day. Classification is
//! a pure function of [`ClassificationInput`] and the tolerance window, so
//! replaying the same inputs always yields the same result.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{EmployeeId, PunchEvent, PunchType, ShiftWindow};

/// Everything the classifier looks at for one punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationInput {
    /// The employee's scheduled shift.
    pub shift: ShiftWindow,
    /// Time of day of the punch.
    pub punch_time: NaiveTime,
    /// Type of the last punch on the same calendar date, if any.
    pub last_punch: Option<PunchType>,
}

/// The classifier's verdict for one punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The punch type.
    pub punch_type: PunchType,
    /// Set for LATE_IN.
    pub is_late: bool,
    /// Minutes after shift start for LATE_IN, zero otherwise.
    pub lateness_minutes: u32,
    /// Set for an OUT before the end tolerance window.
    pub is_early: bool,
    /// Minutes before shift end for an early OUT, zero otherwise.
    pub earliness_minutes: u32,
}

impl Classification {
    fn of(punch_type: PunchType) -> Self {
        Self {
            punch_type,
            is_late: false,
            lateness_minutes: 0,
            is_early: false,
            earliness_minutes: 0,
        }
    }

    /// Builds the punch record to persist for this classification.
    pub fn into_punch(self, employee_id: EmployeeId, timestamp: NaiveDateTime) -> PunchEvent {
        PunchEvent {
            employee_id,
            punch_type: self.punch_type,
            timestamp,
            is_late: self.is_late,
            lateness_minutes: self.lateness_minutes,
            is_early: self.is_early,
            earliness_minutes: self.earliness_minutes,
        }
    }
}

/// Whole minutes since midnight; seconds are ignored.
pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn whole_minutes(delta: i64) -> u32 {
    u32::try_from(delta).unwrap_or(0)
}

/// Picks the break direction from the last punch of the day.
///
/// After IN or BREAK_IN the employee is leaving for a break; otherwise they
/// are coming back from one.
///
/// # Examples
///
/// ```
/// use attendance_engine::engine::break_direction;
/// use attendance_engine::models::PunchType;
///
/// assert_eq!(break_direction(Some(PunchType::In)), PunchType::BreakOut);
/// assert_eq!(break_direction(Some(PunchType::BreakOut)), PunchType::BreakIn);
/// assert_eq!(break_direction(None), PunchType::BreakIn);
/// ```
pub fn break_direction(last_punch: Option<PunchType>) -> PunchType {
    match last_punch {
        Some(PunchType::In | PunchType::BreakIn) => PunchType::BreakOut,
        _ => PunchType::BreakIn,
    }
}

/// Picks the overtime direction from the last punch of the day.
///
/// After OUT or BREAK_OUT the employee is starting overtime; otherwise they
/// are ending it.
///
/// # Examples
///
/// ```
/// use attendance_engine::engine::overtime_direction;
/// use attendance_engine::models::PunchType;
///
/// assert_eq!(overtime_direction(Some(PunchType::Out)), PunchType::OvertimeIn);
/// assert_eq!(overtime_direction(Some(PunchType::OvertimeIn)), PunchType::OvertimeOut);
/// assert_eq!(overtime_direction(None), PunchType::OvertimeOut);
/// ```
pub fn overtime_direction(last_punch: Option<PunchType>) -> PunchType {
    match last_punch {
        Some(PunchType::Out | PunchType::BreakOut) => PunchType::OvertimeIn,
        _ => PunchType::OvertimeOut,
    }
}

/// Classifies a punch against the shift window.
///
/// With `p`, `s` and `e` the punch, shift start and shift end in minutes
/// since midnight and `tw` the tolerance, the rules are checked in order and
/// the first match wins:
///
/// 1. `|p - s| <= tw`: IN
/// 2. `p > s + tw`: LATE_IN, late by `p - s`
/// 3. `|p - e| <= tw`: OUT
/// 4. `p < e - tw`: OUT, early by `e - p`
/// 5. `s < p < e`: BREAK_OUT or BREAK_IN, see [`break_direction`]
/// 6. `p > e + tw`: OVERTIME_IN or OVERTIME_OUT, see [`overtime_direction`]
/// 7. otherwise UNKNOWN
///
/// # Examples
///
/// ```
/// use attendance_engine::engine::{ClassificationInput, classify_punch};
/// use attendance_engine::models::{PunchType, ShiftWindow};
/// use chrono::NaiveTime;
///
/// let input = ClassificationInput {
///     shift: ShiftWindow::new(
///         NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///     ),
///     punch_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
///     last_punch: None,
/// };
///
/// let result = classify_punch(&input, 10);
/// assert_eq!(result.punch_type, PunchType::LateIn);
/// assert_eq!(result.lateness_minutes, 30);
/// ```
pub fn classify_punch(input: &ClassificationInput, tolerance_minutes: i64) -> Classification {
    let tw = tolerance_minutes;
    let p = minutes_since_midnight(input.punch_time);
    let s = minutes_since_midnight(input.shift.start);
    let e = minutes_since_midnight(input.shift.end);

    if (p - s).abs() <= tw {
        Classification::of(PunchType::In)
    } else if p > s + tw {
        Classification {
            is_late: true,
            lateness_minutes: whole_minutes(p - s),
            ..Classification::of(PunchType::LateIn)
        }
    } else if (p - e).abs() <= tw {
        Classification::of(PunchType::Out)
    } else if p < e - tw {
        Classification {
            is_early: true,
            earliness_minutes: whole_minutes(e - p),
            ..Classification::of(PunchType::Out)
        }
    } else if s < p && p < e {
        Classification::of(break_direction(input.last_punch))
    } else if p > e + tw {
        Classification::of(overtime_direction(input.last_punch))
    } else {
        Classification::of(PunchType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TW: i64 = 10;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn from_minutes(minutes: i64) -> NaiveTime {
        let minutes = u32::try_from(minutes).unwrap();
        time(minutes / 60, minutes % 60)
    }

    fn day_shift() -> ShiftWindow {
        ShiftWindow::new(time(9, 0), time(17, 0))
    }

    fn night_shift() -> ShiftWindow {
        ShiftWindow::new(time(22, 0), time(6, 0))
    }

    fn classify(shift: ShiftWindow, punch_time: NaiveTime, last: Option<PunchType>) -> Classification {
        classify_punch(
            &ClassificationInput {
                shift,
                punch_time,
                last_punch: last,
            },
            TW,
        )
    }

    #[test]
    fn test_on_time_in() {
        let result = classify(day_shift(), time(9, 5), None);
        assert_eq!(result.punch_type, PunchType::In);
        assert!(!result.is_late);
        assert_eq!(result.lateness_minutes, 0);
    }

    #[test]
    fn test_tolerance_boundaries_are_inclusive() {
        assert_eq!(classify(day_shift(), time(8, 50), None).punch_type, PunchType::In);
        assert_eq!(classify(day_shift(), time(9, 10), None).punch_type, PunchType::In);
        assert_eq!(
            classify(day_shift(), time(9, 11), None).punch_type,
            PunchType::LateIn
        );
    }

    #[test]
    fn test_late_in_records_minutes_after_start() {
        let result = classify(day_shift(), time(9, 30), None);
        assert_eq!(result.punch_type, PunchType::LateIn);
        assert!(result.is_late);
        assert_eq!(result.lateness_minutes, 30);
        assert!(!result.is_early);
    }

    #[test]
    fn test_everything_after_start_window_is_late_in_on_day_shift() {
        // Rule 2 precedes the OUT and overtime rules.
        for punch_time in [time(12, 0), time(16, 30), time(17, 0), time(17, 10), time(19, 0)] {
            let result = classify(day_shift(), punch_time, Some(PunchType::In));
            assert_eq!(result.punch_type, PunchType::LateIn, "at {punch_time}");
        }
    }

    #[test]
    fn test_early_morning_punch_is_early_out() {
        let result = classify(day_shift(), time(6, 0), None);
        assert_eq!(result.punch_type, PunchType::Out);
        assert!(result.is_early);
        assert_eq!(result.earliness_minutes, 660);
    }

    #[test]
    fn test_night_shift_end_window_is_out() {
        let result = classify(night_shift(), time(5, 55), Some(PunchType::In));
        assert_eq!(result.punch_type, PunchType::Out);
        assert!(!result.is_early);
    }

    #[test]
    fn test_night_shift_early_out() {
        let result = classify(night_shift(), time(4, 0), Some(PunchType::In));
        assert_eq!(result.punch_type, PunchType::Out);
        assert!(result.is_early);
        assert_eq!(result.earliness_minutes, 120);
    }

    #[test]
    fn test_night_shift_overtime_in_after_out() {
        let result = classify(night_shift(), time(7, 0), Some(PunchType::Out));
        assert_eq!(result.punch_type, PunchType::OvertimeIn);
        assert!(!result.is_late);
        assert!(!result.is_early);
    }

    #[test]
    fn test_night_shift_overtime_in_after_break_out() {
        let result = classify(night_shift(), time(7, 0), Some(PunchType::BreakOut));
        assert_eq!(result.punch_type, PunchType::OvertimeIn);
    }

    #[test]
    fn test_night_shift_overtime_out_otherwise() {
        for last in [None, Some(PunchType::OvertimeIn), Some(PunchType::In)] {
            let result = classify(night_shift(), time(8, 0), last);
            assert_eq!(result.punch_type, PunchType::OvertimeOut, "after {last:?}");
        }
    }

    #[test]
    fn test_seconds_are_ignored() {
        let punch_time = NaiveTime::from_hms_opt(9, 10, 59).unwrap();
        assert_eq!(classify(day_shift(), punch_time, None).punch_type, PunchType::In);
    }

    #[test]
    fn test_zero_tolerance() {
        let input = ClassificationInput {
            shift: day_shift(),
            punch_time: time(9, 1),
            last_punch: None,
        };
        let result = classify_punch(&input, 0);
        assert_eq!(result.punch_type, PunchType::LateIn);
        assert_eq!(result.lateness_minutes, 1);
    }

    #[test]
    fn test_break_direction_follows_last_punch() {
        assert_eq!(break_direction(Some(PunchType::In)), PunchType::BreakOut);
        assert_eq!(break_direction(Some(PunchType::BreakIn)), PunchType::BreakOut);
        assert_eq!(break_direction(Some(PunchType::LateIn)), PunchType::BreakIn);
        assert_eq!(break_direction(Some(PunchType::BreakOut)), PunchType::BreakIn);
        assert_eq!(break_direction(None), PunchType::BreakIn);
    }

    #[test]
    fn test_into_punch_copies_flags() {
        let timestamp = chrono::NaiveDate::from_ymd_opt(2025, 7, 21)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let punch = classify(day_shift(), time(9, 30), None).into_punch(1, timestamp);

        assert_eq!(punch.employee_id, 1);
        assert_eq!(punch.punch_type, PunchType::LateIn);
        assert_eq!(punch.timestamp, timestamp);
        assert!(punch.is_late);
        assert_eq!(punch.lateness_minutes, 30);
    }

    proptest! {
        #[test]
        fn prop_within_start_window_is_in(offset in -TW..=TW) {
            let result = classify(day_shift(), from_minutes(540 + offset), None);
            prop_assert_eq!(result.punch_type, PunchType::In);
            prop_assert!(!result.is_late);
        }

        #[test]
        fn prop_after_start_window_is_late_by_exact_minutes(p in (540 + TW + 1)..1440i64) {
            let result = classify(day_shift(), from_minutes(p), Some(PunchType::In));
            prop_assert_eq!(result.punch_type, PunchType::LateIn);
            prop_assert!(result.is_late);
            prop_assert_eq!(i64::from(result.lateness_minutes), p - 540);
        }

        #[test]
        fn prop_before_start_window_is_early_out(p in 0..(540 - TW)) {
            let result = classify(day_shift(), from_minutes(p), None);
            prop_assert_eq!(result.punch_type, PunchType::Out);
            prop_assert!(result.is_early);
            prop_assert_eq!(i64::from(result.earliness_minutes), 1020 - p);
        }

        #[test]
        fn prop_classification_is_deterministic(
            p in 0..1440i64,
            s in 0..1440i64,
            e in 0..1440i64,
            last in proptest::option::of(prop_oneof![
                Just(PunchType::In),
                Just(PunchType::Out),
                Just(PunchType::BreakIn),
                Just(PunchType::BreakOut),
                Just(PunchType::OvertimeIn),
                Just(PunchType::Defaulter),
            ]),
        ) {
            let input = ClassificationInput {
                shift: ShiftWindow::new(from_minutes(s), from_minutes(e)),
                punch_time: from_minutes(p),
                last_punch: last,
            };
            prop_assert_eq!(classify_punch(&input, TW), classify_punch(&input, TW));
        }

        // Once rules 1-4 fail, p < s - tw and p > e + tw, so rule 6 matches.
        #[test]
        fn prop_never_unknown_with_non_negative_tolerance(
            p in 0..1440i64,
            s in 0..1440i64,
            e in 0..1440i64,
            tw in 0..=120i64,
        ) {
            let input = ClassificationInput {
                shift: ShiftWindow::new(from_minutes(s), from_minutes(e)),
                punch_time: from_minutes(p),
                last_punch: None,
            };
            prop_assert_ne!(classify_punch(&input, tw).punch_type, PunchType::Unknown);
        }

        #[test]
        fn prop_flags_agree_with_minutes(p in 0..1440i64, s in 0..1440i64, e in 0..1440i64) {
            let input = ClassificationInput {
                shift: ShiftWindow::new(from_minutes(s), from_minutes(e)),
                punch_time: from_minutes(p),
                last_punch: None,
            };
            let result = classify_punch(&input, TW);
            prop_assert_eq!(result.is_late, result.punch_type == PunchType::LateIn);
            prop_assert_eq!(result.is_late, result.lateness_minutes > 0);
            prop_assert_eq!(result.is_early, result.earliness_minutes > 0);
        }
    }
}
