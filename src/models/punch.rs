//! Punch model and punch type taxonomy.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;

/// Direction of a punch, used for duplicate detection and interval pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunchDirection {
    /// IN, LATE_IN, BREAK_IN, OVERTIME_IN.
    InLike,
    /// OUT, BREAK_OUT, OVERTIME_OUT.
    OutLike,
}

/// The semantic type of a stored punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchType {
    /// Start of shift within the tolerance window.
    In,
    /// Start of shift after the tolerance window.
    LateIn,
    /// End of shift, on time or early.
    Out,
    /// Return from a break.
    BreakIn,
    /// Leaving for a break.
    BreakOut,
    /// Start of approved overtime.
    OvertimeIn,
    /// End of approved overtime.
    OvertimeOut,
    /// Synthetic close of a day that never got an OUT-like punch.
    Defaulter,
    /// Punch time matched no classification rule.
    Unknown,
}

impl PunchType {
    /// Returns the direction group of this type, if it has one.
    ///
    /// DEFAULTER and UNKNOWN belong to no group, so neither can trigger the
    /// duplicate guard.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{PunchDirection, PunchType};
    ///
    /// assert_eq!(PunchType::LateIn.direction(), Some(PunchDirection::InLike));
    /// assert_eq!(PunchType::BreakOut.direction(), Some(PunchDirection::OutLike));
    /// assert_eq!(PunchType::Defaulter.direction(), None);
    /// ```
    pub fn direction(self) -> Option<PunchDirection> {
        match self {
            PunchType::In | PunchType::LateIn | PunchType::BreakIn | PunchType::OvertimeIn => {
                Some(PunchDirection::InLike)
            }
            PunchType::Out | PunchType::BreakOut | PunchType::OvertimeOut => {
                Some(PunchDirection::OutLike)
            }
            PunchType::Defaulter | PunchType::Unknown => None,
        }
    }

    /// Returns true for IN, LATE_IN, BREAK_IN and OVERTIME_IN.
    pub fn is_in_like(self) -> bool {
        self.direction() == Some(PunchDirection::InLike)
    }

    /// Returns true for OUT, BREAK_OUT and OVERTIME_OUT.
    pub fn is_out_like(self) -> bool {
        self.direction() == Some(PunchDirection::OutLike)
    }

    /// Returns true for the two overtime types gated by approval.
    pub fn is_overtime(self) -> bool {
        matches!(self, PunchType::OvertimeIn | PunchType::OvertimeOut)
    }

    /// The wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            PunchType::In => "IN",
            PunchType::LateIn => "LATE_IN",
            PunchType::Out => "OUT",
            PunchType::BreakIn => "BREAK_IN",
            PunchType::BreakOut => "BREAK_OUT",
            PunchType::OvertimeIn => "OVERTIME_IN",
            PunchType::OvertimeOut => "OVERTIME_OUT",
            PunchType::Defaulter => "DEFAULTER",
            PunchType::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for PunchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored, classified punch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// The employee who punched.
    pub employee_id: EmployeeId,
    /// The classified type.
    pub punch_type: PunchType,
    /// Local date and time of the scan.
    pub timestamp: NaiveDateTime,
    /// Whether the punch was after the start tolerance window.
    #[serde(default)]
    pub is_late: bool,
    /// Minutes after scheduled start, zero unless late.
    #[serde(default)]
    pub lateness_minutes: u32,
    /// Whether the punch was before the end tolerance window.
    #[serde(default)]
    pub is_early: bool,
    /// Minutes before scheduled end, zero unless early.
    #[serde(default)]
    pub earliness_minutes: u32,
}

impl PunchEvent {
    /// Builds the synthetic DEFAULTER record closing an employee's day.
    pub fn defaulter(employee_id: EmployeeId, timestamp: NaiveDateTime) -> Self {
        Self {
            employee_id,
            punch_type: PunchType::Defaulter,
            timestamp,
            is_late: false,
            lateness_minutes: 0,
            is_early: false,
            earliness_minutes: 0,
        }
    }

    /// The calendar date the punch is filed under.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_like_group() {
        for punch_type in [
            PunchType::In,
            PunchType::LateIn,
            PunchType::BreakIn,
            PunchType::OvertimeIn,
        ] {
            assert!(punch_type.is_in_like(), "{punch_type} should be IN-like");
            assert!(!punch_type.is_out_like());
        }
    }

    #[test]
    fn test_out_like_group() {
        for punch_type in [PunchType::Out, PunchType::BreakOut, PunchType::OvertimeOut] {
            assert!(punch_type.is_out_like(), "{punch_type} should be OUT-like");
            assert!(!punch_type.is_in_like());
        }
    }

    #[test]
    fn test_defaulter_and_unknown_have_no_direction() {
        assert_eq!(PunchType::Defaulter.direction(), None);
        assert_eq!(PunchType::Unknown.direction(), None);
    }

    #[test]
    fn test_punch_type_serialization() {
        assert_eq!(
            serde_json::to_string(&PunchType::OvertimeIn).unwrap(),
            "\"OVERTIME_IN\""
        );
        let parsed: PunchType = serde_json::from_str("\"LATE_IN\"").unwrap();
        assert_eq!(parsed, PunchType::LateIn);
    }

    #[test]
    fn test_display_matches_serialized_name() {
        for punch_type in [
            PunchType::In,
            PunchType::LateIn,
            PunchType::Out,
            PunchType::BreakIn,
            PunchType::BreakOut,
            PunchType::OvertimeIn,
            PunchType::OvertimeOut,
            PunchType::Defaulter,
            PunchType::Unknown,
        ] {
            let json = serde_json::to_string(&punch_type).unwrap();
            assert_eq!(json, format!("\"{}\"", punch_type));
        }
    }

    #[test]
    fn test_defaulter_record_has_no_flags() {
        let timestamp = NaiveDate::from_ymd_opt(2025, 7, 21)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let punch = PunchEvent::defaulter(3, timestamp);

        assert_eq!(punch.punch_type, PunchType::Defaulter);
        assert_eq!(punch.employee_id, 3);
        assert!(!punch.is_late);
        assert_eq!(punch.lateness_minutes, 0);
        assert!(!punch.is_early);
        assert_eq!(punch.earliness_minutes, 0);
        assert_eq!(punch.date(), timestamp.date());
    }
}
