//! Error types for the attendance engine.
//!
//! Errors fall into three families: business-rule rejections of a punch,
//! storage failures that the caller should retry, and configuration problems
//! raised at startup.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::models::{EmployeeId, PunchType};

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::UnknownBadge {
///     badge_id: "999999".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown or inactive badge: 999999");
/// assert!(error.is_rejection());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No active employee carries the badge.
    #[error("Unknown or inactive badge: {badge_id}")]
    UnknownBadge {
        /// The badge that was scanned.
        badge_id: String,
    },

    /// The punch points the same direction as the last punch of the day.
    #[error("Duplicate punch for employee {employee_id}: {attempted} after {last}")]
    DuplicatePunch {
        /// The employee who punched.
        employee_id: EmployeeId,
        /// Type of the last stored punch of the day.
        last: PunchType,
        /// Type the new punch was classified as.
        attempted: PunchType,
    },

    /// An overtime punch was made without an approved overtime record.
    #[error("Overtime not approved for employee {employee_id} on {date}")]
    OvertimeNotApproved {
        /// The employee who punched.
        employee_id: EmployeeId,
        /// The calendar date of the punch.
        date: NaiveDate,
    },

    /// The punch time fell outside every classification rule.
    #[error("Punch at {timestamp} for employee {employee_id} could not be classified")]
    UnclassifiedPunch {
        /// The employee who punched.
        employee_id: EmployeeId,
        /// The timestamp of the punch.
        timestamp: NaiveDateTime,
    },

    /// An employee id did not resolve to an employee record.
    #[error("Employee not found: {employee_id}")]
    UnknownEmployee {
        /// The id that was looked up.
        employee_id: EmployeeId,
    },

    /// A storage lookup or insert failed.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl EngineError {
    /// Returns true for business-rule rejections of a punch.
    ///
    /// Rejections mean "not processed" to the person at the badge reader and
    /// are never a process-level fault.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownBadge { .. }
                | EngineError::DuplicatePunch { .. }
                | EngineError::OvertimeNotApproved { .. }
                | EngineError::UnclassifiedPunch { .. }
        )
    }

    /// Returns true when the operation may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::StorageUnavailable { .. })
    }

    /// Shorthand for building a [`EngineError::StorageUnavailable`].
    pub fn storage(message: impl Into<String>) -> Self {
        EngineError::StorageUnavailable {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_badge_displays_badge() {
        let error = EngineError::UnknownBadge {
            badge_id: "000001".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown or inactive badge: 000001");
    }

    #[test]
    fn test_duplicate_punch_displays_both_types() {
        let error = EngineError::DuplicatePunch {
            employee_id: 1,
            last: PunchType::In,
            attempted: PunchType::LateIn,
        };
        assert_eq!(
            error.to_string(),
            "Duplicate punch for employee 1: LATE_IN after IN"
        );
    }

    #[test]
    fn test_overtime_not_approved_displays_date() {
        let error = EngineError::OvertimeNotApproved {
            employee_id: 7,
            date: NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Overtime not approved for employee 7 on 2025-07-21"
        );
    }

    #[test]
    fn test_rejections_are_not_retryable() {
        let rejections = [
            EngineError::UnknownBadge {
                badge_id: "x".to_string(),
            },
            EngineError::DuplicatePunch {
                employee_id: 1,
                last: PunchType::Out,
                attempted: PunchType::OvertimeOut,
            },
            EngineError::OvertimeNotApproved {
                employee_id: 1,
                date: NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
            },
            EngineError::UnclassifiedPunch {
                employee_id: 1,
                timestamp: NaiveDate::from_ymd_opt(2025, 7, 21)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            },
        ];

        for error in rejections {
            assert!(error.is_rejection(), "{error} should be a rejection");
            assert!(!error.is_retryable(), "{error} should not be retryable");
        }
    }

    #[test]
    fn test_storage_unavailable_is_retryable_not_rejection() {
        let error = EngineError::storage("connection reset");
        assert!(error.is_retryable());
        assert!(!error.is_rejection());
        assert_eq!(error.to_string(), "Storage unavailable: connection reset");
    }

    #[test]
    fn test_unknown_employee_is_neither() {
        let error = EngineError::UnknownEmployee { employee_id: 42 };
        assert!(!error.is_rejection());
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_storage_error() -> EngineResult<()> {
            Err(EngineError::storage("down"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_storage_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
