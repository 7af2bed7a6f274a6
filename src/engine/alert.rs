//! Operator alerts.
//!
//! Every rejected punch and every DEFAULTER insert is raised through an
//! [`AlertSink`]. The default sink writes a structured `tracing` warning;
//! deployments can plug in e-mail, chat or paging transports.

use std::sync::Mutex;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

use crate::error::EngineError;
use crate::models::EmployeeId;

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A badge did not resolve to an active employee.
    UnknownBadge,
    /// A punch repeated the direction of the previous one.
    DuplicatePunch,
    /// An overtime punch had no approval.
    OvertimeNotApproved,
    /// A punch matched no classification rule.
    UnclassifiedPunch,
    /// A day was closed with a DEFAULTER record.
    MissingOutPunch,
}

/// A notification for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// The alert category.
    pub kind: AlertKind,
    /// The employee concerned, when known.
    pub employee_id: Option<EmployeeId>,
    /// Human-readable description.
    pub message: String,
}

impl Alert {
    /// Builds the alert for a punch rejection, or `None` for errors that are
    /// not business-rule rejections.
    pub fn for_rejection(error: &EngineError) -> Option<Self> {
        let (kind, employee_id) = match error {
            EngineError::UnknownBadge { .. } => (AlertKind::UnknownBadge, None),
            EngineError::DuplicatePunch { employee_id, .. } => {
                (AlertKind::DuplicatePunch, Some(*employee_id))
            }
            EngineError::OvertimeNotApproved { employee_id, .. } => {
                (AlertKind::OvertimeNotApproved, Some(*employee_id))
            }
            EngineError::UnclassifiedPunch { employee_id, .. } => {
                (AlertKind::UnclassifiedPunch, Some(*employee_id))
            }
            _ => return None,
        };

        Some(Self {
            kind,
            employee_id,
            message: error.to_string(),
        })
    }

    /// Builds the alert raised when a DEFAULTER record is inserted.
    pub fn missing_out_punch(employee_id: EmployeeId, cutoff: NaiveDateTime) -> Self {
        Self {
            kind: AlertKind::MissingOutPunch,
            employee_id: Some(employee_id),
            message: format!("Missing OUT punch for employee {employee_id}, closed at {cutoff}"),
        }
    }
}

/// Destination for operator alerts.
pub trait AlertSink: Send + Sync {
    /// Delivers one alert. Delivery problems must not fail the caller.
    fn raise(&self, alert: Alert);
}

/// Emits alerts as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn raise(&self, alert: Alert) {
        warn!(
            kind = ?alert.kind,
            employee_id = ?alert.employee_id,
            "{}",
            alert.message
        );
    }
}

/// Keeps alerts in memory, in the order raised.
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlertSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every alert raised so far.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }

    /// Returns the kinds of the alerts raised so far.
    pub fn kinds(&self) -> Vec<AlertKind> {
        self.alerts().iter().map(|a| a.kind).collect()
    }
}

impl AlertSink for RecordingAlertSink {
    fn raise(&self, alert: Alert) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(alert);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PunchType;
    use chrono::NaiveDate;

    #[test]
    fn test_rejection_alerts_carry_employee() {
        let error = EngineError::DuplicatePunch {
            employee_id: 4,
            last: PunchType::In,
            attempted: PunchType::In,
        };
        let alert = Alert::for_rejection(&error).unwrap();
        assert_eq!(alert.kind, AlertKind::DuplicatePunch);
        assert_eq!(alert.employee_id, Some(4));
        assert_eq!(alert.message, error.to_string());
    }

    #[test]
    fn test_unknown_badge_alert_has_no_employee() {
        let error = EngineError::UnknownBadge {
            badge_id: "999999".to_string(),
        };
        let alert = Alert::for_rejection(&error).unwrap();
        assert_eq!(alert.kind, AlertKind::UnknownBadge);
        assert_eq!(alert.employee_id, None);
    }

    #[test]
    fn test_storage_errors_raise_no_alert() {
        assert!(Alert::for_rejection(&EngineError::storage("down")).is_none());
    }

    #[test]
    fn test_missing_out_punch_message() {
        let cutoff = NaiveDate::from_ymd_opt(2025, 7, 21)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let alert = Alert::missing_out_punch(1, cutoff);
        assert_eq!(alert.kind, AlertKind::MissingOutPunch);
        assert_eq!(
            alert.message,
            "Missing OUT punch for employee 1, closed at 2025-07-21 23:59:00"
        );
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingAlertSink::new();
        sink.raise(Alert::for_rejection(&EngineError::UnknownBadge {
            badge_id: "1".to_string(),
        })
        .unwrap());
        sink.raise(Alert::missing_out_punch(
            2,
            NaiveDate::from_ymd_opt(2025, 7, 21)
                .unwrap()
                .and_hms_opt(23, 59, 0)
                .unwrap(),
        ));

        assert_eq!(
            sink.kinds(),
            vec![AlertKind::UnknownBadge, AlertKind::MissingOutPunch]
        );
    }
}
