//! Request types for the attendance API.
//!
//! This module defines the JSON request bodies for the `/punches` and
//! `/sweeps` endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::EmployeeId;

/// Request body for the `/punches` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The badge that was scanned.
    pub badge_id: String,
    /// Local time of the scan, e.g. `2025-07-21T09:05:00`.
    pub timestamp: NaiveDateTime,
}

/// Request body for the `/sweeps` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRequest {
    /// Timestamp given to every DEFAULTER record the sweep inserts.
    pub cutoff: NaiveDateTime,
    /// Resume a cancelled sweep after this employee id.
    #[serde(default)]
    pub resume_after: Option<EmployeeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_punch_request() {
        let json = r#"{"badge_id": "123456", "timestamp": "2025-07-21T09:05:00"}"#;
        let request: PunchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.badge_id, "123456");
        assert_eq!(request.timestamp.to_string(), "2025-07-21 09:05:00");
    }

    #[test]
    fn test_punch_request_requires_timestamp() {
        let json = r#"{"badge_id": "123456"}"#;
        let err = serde_json::from_str::<PunchRequest>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `timestamp`"));
    }

    #[test]
    fn test_sweep_request_resume_is_optional() {
        let json = r#"{"cutoff": "2025-07-21T23:59:00"}"#;
        let request: SweepRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resume_after, None);

        let json = r#"{"cutoff": "2025-07-21T23:59:00", "resume_after": 4}"#;
        let request: SweepRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resume_after, Some(4));
    }
}
