//! Attendance engine.
//!
//! This module contains the punch pipeline: classification of a scan against
//! the employee's shift, the processor that applies the sequencing and
//! overtime rules, the end-of-day defaulter sweep, and the aggregation of a
//! day's punches into hour totals.
//!
//! Each component is in its own submodule:
//!
//! - [`classifier`] - Pure punch classification rules
//! - [`processor`] - Badge scan orchestration and rejection rules
//! - [`defaulter`] - Closing days that never saw an OUT punch
//! - [`work_hours`] - Work, break and overtime totals for one day
//! - [`alert`] - Operator alert sinks
//! - [`day_lock`] - Per-(employee, date) locking

pub mod alert;
pub mod classifier;
pub mod day_lock;
pub mod defaulter;
pub mod processor;
pub mod work_hours;

pub use alert::{Alert, AlertKind, AlertSink, RecordingAlertSink, TracingAlertSink};
pub use classifier::{
    Classification, ClassificationInput, break_direction, classify_punch, minutes_since_midnight,
    overtime_direction,
};
pub use day_lock::DayLocks;
pub use defaulter::{DefaulterSweep, SweepFailure, SweepReport};
pub use processor::{PunchProcessor, is_duplicate};
pub use work_hours::{aggregate_work_hours, seconds_to_hours, summarize_punches};
