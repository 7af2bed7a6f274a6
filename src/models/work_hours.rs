//! Daily work-hours summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hour totals for one employee and day, rounded to two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursSummary {
    /// Hours between IN-like punches and their closing OUT-like or DEFAULTER punch.
    pub work_hours: Decimal,
    /// Hours between each BREAK_OUT and the BREAK_IN directly after it.
    pub break_hours: Decimal,
    /// Hours between OVERTIME_IN and its closing OUT-like punch.
    pub overtime_hours: Decimal,
}
