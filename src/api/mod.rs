//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints for recording punches, reading
//! daily work hours and running the end-of-day defaulter sweep.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PunchRequest, SweepRequest};
pub use response::{ApiError, ApiErrorResponse, RETRY_AFTER_SECONDS};
pub use state::AppState;
