//! HTTP request handlers for the attendance API.
//!
//! This module contains the handler functions for all API endpoints. Engine
//! calls take per-day locks and talk to storage synchronously, so they run on
//! the blocking thread pool.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::aggregate_work_hours;
use crate::error::EngineResult;
use crate::models::EmployeeId;

use super::request::{PunchRequest, SweepRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/punches", post(punch_handler))
        .route(
            "/employees/:employee_id/work-hours/:date",
            get(work_hours_handler),
        )
        .route("/sweeps", post(sweep_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON body rejection to a 400 response.
fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}

/// Runs an engine call on the blocking pool.
async fn run_blocking<T, F>(correlation_id: Uuid, f: F) -> Result<T, ApiErrorResponse>
where
    T: Send + 'static,
    F: FnOnce() -> EngineResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            if err.is_retryable() {
                error!(correlation_id = %correlation_id, error = %err, "Storage failure");
            } else {
                warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
            }
            Err(err.into())
        }
        Err(join_error) => {
            error!(correlation_id = %correlation_id, error = %join_error, "Engine task failed");
            Err(ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal("Engine task failed"),
            ))
        }
    }
}

/// Handler for POST /punches.
///
/// Classifies and records one badge scan, returning the stored punch.
async fn punch_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        badge_id = %request.badge_id,
        timestamp = %request.timestamp,
        "Processing punch"
    );

    let processor = state.processor();
    let start_time = Instant::now();
    let PunchRequest {
        badge_id,
        timestamp,
    } = request;
    match run_blocking(correlation_id, move || processor.process(&badge_id, timestamp)).await {
        Ok(punch) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = punch.employee_id,
                punch_type = %punch.punch_type,
                duration_us = start_time.elapsed().as_micros(),
                "Punch processed"
            );
            json_response(StatusCode::CREATED, punch)
        }
        Err(err) => err.into_response(),
    }
}

/// Handler for GET /employees/:employee_id/work-hours/:date.
///
/// Returns the work, break and overtime totals for one employee and day.
async fn work_hours_handler(
    State(state): State<AppState>,
    path: Result<Path<(EmployeeId, NaiveDate)>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let (employee_id, date) = match path {
        Ok(Path(params)) => params,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid path");
            return ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            )
            .into_response();
        }
    };
    info!(
        correlation_id = %correlation_id,
        employee_id,
        date = %date,
        "Aggregating work hours"
    );

    let store = state.store();
    match run_blocking(correlation_id, move || {
        aggregate_work_hours(store.as_ref(), employee_id, date)
    })
    .await
    {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => err.into_response(),
    }
}

/// Handler for POST /sweeps.
///
/// Runs the defaulter sweep over every active employee.
async fn sweep_handler(
    State(state): State<AppState>,
    payload: Result<Json<SweepRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        cutoff = %request.cutoff,
        resume_after = ?request.resume_after,
        "Running defaulter sweep"
    );

    let processor = state.processor();
    let result = run_blocking(correlation_id, move || {
        let cancel = AtomicBool::new(false);
        processor
            .sweep()
            .resume_sweep(request.cutoff, request.resume_after, &cancel)
    })
    .await;

    match result {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                examined = report.examined,
                closed = report.closed.len(),
                failed = report.failures.len(),
                "Defaulter sweep finished"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => err.into_response(),
    }
}
