//! HTTP request handlers for the payroll engine API.
//!
//! Every endpoint is stateless: report requests post the saved session they
//! want computed, and the response is derived from it on the spot.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::employees;
use crate::error::EngineResult;
use crate::extraction;
use crate::models::MonthKey;
use crate::session::Session;

use super::request::{
    DailyReportRequest, ExtractRequest, MonthlyReportRequest, SummaryReportRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, DailyReportResponse, ExtractResponse, SummaryReportResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/punches/extract", post(extract_handler))
        .route("/session/revive", post(revive_handler))
        .route("/reports/daily", post(daily_report_handler))
        .route("/reports/summary", post(summary_report_handler))
        .route("/reports/monthly", post(monthly_report_handler))
        .with_state(state)
}

/// Maps a body that axum could not decode to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
        JsonRejection::MissingJsonContentType(_) => ApiError::missing_content_type(),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

/// Logs the outcome of a request and renders it.
fn complete<T: Serialize>(
    correlation_id: Uuid,
    started: Instant,
    outcome: EngineResult<T>,
) -> Response {
    let duration_us = started.elapsed().as_micros() as u64;
    match outcome {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                duration_us,
                "Request completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                duration_us,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `POST /punches/extract`.
///
/// Reads punches out of a decoded report table using the configured label
/// vocabulary.
async fn extract_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing extraction request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let outcome = extraction::extract(&request.table, &state.policy().labels, request.strategy)
        .map(|punches| {
            let employees = employees(&punches);
            info!(
                correlation_id = %correlation_id,
                rows = request.table.len(),
                punches = punches.len(),
                employees = employees.len(),
                "Punches extracted"
            );
            ExtractResponse { punches, employees }
        });
    complete(correlation_id, started, outcome)
}

/// Handler for `POST /session/revive`.
///
/// Accepts a saved session of any supported version and answers with the
/// same session in the current layout.
async fn revive_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing revive request");

    let value = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let outcome = Session::revive(value, state.policy()).map(|session| session.snapshot());
    complete(correlation_id, started, outcome)
}

/// Handler for `POST /reports/daily`.
async fn daily_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<DailyReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing daily report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let outcome = Session::revive(request.session, state.policy()).map(|session| {
        let filter = request
            .employee_filter
            .unwrap_or_else(|| session.employee_filter().clone());
        let rows = session.export_daily(&filter, state.policy());
        info!(
            correlation_id = %correlation_id,
            filter = %filter,
            rows = rows.len(),
            "Daily report built"
        );
        DailyReportResponse { rows }
    });
    complete(correlation_id, started, outcome)
}

/// Handler for `POST /reports/summary`.
async fn summary_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummaryReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing summary report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let outcome = Session::revive(request.session, state.policy()).map(|session| {
        let (rows, totals) = session.summary_with_totals(state.policy());
        info!(
            correlation_id = %correlation_id,
            employees = rows.len(),
            final_pay = %totals.final_pay,
            "Summary report built"
        );
        SummaryReportResponse { rows, totals }
    });
    complete(correlation_id, started, outcome)
}

/// Handler for `POST /reports/monthly`.
///
/// The month is validated before the session is read.
async fn monthly_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing monthly report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let MonthlyReportRequest {
        session,
        employee,
        month,
    } = request;
    let outcome = month.parse::<MonthKey>().and_then(|month| {
        Session::revive(session, state.policy()).map(|session| {
            let statement = session.monthly_statement(&employee, month, state.policy());
            info!(
                correlation_id = %correlation_id,
                employee = %employee,
                month = %month,
                days = statement.days.len(),
                "Monthly statement built"
            );
            statement
        })
    });
    complete(correlation_id, started, outcome)
}
