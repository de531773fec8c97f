use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AttendanceError;
use crate::models::{AttendanceEvent, CheckInRequest, DailyTarget, WeeklyReport};
use crate::services::query::AttendanceQuery;
use crate::utils::date::DATE_FORMAT;
use crate::AppState;

pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// Returned to clients in place of the underlying store error, which is only logged.
const STORE_FAILURE_DETAILS: &str = "The attendance store could not complete the request";

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceParams {
    pub date: Option<String>,
    pub days: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub target: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordAttendanceResponse {
    pub id: String,
    pub message: String,
}

/// Echo of the query that was actually run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEcho {
    pub date: Option<String>,
    pub days: Option<u32>,
}

impl From<AttendanceQuery> for QueryEcho {
    fn from(query: AttendanceQuery) -> Self {
        match query {
            AttendanceQuery::ByDate(day) => QueryEcho {
                date: Some(day.format(DATE_FORMAT).to_string()),
                days: None,
            },
            AttendanceQuery::ByWindow { days } => QueryEcho {
                date: None,
                days: Some(days),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceListResponse {
    pub success: bool,
    pub data: Vec<AttendanceEvent>,
    pub count: usize,
    pub params: QueryEcho,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub data: WeeklyReport,
}

/// POST /attendance
pub async fn record_attendance(
    State(state): State<AppState>,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordAttendanceResponse>), ApiError> {
    let Json(request) = payload.map_err(body_rejection)?;

    let id = state
        .service
        .append(&request)
        .await
        .map_err(|e| error_response(e, "record attendance"))?;

    Ok((
        StatusCode::CREATED,
        Json(RecordAttendanceResponse {
            id: id.to_string(),
            message: "Attendance recorded successfully".to_string(),
        }),
    ))
}

/// GET /attendance?date=YYYY-MM-DD | GET /attendance?days=N
pub async fn get_attendance(
    State(state): State<AppState>,
    params: Result<Query<AttendanceParams>, QueryRejection>,
) -> Result<Json<AttendanceListResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| bad_request(rejection.body_text()))?;

    let query = AttendanceQuery::from_params(params.date.as_deref(), params.days.as_deref())
        .map_err(|e| error_response(e.into(), "fetch attendance"))?;

    let data = state
        .service
        .query(query)
        .await
        .map_err(|e| error_response(e, "fetch attendance"))?;

    Ok(Json(AttendanceListResponse {
        success: true,
        count: data.len(),
        data,
        params: query.into(),
    }))
}

/// GET /attendance/summary?target=N
pub async fn get_attendance_summary(
    State(state): State<AppState>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| bad_request(rejection.body_text()))?;

    let target = match params.target.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => raw
            .parse::<DailyTarget>()
            .map_err(|e| error_response(e.into(), "summarize attendance"))?,
        None => state.config.daily_target,
    };

    let report = state
        .service
        .weekly_report(target)
        .await
        .map_err(|e| error_response(e, "summarize attendance"))?;

    Ok(Json(SummaryResponse {
        success: true,
        data: report,
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.service.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {:?}", e);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "error": "Attendance store unavailable",
                "details": STORE_FAILURE_DETAILS,
            })),
        )
    })?;
    Ok("OK")
}

/// Malformed or mistyped JSON is a 400. Other rejections keep axum's status (415 for a missing
/// `Content-Type`, 413 for an oversized body).
fn body_rejection(rejection: JsonRejection) -> ApiError {
    tracing::warn!("Rejected check-in body: {}", rejection.body_text());
    let status = match &rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    };
    (
        status,
        Json(serde_json::json!({
            "error": format!("Invalid request body: {}", rejection.body_text()),
        })),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message.into()})),
    )
}

/// Translate a domain error into the HTTP error shape. `action` completes "Failed to ...".
fn error_response(err: AttendanceError, action: &str) -> ApiError {
    match err {
        AttendanceError::Validation(e) => {
            tracing::warn!("Rejected check-in: {}", e);
            bad_request(e.to_string())
        }
        AttendanceError::InvalidParameter(e) => {
            tracing::warn!("Rejected query parameter: {}", e);
            bad_request(e.to_string())
        }
        AttendanceError::Store(e) => {
            tracing::error!("Failed to {}: {:?}", action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to {}", action),
                    "details": STORE_FAILURE_DETAILS,
                })),
            )
        }
    }
}
