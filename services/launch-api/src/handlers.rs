use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, FixedOffset, Utc};
use launchcore_core::timestamp::parse_iso8601;
use launchcore_core::{FilterRequest, Launch, LaunchPage, LaunchSummary, DEFAULT_LIMIT, MAX_LIMIT};
use launchcore_query::{validate_date_range, validate_limit, Cursor, QueryError, SessionFactory};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "launch-api";

/// Error response carrying a status and a `{"detail": ...}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidRange(detail) => Self::new(StatusCode::BAD_REQUEST, detail),
            QueryError::InvalidParameter(detail) => Self::unprocessable(detail),
            QueryError::Store(err) => {
                error!(error = %err, "Store failure while serving request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub last_evaluated_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub last_evaluated_key: Option<String>,
}

fn page_limit(limit: Option<i64>) -> Result<u32, ApiError> {
    let requested = limit.unwrap_or(i64::from(DEFAULT_LIMIT));
    let limit = u32::try_from(requested).map_err(|_| {
        ApiError::unprocessable(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {requested}"
        ))
    })?;
    Ok(validate_limit(limit)?)
}

fn required_date(name: &str, value: Option<&str>) -> Result<DateTime<FixedOffset>, ApiError> {
    let value = value.ok_or_else(|| ApiError::unprocessable(format!("{name} is required")))?;
    parse_iso8601(value).ok_or_else(|| {
        ApiError::unprocessable(format!("{name} must be an ISO-8601 datetime, got '{value}'"))
    })
}

pub async fn list_launches<F: SessionFactory + 'static>(
    State(state): State<Arc<AppState<F>>>,
    Query(params): Query<PageParams>,
) -> Result<Json<LaunchPage>, ApiError> {
    let limit = page_limit(params.limit)?;
    let cursor = Cursor::from_token(params.last_evaluated_key.as_deref());
    let page = state.launches.list(limit, cursor).await?;
    Ok(Json(page))
}

pub async fn launches_by_date_range<F: SessionFactory + 'static>(
    State(state): State<Arc<AppState<F>>>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<LaunchPage>, ApiError> {
    let start = required_date("start_date", params.start_date.as_deref())?;
    let end = required_date("end_date", params.end_date.as_deref())?;
    validate_date_range(&start, &end)?;
    let limit = page_limit(params.limit)?;
    let cursor = Cursor::from_token(params.last_evaluated_key.as_deref());

    let page = state
        .launches
        .list_by_date_range(start, end, limit, cursor)
        .await?;
    Ok(Json(page))
}

pub async fn filter_launches<F: SessionFactory + 'static>(
    State(state): State<Arc<AppState<F>>>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<LaunchPage>, ApiError> {
    let page = state.launches.filter(&request).await?;
    Ok(Json(page))
}

pub async fn get_launch<F: SessionFactory + 'static>(
    State(state): State<Arc<AppState<F>>>,
    Path(launch_id): Path<String>,
) -> Result<Json<Launch>, ApiError> {
    state
        .launches
        .get(&launch_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Launch not found"))
}

/// `GET /launches/filter` shares its path with the filter endpoint; it is
/// still a lookup of the launch whose id is `filter`.
pub async fn get_launch_named_filter<F: SessionFactory + 'static>(
    state: State<Arc<AppState<F>>>,
) -> Result<Json<Launch>, ApiError> {
    get_launch(state, Path("filter".to_string())).await
}

pub async fn launch_summary<F: SessionFactory + 'static>(
    State(state): State<Arc<AppState<F>>>,
) -> Result<Json<LaunchSummary>, ApiError> {
    let summary = state.launches.summary().await?;
    Ok(Json(summary))
}

pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339()
    })))
}

pub async fn root() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "message": "SpaceX Launches API"
    })))
}
