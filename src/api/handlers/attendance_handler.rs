//! Attendance handlers.

use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson};
use crate::api::middleware::{require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::Attendance;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Check-in / check-out body; both fields optional
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AttendanceRequest {
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Create attendance routes
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(check_in))
        .route("/check-out", post(check_out))
        .route("/:id", get(get_attendance))
}

/// Record the caller's check-in for today
pub async fn check_in(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AttendanceRequest>,
) -> AppResult<ApiResponse<Attendance>> {
    let record = state
        .attendance_service
        .check_in(current_user.id, payload.location, payload.notes)
        .await?;

    Ok(ApiResponse::with_message(record, "Check-in successful"))
}

/// Record the caller's check-out for today
pub async fn check_out(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AttendanceRequest>,
) -> AppResult<ApiResponse<Attendance>> {
    let record = state
        .attendance_service
        .check_out(current_user.id, payload.location, payload.notes)
        .await?;

    Ok(ApiResponse::with_message(record, "Check-out successful"))
}

/// Get a single record (owner or admin)
pub async fn get_attendance(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<ApiResponse<Attendance>> {
    let record = state.attendance_service.get_attendance(id).await?;
    require_self_or_admin(&current_user, record.user_id)?;

    Ok(ApiResponse::with_message(
        record,
        "Attendance details retrieved successfully",
    ))
}
