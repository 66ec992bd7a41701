//! User handlers.

use axum::{
    extract::{Extension, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, QueryParams, ValidatedJson};
use crate::api::middleware::{require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{Attendance, AttendanceWindow, UserChanges, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// User update request with validation
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email is too long")
    )]
    pub email: String,
    pub role: String,
    /// Empty or absent keeps the current password
    pub password: Option<String>,
}

/// History filter; precedence is date, month, year
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub date: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/attendance", get(get_user_attendances))
}

/// Get user by ID (own profile or admin)
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_self_or_admin(&current_user, id)?;

    let user = state.user_service.get_user(id).await?;

    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "User details retrieved successfully",
    ))
}

/// Update user (own profile or admin; only admins change roles)
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_self_or_admin(&current_user, id)?;

    let role: UserRole = payload.role.trim().parse()?;
    if role != current_user.role && !current_user.is_admin() {
        return Err(AppError::Forbidden);
    }

    let user = state
        .user_service
        .update_user(
            id,
            UserChanges {
                username: payload.username,
                full_name: payload.full_name,
                email: payload.email,
                role,
                password: payload.password,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "User updated successfully",
    ))
}

/// Delete user (own account or admin)
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_self_or_admin(&current_user, id)?;

    state.user_service.delete_user(id).await?;

    Ok(ApiResponse::message("User deleted successfully"))
}

/// Attendance history for a user by day, month or year
pub async fn get_user_attendances(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    QueryParams(query): QueryParams<AttendanceQuery>,
) -> AppResult<ApiResponse<Vec<Attendance>>> {
    require_self_or_admin(&current_user, id)?;

    let window = AttendanceWindow::from_query(
        query.date.as_deref(),
        query.month.as_deref(),
        query.year.as_deref(),
        state.attendance_service.today(),
    )?;

    let records = state
        .attendance_service
        .get_user_attendances(id, window)
        .await?;

    Ok(ApiResponse::with_message(
        records,
        "User attendances retrieved successfully",
    ))
}
