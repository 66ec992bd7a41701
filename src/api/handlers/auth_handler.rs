//! Registration and login handlers.

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NewUser, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::IssuedToken;
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email is too long")
    )]
    pub email: String,
    /// `admin` or `employee`; defaults to `employee`
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login payload: the bearer token plus the authenticated profile
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: IssuedToken,
    pub user: UserResponse,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let role = match payload.role.as_deref().map(str::trim) {
        None | Some("") => UserRole::Employee,
        Some(role) => role.parse()?,
    };

    let user = state
        .user_service
        .register(NewUser {
            username: payload.username,
            password: payload.password,
            full_name: payload.full_name,
            email: payload.email,
            role,
        })
        .await?;

    Ok(Created::with_message(
        UserResponse::from(user),
        "User registered successfully",
    ))
}

/// Login and get JWT token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .user_service
        .login(&payload.username, &payload.password)
        .await?;

    let token = state.token_service.issue_for(&user)?;

    Ok(ApiResponse::with_message(
        LoginResponse {
            token,
            user: UserResponse::from(user),
        },
        "Login successful",
    ))
}
