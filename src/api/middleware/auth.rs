//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;
use crate::services::Claims;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state.token_service.validate(token)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Allow the owner of `owner_id` or any admin.
pub fn require_self_or_admin(user: &CurrentUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.id == owner_id {
        Ok(())
    } else {
        require_admin(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        let employee = user(UserRole::Employee);
        assert!(require_self_or_admin(&employee, employee.id).is_ok());
    }

    #[test]
    fn test_other_employee_is_forbidden() {
        let employee = user(UserRole::Employee);
        let result = require_self_or_admin(&employee, Uuid::new_v4());
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_admin_is_allowed_for_anyone() {
        let admin = user(UserRole::Admin);
        assert!(require_self_or_admin(&admin, Uuid::new_v4()).is_ok());
        assert!(require_admin(&admin).is_ok());
        assert!(require_admin(&user(UserRole::Employee)).is_err());
    }
}
