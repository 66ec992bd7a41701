//! Application state - Dependency injection container.
//!
//! Provides handlers with the services and the database handle.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{AttendanceService, ServiceContainer, Services, TokenService, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub attendance_service: Arc<dyn AttendanceService>,
    pub token_service: Arc<TokenService>,
    /// Used by the health check
    pub database: Arc<Database>,
    /// Upper bound for a single request, including store calls
    pub request_timeout: Duration,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let container = Services::from_connection(database.get_connection(), config)?;

        Ok(Self {
            user_service: container.users(),
            attendance_service: container.attendance(),
            token_service: container.tokens(),
            database,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    /// Create new application state with manually injected services.
    pub fn new(
        user_service: Arc<dyn UserService>,
        attendance_service: Arc<dyn AttendanceService>,
        token_service: Arc<TokenService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            user_service,
            attendance_service,
            token_service,
            database,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}
