//! Service Container - Centralized service access.
//!
//! Builds every service from one connection and config and hands them out
//! as trait objects.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AttendanceLedger, AttendanceService, TokenService, UserManager, UserService,
};
use crate::config::Config;
use crate::domain::{AttendanceCalendar, Clock, CredentialManager, SystemClock};
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn users(&self) -> Arc<dyn UserService>;

    fn attendance(&self) -> Arc<dyn AttendanceService>;

    fn tokens(&self) -> Arc<TokenService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    user_service: Arc<dyn UserService>,
    attendance_service: Arc<dyn AttendanceService>,
    token_service: Arc<TokenService>,
}

impl Services {
    pub fn new(
        user_service: Arc<dyn UserService>,
        attendance_service: Arc<dyn AttendanceService>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_service,
            attendance_service,
            token_service,
        }
    }

    /// Wire all services over a database connection.
    ///
    /// # Errors
    /// Fails if the configured password hashing cost is rejected.
    pub fn from_connection(db: Arc<DatabaseConnection>, config: &Config) -> AppResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let uow = Arc::new(Persistence::new(db));
        let credentials = Arc::new(CredentialManager::new(config.hash_cost)?);
        let calendar = AttendanceCalendar::new(config.attendance_offset());

        let user_service = Arc::new(UserManager::new(uow.clone(), credentials));
        let attendance_service = Arc::new(AttendanceLedger::new(uow, calendar, clock));
        let token_service = Arc::new(TokenService::from_config(config));

        Ok(Self::new(user_service, attendance_service, token_service))
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceService> {
        self.attendance_service.clone()
    }

    fn tokens(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }
}
