//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories so services depend on one
//! abstraction instead of wiring each store themselves.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{AttendanceRepository, AttendanceStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
///
/// Tests substitute a struct holding mocked repositories.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get attendance repository
    fn attendances(&self) -> Arc<dyn AttendanceRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    attendance_repo: Arc<AttendanceStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = Arc::new(UserStore::new(Arc::clone(&db)));
        let attendance_repo = Arc::new(AttendanceStore::new(db));
        Self {
            user_repo,
            attendance_repo,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn attendances(&self) -> Arc<dyn AttendanceRepository> {
        self.attendance_repo.clone()
    }
}
