//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations, repositories and the Unit of Work
//! that hands them to services.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AttendanceRepository, AttendanceStore, NewUserRecord, UserRepository, UserStore, UserUpdate,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAttendanceRepository, MockUserRepository};
