//! Repository layer - data access abstractions.

pub(crate) mod entities;
mod attendance_repository;
mod user_repository;

pub use attendance_repository::{AttendanceRepository, AttendanceStore};
pub use user_repository::{NewUserRecord, UserRepository, UserStore, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
pub use attendance_repository::MockAttendanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
