//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod attendance;
pub mod calendar;
pub mod clock;
pub mod password;
pub mod user;

pub use attendance::{Attendance, AttendanceStatus};
pub use calendar::{AttendanceCalendar, AttendanceWindow, TimeRange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use password::{CredentialManager, Password};
pub use user::{NewUser, User, UserChanges, UserResponse, UserRole};
