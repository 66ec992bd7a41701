//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.

mod attendance_service;
pub mod container;
mod token_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use attendance_service::{AttendanceLedger, AttendanceService};
pub use token_service::{Claims, IssuedToken, TokenService};
pub use user_service::{UserManager, UserService};
