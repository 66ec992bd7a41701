//! HTTP request handlers.

pub mod attendance_handler;
pub mod auth_handler;
pub mod user_handler;

pub use attendance_handler::attendance_routes;
pub use auth_handler::auth_routes;
pub use user_handler::user_routes;
