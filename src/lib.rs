//! Attendance API - daily check-in/check-out tracking over HTTP.
//!
//! Users register and authenticate with a bearer token, record one
//! attendance per calendar day, and query their history by day, month
//! or year. Admins may read and manage any user.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, attendance records, credentials and calendar rules
//! - **services**: User directory, attendance ledger and token service
//! - **infra**: Database, migrations, repositories and Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations first)
//! cargo run -- serve
//!
//! # Manage migrations
//! cargo run -- migrate status
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Attendance, User, UserRole};
pub use errors::{AppError, AppResult};
