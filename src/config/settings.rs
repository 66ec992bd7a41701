//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use super::constants::{
    DEFAULT_ATTENDANCE_UTC_OFFSET_MINUTES, DEFAULT_DATABASE_URL, DEFAULT_HASH_ITERATIONS,
    DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MAX_UTC_OFFSET_MINUTES, MIN_JWT_SECRET_LENGTH,
};

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub request_timeout_secs: u64,
    pub attendance_utc_offset_minutes: i32,
    pub hash_cost: HashCost,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "attendance_utc_offset_minutes",
                &self.attendance_utc_offset_minutes,
            )
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

/// Parse an env var, falling back to the default when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement),
    /// or if ATTENDANCE_UTC_OFFSET_MINUTES is outside +/-14 hours.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let attendance_utc_offset_minutes = env_or(
            "ATTENDANCE_UTC_OFFSET_MINUTES",
            DEFAULT_ATTENDANCE_UTC_OFFSET_MINUTES,
        );
        if attendance_utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            panic!(
                "ATTENDANCE_UTC_OFFSET_MINUTES must be within +/-{} minutes",
                MAX_UTC_OFFSET_MINUTES
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env_or("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            attendance_utc_offset_minutes,
            hash_cost: HashCost {
                memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", DEFAULT_HASH_MEMORY_KIB),
                iterations: env_or("PASSWORD_HASH_ITERATIONS", DEFAULT_HASH_ITERATIONS),
                parallelism: env_or("PASSWORD_HASH_PARALLELISM", DEFAULT_HASH_PARALLELISM),
            },
        }
    }

    /// Build a configuration with explicit values (tests and embedding).
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            attendance_utc_offset_minutes: DEFAULT_ATTENDANCE_UTC_OFFSET_MINUTES,
            hash_cost: HashCost::default(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Timezone whose calendar days delimit attendance records.
    pub fn attendance_offset(&self) -> FixedOffset {
        // Range is checked in from_env; fall back to UTC for hand-built configs.
        FixedOffset::east_opt(self.attendance_utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}
