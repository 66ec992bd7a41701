//! Attendance record entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{STATUS_ABSENT, STATUS_LATE, STATUS_LEAVE, STATUS_PRESENT};
use crate::errors::AppError;

/// Attendance status for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Late,
    Absent,
    Leave,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => STATUS_PRESENT,
            AttendanceStatus::Late => STATUS_LATE,
            AttendanceStatus::Absent => STATUS_ABSENT,
            AttendanceStatus::Leave => STATUS_LEAVE,
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PRESENT => Ok(AttendanceStatus::Present),
            STATUS_LATE => Ok(AttendanceStatus::Late),
            STATUS_ABSENT => Ok(AttendanceStatus::Absent),
            STATUS_LEAVE => Ok(AttendanceStatus::Leave),
            other => Err(AppError::validation(format!("Unknown attendance status: {}", other))),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Calendar day of `check_in` in the reference offset
    pub attendance_date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub location_in: Option<String>,
    pub location_out: Option<String>,
    pub notes: Option<String>,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    /// Open a new record at check-in time.
    pub fn check_in(
        user_id: Uuid,
        attendance_date: NaiveDate,
        at: DateTime<Utc>,
        location: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            attendance_date,
            check_in: at,
            check_out: None,
            location_in: location,
            location_out: None,
            notes,
            status: AttendanceStatus::Present,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn is_checked_out(&self) -> bool {
        self.check_out.is_some()
    }

    /// Record (or overwrite) the check-out.
    ///
    /// # Errors
    /// Returns a validation error unless `at` is strictly after check-in.
    pub fn record_check_out(&mut self, at: DateTime<Utc>, location: Option<String>) -> Result<(), AppError> {
        if at <= self.check_in {
            return Err(AppError::validation("Check-out must be after check-in"));
        }
        self.check_out = Some(at);
        self.location_out = location;
        self.updated_at = at;
        Ok(())
    }
}
