//! Attendance service - Daily check-in/check-out and history queries.
//!
//! A user has at most one record per attendance day. The day is taken from
//! the injected clock in the calendar's reference offset.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Attendance, AttendanceCalendar, AttendanceWindow, Clock};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const ALREADY_CHECKED_IN: &str = "Already checked in today";
const NO_CHECK_IN_TODAY: &str = "No check-in record found for today";

/// Attendance service trait for dependency injection.
#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// Open today's record for the user.
    ///
    /// Fails with `Conflict` if one already exists.
    async fn check_in(
        &self,
        user_id: Uuid,
        location: Option<String>,
        notes: Option<String>,
    ) -> AppResult<Attendance>;

    /// Close (or re-close) today's record for the user.
    ///
    /// Fails with `NotFound` if the user has not checked in today.
    async fn check_out(
        &self,
        user_id: Uuid,
        location: Option<String>,
        notes: Option<String>,
    ) -> AppResult<Attendance>;

    async fn get_attendance(&self, id: Uuid) -> AppResult<Attendance>;

    /// Records whose check-in falls inside the window, oldest first
    async fn get_user_attendances(
        &self,
        user_id: Uuid,
        window: AttendanceWindow,
    ) -> AppResult<Vec<Attendance>>;

    /// Current attendance day
    fn today(&self) -> NaiveDate;
}

/// Concrete implementation of AttendanceService using Unit of Work.
pub struct AttendanceLedger<U: UnitOfWork> {
    uow: Arc<U>,
    calendar: AttendanceCalendar,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> AttendanceLedger<U> {
    pub fn new(uow: Arc<U>, calendar: AttendanceCalendar, clock: Arc<dyn Clock>) -> Self {
        Self {
            uow,
            calendar,
            clock,
        }
    }
}

/// Blank free text is stored as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<U: UnitOfWork> AttendanceService for AttendanceLedger<U> {
    async fn check_in(
        &self,
        user_id: Uuid,
        location: Option<String>,
        notes: Option<String>,
    ) -> AppResult<Attendance> {
        let now = self.clock.now();
        let today = self.calendar.day_of(now);
        let attendances = self.uow.attendances();

        if attendances
            .find_by_user_and_date(user_id, today)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(ALREADY_CHECKED_IN));
        }

        let record = Attendance::check_in(user_id, today, now, non_blank(location), non_blank(notes));

        // A concurrent check-in for the same day loses on the unique index
        let created = attendances.create(record).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict(ALREADY_CHECKED_IN),
            other => other,
        })?;

        tracing::info!(
            user_id = %user_id,
            attendance_id = %created.id,
            date = %today,
            "Checked in"
        );
        Ok(created)
    }

    async fn check_out(
        &self,
        user_id: Uuid,
        location: Option<String>,
        notes: Option<String>,
    ) -> AppResult<Attendance> {
        let now = self.clock.now();
        let today = self.calendar.day_of(now);
        let attendances = self.uow.attendances();

        let mut record = attendances
            .find_by_user_and_date(user_id, today)
            .await?
            .ok_or_else(|| AppError::not_found(NO_CHECK_IN_TODAY))?;

        if record.is_checked_out() {
            tracing::debug!(attendance_id = %record.id, "Overwriting previous check-out");
        }

        record.record_check_out(now, non_blank(location))?;
        if let Some(notes) = non_blank(notes) {
            record.notes = Some(notes);
        }

        let updated = attendances.update(record).await?;

        tracing::info!(
            user_id = %user_id,
            attendance_id = %updated.id,
            date = %today,
            "Checked out"
        );
        Ok(updated)
    }

    async fn get_attendance(&self, id: Uuid) -> AppResult<Attendance> {
        self.uow
            .attendances()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Attendance")
    }

    async fn get_user_attendances(
        &self,
        user_id: Uuid,
        window: AttendanceWindow,
    ) -> AppResult<Vec<Attendance>> {
        let range = self.calendar.window_range(&window)?;
        tracing::debug!(user_id = %user_id, start = %range.start, end = %range.end, "Listing attendance");

        self.uow
            .attendances()
            .list_for_user_in_range(user_id, range)
            .await
    }

    fn today(&self) -> NaiveDate {
        self.calendar.day_of(self.clock.now())
    }
}
