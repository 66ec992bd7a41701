//! Attendance days and history windows.
//!
//! All day arithmetic happens in one fixed reference offset, so "today" for
//! check-in and the bounds of a `?date=` query always agree. Windows are
//! half-open: `start <= check_in < end`.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::config::DATE_FORMAT;
use crate::errors::{AppError, AppResult};

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::validation("Range end must be after its start"));
        }
        Ok(Self { start, end })
    }
}

/// Calendar period a history query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceWindow {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl AttendanceWindow {
    /// Pick a window from optional query parameters.
    ///
    /// Precedence is `date`, then `month`, then `year`; with none of them the
    /// month containing `today` is used. Empty strings count as absent.
    pub fn from_query(
        date: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
        today: NaiveDate,
    ) -> AppResult<Self> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(date) = present(date) {
            let day = NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| AppError::validation("Invalid date format, expected YYYY-MM-DD"))?;
            return Ok(AttendanceWindow::Day(day));
        }

        if let Some(month) = present(month) {
            let first = NaiveDate::parse_from_str(&format!("{}-01", month), DATE_FORMAT)
                .map_err(|_| AppError::validation("Invalid month format, expected YYYY-MM"))?;
            return Ok(AttendanceWindow::Month {
                year: first.year(),
                month: first.month(),
            });
        }

        if let Some(year) = present(year) {
            let valid = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());
            let parsed = year
                .parse::<i32>()
                .ok()
                .filter(|_| valid)
                .ok_or_else(|| AppError::validation("Invalid year format, expected YYYY"))?;
            return Ok(AttendanceWindow::Year(parsed));
        }

        Ok(AttendanceWindow::Month {
            year: today.year(),
            month: today.month(),
        })
    }

    /// First local day of the window and first local day after it.
    fn local_bounds(&self) -> AppResult<(NaiveDate, NaiveDate)> {
        let invalid = || AppError::validation("Date is out of range");

        match *self {
            AttendanceWindow::Day(day) => Ok((day, day.succ_opt().ok_or_else(invalid)?)),
            AttendanceWindow::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                let next = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;
                Ok((first, next))
            }
            AttendanceWindow::Year(year) => {
                let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
                let next = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(invalid)?;
                Ok((first, next))
            }
        }
    }
}

/// Maps instants to attendance days in the reference offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceCalendar {
    offset: FixedOffset,
}

impl AttendanceCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar day `instant` falls on in the reference offset.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// UTC instant of local midnight at the start of `day`.
    fn midnight(&self, day: NaiveDate) -> AppResult<DateTime<Utc>> {
        let local: NaiveDateTime = day.and_time(chrono::NaiveTime::MIN);
        let utc = local
            .checked_sub_signed(Duration::seconds(i64::from(self.offset.local_minus_utc())))
            .ok_or_else(|| AppError::validation("Date is out of range"))?;
        Ok(DateTime::from_naive_utc_and_offset(utc, Utc))
    }

    /// Midnight-to-midnight range of `day`.
    pub fn day_range(&self, day: NaiveDate) -> AppResult<TimeRange> {
        self.window_range(&AttendanceWindow::Day(day))
    }

    /// UTC range covered by a calendar window.
    pub fn window_range(&self, window: &AttendanceWindow) -> AppResult<TimeRange> {
        let (first, next) = window.local_bounds()?;
        TimeRange::new(self.midnight(first)?, self.midnight(next)?)
    }
}

impl Default for AttendanceCalendar {
    fn default() -> Self {
        Self::new(chrono::Offset::fix(&Utc))
    }
}
