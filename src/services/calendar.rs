//! UTC calendar math for the diary: which day a timestamp belongs to, and
//! which instants make up a calendar month.
//!
//! Every range here is half-open, `[start, end)`, and anchored at midnight UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{AppError, AppResult};

/// Half-open interval of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UtcRange {
    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        self.start <= *t && *t < self.end
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Midnight UTC of the day containing `t`.
pub fn day_start(t: DateTime<Utc>) -> DateTime<Utc> {
    midnight_utc(t.date_naive())
}

/// The UTC calendar day containing `t`.
pub fn day_range(t: DateTime<Utc>) -> AppResult<UtcRange> {
    let start = day_start(t);
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| AppError::Validation(format!("date {t} is out of range")))?;
    Ok(UtcRange { start, end })
}

fn check_year(t: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    if (1..=9999).contains(&t.year()) {
        Ok(t)
    } else {
        Err(AppError::Validation(
            "date year must be between 1 and 9999".into(),
        ))
    }
}

/// The calendar month `(year, month)`, `month` one-based. December rolls
/// over into January of the following year.
pub fn month_range(year: i32, month: u32) -> AppResult<UtcRange> {
    if !(1..=9999).contains(&year) {
        return Err(AppError::Validation(
            "year must be between 1 and 9999".into(),
        ));
    }
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("month must be between 1 and 12".into()));
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation("invalid year or month".into()))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| AppError::Validation("invalid year or month".into()))?;

    Ok(UtcRange {
        start: midnight_utc(first),
        end: midnight_utc(next_first),
    })
}

/// Parses raw `year` and `month` path segments, then resolves the month.
pub fn parse_month(year: &str, month: &str) -> AppResult<UtcRange> {
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("year must be a number, got '{year}'")))?;
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("month must be a number, got '{month}'")))?;
    month_range(year, month)
}

/// Resolves the submitted `date` of an entry. Absent or blank input means `now`.
///
/// Accepts RFC 3339 timestamps, date-times without an offset (read as UTC)
/// and bare `YYYY-MM-DD` dates (midnight UTC). Years are limited to 1–9999,
/// the same span month queries accept.
pub fn effective_date(raw: Option<&str>, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(now),
        Some(raw) => raw,
    };

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return check_year(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, fmt) {
            return check_year(Utc.from_utc_datetime(&t));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return check_year(midnight_utc(d));
    }

    Err(AppError::Validation(format!(
        "date must be an ISO-8601 date or timestamp, got '{raw}'"
    )))
}
