//! Timeframe resolution
//!
//! Turns a timeframe keyword, an IANA timezone and an optional reference date
//! into an inclusive UTC window plus the [`PeriodInfo`] describing it. Day
//! boundaries are computed on the local calendar of the zone, so a daily window
//! spans 23 or 25 hours across a DST change.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

use crate::entities::period::{PeriodInfo, Timeframe};

/// Errors raised while resolving a timeframe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeframeError {
    #[error("Invalid timeframe: {0}. Must be 'daily', 'weekly', 'monthly', or 'all_time'")]
    InvalidTimeframe(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid reference date: {0}")]
    InvalidReferenceDate(String),

    #[error("Date out of supported range: {0}")]
    DateOutOfRange(NaiveDate),
}

/// Inclusive UTC window of a timeframe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period: PeriodInfo,
}

/// Parse an IANA timezone identifier
pub fn parse_timezone(timezone: &str) -> Result<Tz, TimeframeError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| TimeframeError::InvalidTimezone(timezone.to_string()))
}

/// Local calendar date a reference string denotes in `timezone`
///
/// Accepts an RFC 3339 instant, a naive ISO date-time (seconds optional)
/// or a plain ISO date.
pub fn parse_reference_date(reference: &str, timezone: Tz) -> Result<NaiveDate, TimeframeError> {
    let value = reference.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&timezone).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(local) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(local.date());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TimeframeError::InvalidReferenceDate(reference.to_string()))
}

/// Current calendar date in `timezone`
pub fn local_today(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

/// Resolve keyword, timezone and optional reference into a window
///
/// Without a reference date the window contains "now" in `timezone`.
pub fn calculate_date_range(
    timeframe: &str,
    timezone: &str,
    reference_date: Option<&str>,
) -> Result<DateRange, TimeframeError> {
    let timeframe: Timeframe = timeframe.parse()?;
    let tz = parse_timezone(timezone)?;
    let date = match reference_date {
        Some(reference) => parse_reference_date(reference, tz)?,
        None => local_today(tz),
    };

    resolve_timeframe(timeframe, tz, date)
}

/// Resolve a typed timeframe around a local reference date
pub fn resolve_timeframe(timeframe: Timeframe, tz: Tz, date: NaiveDate) -> Result<DateRange, TimeframeError> {
    let (first_day, last_day, period) = match timeframe {
        Timeframe::Daily => (
            date,
            date,
            PeriodInfo::Daily {
                date,
                display_name: long_date(date),
            },
        ),
        Timeframe::Weekly => {
            let week_start = start_of_week(date)?;
            let week_end = week_start
                .checked_add_days(Days::new(6))
                .ok_or(TimeframeError::DateOutOfRange(week_start))?;
            (
                week_start,
                week_end,
                PeriodInfo::Weekly {
                    week_start,
                    week_end,
                    display_name: format!("Week of {}", long_date(week_start)),
                },
            )
        }
        Timeframe::Monthly => {
            let month_start = start_of_month(date)?;
            let month_end = end_of_month(date)?;
            (
                month_start,
                month_end,
                PeriodInfo::Monthly {
                    month_start,
                    month_end,
                    display_name: month_start.format("%B %Y").to_string(),
                },
            )
        }
        Timeframe::AllTime => (
            fixed_date(1900, 1, 1)?,
            fixed_date(2100, 12, 31)?,
            PeriodInfo::AllTime {
                display_name: "All Time".to_string(),
            },
        ),
    };

    Ok(DateRange {
        start: start_of_day(first_day, tz)?,
        end: end_of_day(last_day, tz)?,
        period,
    })
}

/// Monday of the ISO week containing `date`
pub fn start_of_week(date: NaiveDate) -> Result<NaiveDate, TimeframeError> {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
        .ok_or(TimeframeError::DateOutOfRange(date))
}

/// First day of the month containing `date`
pub fn start_of_month(date: NaiveDate) -> Result<NaiveDate, TimeframeError> {
    date.with_day(1).ok_or(TimeframeError::DateOutOfRange(date))
}

/// Last day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> Result<NaiveDate, TimeframeError> {
    start_of_month(date)?
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or(TimeframeError::DateOutOfRange(date))
}

/// First instant of a local day
///
/// When local midnight does not exist (a DST gap) the day starts at the
/// transition, the first valid local instant after midnight.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, TimeframeError> {
    let midnight = date.and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(start) => Ok(start.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let previous_day = midnight
                .checked_sub_signed(Duration::days(1))
                .ok_or(TimeframeError::DateOutOfRange(date))?;
            let offset = tz.offset_from_utc_datetime(&previous_day).fix();
            let transition = midnight
                .checked_sub_signed(Duration::seconds(offset.local_minus_utc() as i64))
                .ok_or(TimeframeError::DateOutOfRange(date))?;
            Ok(Utc.from_utc_datetime(&transition))
        }
    }
}

/// Last instant of a local day, one microsecond before the next day starts
pub fn end_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, TimeframeError> {
    let next_day = date.succ_opt().ok_or(TimeframeError::DateOutOfRange(date))?;
    Ok(start_of_day(next_day, tz)? - Duration::microseconds(1))
}

/// Long-form calendar date, e.g. "January 5, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn fixed_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, TimeframeError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeframeError::InvalidReferenceDate(format!("{year}-{month}-{day}")))
}
