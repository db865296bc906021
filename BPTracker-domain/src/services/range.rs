use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};

use crate::entities::period::Timeframe;
use crate::services::timeframe::{start_of_month, start_of_week, TimeframeError};

/// Most buckets a single range call expands into
pub const MAX_RANGE_BUCKETS: usize = 1_000;

/// Step size of a range expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Timeframe each bucket is averaged over
    pub fn timeframe(&self) -> Timeframe {
        match self {
            Granularity::Day => Timeframe::Daily,
            Granularity::Week => Timeframe::Weekly,
            Granularity::Month => Timeframe::Monthly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(TimeframeError::InvalidTimeframe(s.to_string())),
        }
    }
}

/// Reference dates of every bucket between `start` and `end`, inclusive
///
/// Weekly and monthly walks snap both ends to the start of their week or
/// month, so the bucket containing `end` is always included.
pub fn bucket_dates(
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<NaiveDate>, TimeframeError> {
    if start > end {
        return Ok(Vec::new());
    }

    let (mut current, last) = match granularity {
        Granularity::Day => (start, end),
        Granularity::Week => (start_of_week(start)?, start_of_week(end)?),
        Granularity::Month => (start_of_month(start)?, start_of_month(end)?),
    };

    let mut dates = Vec::new();
    while current <= last {
        dates.push(current);
        current = match granularity {
            Granularity::Day => current.succ_opt(),
            Granularity::Week => current.checked_add_days(Days::new(7)),
            Granularity::Month => current.checked_add_months(Months::new(1)),
        }
        .ok_or(TimeframeError::DateOutOfRange(current))?;
    }

    Ok(dates)
}
