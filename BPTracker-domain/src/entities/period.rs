use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::timeframe::TimeframeError;

/// Named aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl Timeframe {
    /// Keyword accepted on input and emitted as the period `type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::AllTime => "all_time",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    /// Case-insensitive keyword parsing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            "all_time" => Ok(Timeframe::AllTime),
            _ => Err(TimeframeError::InvalidTimeframe(s.to_string())),
        }
    }
}

/// Description of the bucket a result covers, tagged by timeframe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeriodInfo {
    Daily {
        date: NaiveDate,
        display_name: String,
    },
    Weekly {
        week_start: NaiveDate,
        week_end: NaiveDate,
        display_name: String,
    },
    Monthly {
        month_start: NaiveDate,
        month_end: NaiveDate,
        display_name: String,
    },
    AllTime {
        display_name: String,
    },
}

impl PeriodInfo {
    pub fn timeframe(&self) -> Timeframe {
        match self {
            PeriodInfo::Daily { .. } => Timeframe::Daily,
            PeriodInfo::Weekly { .. } => Timeframe::Weekly,
            PeriodInfo::Monthly { .. } => Timeframe::Monthly,
            PeriodInfo::AllTime { .. } => Timeframe::AllTime,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PeriodInfo::Daily { display_name, .. }
            | PeriodInfo::Weekly { display_name, .. }
            | PeriodInfo::Monthly { display_name, .. }
            | PeriodInfo::AllTime { display_name } => display_name,
        }
    }

    pub fn set_display_name(&mut self, name: String) {
        match self {
            PeriodInfo::Daily { display_name, .. }
            | PeriodInfo::Weekly { display_name, .. }
            | PeriodInfo::Monthly { display_name, .. }
            | PeriodInfo::AllTime { display_name } => *display_name = name,
        }
    }
}
