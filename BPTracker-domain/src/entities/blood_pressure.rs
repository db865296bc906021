use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use validator::Validate;

pub use bp_tracker_data::models::Arm;

use super::period::{PeriodInfo, Timeframe};

/// A single arm-tagged measurement used in aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalReading {
    pub arm: Arm,
    pub systolic: i32,
    pub diastolic: i32,
    pub timestamp: DateTime<Utc>,
}

/// Request to record a single-arm reading
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateReadingRequest {
    pub user_id: i64,

    pub arm: Arm,

    /// Systolic pressure (mmHg)
    #[validate(range(min = 40, max = 300, message = "Systolic pressure must be between 40 and 300"))]
    pub systolic: i32,

    /// Diastolic pressure (mmHg)
    #[validate(range(min = 20, max = 200, message = "Diastolic pressure must be between 20 and 200"))]
    pub diastolic: i32,

    /// When the reading was taken
    pub created_at: DateTime<Utc>,
}

/// Mean values and count for one subset of readings
///
/// Means are `None` whenever `reading_count` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ArmAverages {
    pub avg_systolic: Option<f64>,
    pub avg_diastolic: Option<f64>,
    pub reading_count: usize,
}

/// Combined and per-arm statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AverageStats {
    pub combined: ArmAverages,
    pub left: ArmAverages,
    pub right: ArmAverages,
}

/// Averages for one period, with its boundaries in the request timezone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragesResult {
    #[serde(flatten)]
    pub period: PeriodInfo,

    #[serde(flatten)]
    pub stats: AverageStats,

    /// Inclusive start of the window
    pub period_start: DateTime<FixedOffset>,

    /// Inclusive end of the window
    pub period_end: DateTime<FixedOffset>,

    /// Creation instant of the first fetched row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_reading_at: Option<DateTime<FixedOffset>>,

    /// Creation instant of the last fetched row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reading_at: Option<DateTime<FixedOffset>>,
}

impl AveragesResult {
    pub fn timeframe(&self) -> Timeframe {
        self.period.timeframe()
    }

    pub fn display_name(&self) -> &str {
        self.period.display_name()
    }

    pub fn reading_count(&self) -> usize {
        self.stats.combined.reading_count
    }
}

/// Averages for the current day, week, month and all time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub today: AveragesResult,
    pub this_week: AveragesResult,
    pub this_month: AveragesResult,
    pub all_time: AveragesResult,
}

/// Blood pressure category based on measurements
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    /// Systolic < 120 and diastolic < 80
    Normal,

    /// Systolic 120-129 and diastolic < 80
    Elevated,

    /// Systolic 130-139 or diastolic 80-89
    Stage1High,

    /// Systolic >= 140 or diastolic >= 90
    Stage2High,

    /// Values that fall through every threshold
    Unknown,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Stage1High => "Stage 1 High",
            BloodPressureCategory::Stage2High => "Stage 2 High",
            BloodPressureCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
