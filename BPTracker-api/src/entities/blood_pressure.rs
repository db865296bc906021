use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use bp_tracker_data::models::{Arm, RawReading};
use bp_tracker_domain::entities::conversions::convert_to_canonical_reading;
use bp_tracker_domain::entities::{AveragesResult, BloodPressureCategory, Summary};
use bp_tracker_domain::services::insights::categorize_stats;

/// Span text used when there is nothing to measure
pub const SHORT_SPAN: &str = "< 1m or only 1 reading";

/// Request payload for recording a new reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReadingRequest {
    /// Arm the reading was taken on
    pub arm: Arm,

    /// Systolic blood pressure (the higher number)
    pub systolic: i32,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: i32,

    /// When the reading was taken. Defaults to current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,

    /// Zone for the follow-up daily averages (default: configured zone)
    pub timezone: Option<String>,
}

/// Public representation of a stored reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub id: i64,
    pub user_id: i64,
    pub arm: Option<Arm>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&RawReading> for ReadingResponse {
    fn from(raw: &RawReading) -> Self {
        let canonical = convert_to_canonical_reading(raw);
        Self {
            id: raw.id,
            user_id: raw.user_id,
            arm: canonical.map(|r| r.arm),
            systolic: canonical.map(|r| r.systolic),
            diastolic: canonical.map(|r| r.diastolic),
            created_at: raw.created_at,
        }
    }
}

/// Averages for one period, with category and measurement span
#[derive(Debug, Clone, Serialize)]
pub struct AveragesResponse {
    #[serde(flatten)]
    pub averages: AveragesResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BloodPressureCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_span: Option<String>,
}

impl From<AveragesResult> for AveragesResponse {
    fn from(averages: AveragesResult) -> Self {
        let category = categorize_stats(&averages.stats);
        let measurement_span = match (averages.first_reading_at, averages.last_reading_at) {
            (Some(first), Some(last)) => Some(format_measurement_span(first, last)),
            _ => None,
        };

        Self {
            category,
            category_label: category.map(|c| c.label()),
            measurement_span,
            averages,
        }
    }
}

/// Response for a newly recorded reading
///
/// `daily_averages` is omitted when the reading was stored but its day
/// could not be averaged afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReadingResponse {
    pub reading: ReadingResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_averages: Option<AveragesResponse>,
}

/// Summary of the four standard timeframes
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub today: AveragesResponse,
    pub this_week: AveragesResponse,
    pub this_month: AveragesResponse,
    pub all_time: AveragesResponse,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            today: summary.today.into(),
            this_week: summary.this_week.into(),
            this_month: summary.this_month.into(),
            all_time: summary.all_time.into(),
        }
    }
}

/// Query parameters for the averages endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AveragesQuery {
    /// `daily` (default), `weekly`, `monthly` or `all_time`
    pub period: Option<String>,

    /// Reference date or instant (default: now)
    pub date: Option<String>,

    pub timezone: Option<String>,
}

/// Query parameters for the summary endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryQuery {
    pub timezone: Option<String>,
}

/// Query parameters for the range endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQuery {
    /// `day` (default), `week` or `month`
    pub granularity: Option<String>,

    /// Inclusive start date
    pub start: String,

    /// Inclusive end date
    pub end: String,

    pub timezone: Option<String>,
}

/// Human readable distance between the first and last reading, e.g. `1d 2h 3m`
pub fn format_measurement_span(first: DateTime<FixedOffset>, last: DateTime<FixedOffset>) -> String {
    let span = last.signed_duration_since(first);
    let parts: Vec<String> = [
        (span.num_days(), "d"),
        (span.num_hours() % 24, "h"),
        (span.num_minutes() % 60, "m"),
    ]
    .iter()
    .filter(|(value, _)| *value > 0)
    .map(|(value, unit)| format!("{}{}", value, unit))
    .collect();

    if parts.is_empty() {
        SHORT_SPAN.to_string()
    } else {
        parts.join(" ")
    }
}
