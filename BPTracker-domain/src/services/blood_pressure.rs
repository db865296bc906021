use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, error, info};
use validator::Validate;

use bp_tracker_data::models::RawReading;
use bp_tracker_data::repository::{ReadingRepositoryTrait, RepositoryError};

use crate::entities::blood_pressure::{AveragesResult, CreateReadingRequest, Summary};
use crate::entities::conversions;
use crate::entities::period::Timeframe;
use crate::health::{self, SystemHealth};
use crate::services::aggregator::calculate_averages;
use crate::services::range::{bucket_dates, Granularity, MAX_RANGE_BUCKETS};
use crate::services::timeframe::{
    local_today, parse_reference_date, parse_timezone, resolve_timeframe, TimeframeError,
};

/// Blood pressure service errors
#[derive(Debug, Error)]
pub enum BloodPressureServiceError {
    /// Unrecognized timeframe keyword
    #[error("Invalid timeframe: {0}. Must be 'daily', 'weekly', 'monthly', or 'all_time'")]
    InvalidTimeframe(String),

    /// Unknown IANA timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Reference or range date that could not be parsed
    #[error("Invalid reference date: {0}")]
    InvalidReferenceDate(String),

    /// Range would expand into more buckets than one call may fetch
    #[error("Range of {buckets} {granularity} buckets exceeds the limit of {max}")]
    RangeTooLarge {
        granularity: Granularity,
        buckets: usize,
        max: usize,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage failed or timed out
    #[error("Storage unavailable during {operation} for user {user_id}: {source}")]
    StorageUnavailable {
        user_id: i64,
        operation: String,
        #[source]
        source: RepositoryError,
    },
}

impl BloodPressureServiceError {
    /// Whether the error was caused by caller input
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, BloodPressureServiceError::StorageUnavailable { .. })
    }
}

impl From<TimeframeError> for BloodPressureServiceError {
    fn from(err: TimeframeError) -> Self {
        match err {
            TimeframeError::InvalidTimeframe(value) => BloodPressureServiceError::InvalidTimeframe(value),
            TimeframeError::InvalidTimezone(value) => BloodPressureServiceError::InvalidTimezone(value),
            TimeframeError::InvalidReferenceDate(value) => BloodPressureServiceError::InvalidReferenceDate(value),
            TimeframeError::DateOutOfRange(date) => BloodPressureServiceError::InvalidReferenceDate(date.to_string()),
        }
    }
}

/// Trait for blood pressure service operations
#[async_trait]
pub trait BloodPressureServiceTrait: Send + Sync {
    /// Validate a create reading request
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), BloodPressureServiceError>;

    /// Validate and store a new single-arm reading
    async fn record_reading(&self, request: CreateReadingRequest) -> Result<RawReading, BloodPressureServiceError>;

    /// Averages of one timeframe around a reference date (default: now)
    async fn get_averages(
        &self,
        user_id: i64,
        timeframe: &str,
        timezone: &str,
        reference_date: Option<&str>,
    ) -> Result<AveragesResult, BloodPressureServiceError>;

    /// Today, this week, this month and all time, fetched concurrently
    async fn get_summary(&self, user_id: i64, timezone: &str) -> Result<Summary, BloodPressureServiceError>;

    /// One daily result per day between `start_date` and `end_date`
    async fn get_daily_averages_range(
        &self,
        user_id: i64,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError>;

    /// One weekly result per ISO week touched by the range
    async fn get_weekly_averages_range(
        &self,
        user_id: i64,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError>;

    /// One monthly result per calendar month touched by the range
    async fn get_monthly_averages_range(
        &self,
        user_id: i64,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError>;

    /// Health of the service and its storage
    async fn health(&self) -> SystemHealth;
}

/// Blood pressure service for domain logic
pub struct BloodPressureService<R: ReadingRepositoryTrait> {
    repository: R,
}

impl<R: ReadingRepositoryTrait> BloodPressureService<R> {
    /// Create a new blood pressure service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Averages for a typed timeframe around a local date
    pub async fn averages_for(
        &self,
        user_id: i64,
        timeframe: Timeframe,
        tz: Tz,
        date: NaiveDate,
    ) -> Result<AveragesResult, BloodPressureServiceError> {
        let range = resolve_timeframe(timeframe, tz, date)?;
        debug!(
            "Resolved {} window for user {}: {} to {}",
            timeframe, user_id, range.start, range.end
        );

        let fetched = match timeframe {
            Timeframe::AllTime => self.repository.fetch_all_readings(user_id).await,
            _ => {
                self.repository
                    .fetch_readings_in_window(user_id, range.start, range.end)
                    .await
            }
        };
        let raw_readings = fetched.map_err(|source| {
            error!("Failed to fetch {} readings for user {}: {}", timeframe, user_id, source);
            BloodPressureServiceError::StorageUnavailable {
                user_id,
                operation: timeframe.to_string(),
                source,
            }
        })?;

        let readings: Vec<_> = raw_readings
            .iter()
            .filter_map(conversions::convert_to_canonical_reading)
            .collect();
        let stats = calculate_averages(&readings);

        let first_reading_at = raw_readings
            .first()
            .map(|r| conversions::convert_to_zoned(r.created_at, tz));
        let last_reading_at = raw_readings
            .last()
            .map(|r| conversions::convert_to_zoned(r.created_at, tz));

        let mut period = range.period;
        if let (Timeframe::AllTime, Some(first), Some(last)) = (timeframe, first_reading_at, last_reading_at) {
            period.set_display_name(format!(
                "All Time ({} - {})",
                first.format("%b %Y"),
                last.format("%b %Y")
            ));
        }

        debug!(
            "Averaged {} of {} fetched rows for user {} ({})",
            readings.len(),
            raw_readings.len(),
            user_id,
            period.display_name()
        );

        Ok(AveragesResult {
            period,
            stats,
            period_start: conversions::convert_to_zoned(range.start, tz),
            period_end: conversions::convert_to_zoned(range.end, tz),
            first_reading_at,
            last_reading_at,
        })
    }

    /// Averages for each bucket of a range, awaited one after another
    pub async fn averages_range(
        &self,
        user_id: i64,
        granularity: Granularity,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError> {
        let tz = parse_timezone(timezone)?;
        let start = parse_reference_date(start_date, tz)?;
        let end = parse_reference_date(end_date, tz)?;

        let dates = bucket_dates(granularity, start, end)?;
        debug!(
            "Expanding {} range {} to {} for user {} into {} buckets",
            granularity,
            start,
            end,
            user_id,
            dates.len()
        );
        if dates.len() > MAX_RANGE_BUCKETS {
            return Err(BloodPressureServiceError::RangeTooLarge {
                granularity,
                buckets: dates.len(),
                max: MAX_RANGE_BUCKETS,
            });
        }

        let mut results = Vec::with_capacity(dates.len());
        for date in dates {
            results.push(self.averages_for(user_id, granularity.timeframe(), tz, date).await?);
        }

        Ok(results)
    }
}

#[async_trait]
impl<R: ReadingRepositoryTrait> BloodPressureServiceTrait for BloodPressureService<R> {
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), BloodPressureServiceError> {
        if let Err(validation_errors) = request.validate() {
            let error_message = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            return Err(BloodPressureServiceError::Validation(error_message));
        }

        if request.systolic <= request.diastolic {
            return Err(BloodPressureServiceError::Validation(
                "Systolic pressure must be greater than diastolic pressure".to_string(),
            ));
        }

        Ok(())
    }

    async fn record_reading(&self, request: CreateReadingRequest) -> Result<RawReading, BloodPressureServiceError> {
        info!(
            "Recording {} arm reading {}/{} for user {}",
            request.arm, request.systolic, request.diastolic, request.user_id
        );
        self.validate_create_request(&request)?;

        let new_reading = conversions::convert_to_new_reading(&request);
        let stored = self
            .repository
            .insert_reading(new_reading)
            .await
            .map_err(|source| {
                error!("Failed to store reading for user {}: {}", request.user_id, source);
                BloodPressureServiceError::StorageUnavailable {
                    user_id: request.user_id,
                    operation: "insert".to_string(),
                    source,
                }
            })?;

        info!("Stored reading {} for user {}", stored.id, stored.user_id);
        Ok(stored)
    }

    async fn get_averages(
        &self,
        user_id: i64,
        timeframe: &str,
        timezone: &str,
        reference_date: Option<&str>,
    ) -> Result<AveragesResult, BloodPressureServiceError> {
        let timeframe: Timeframe = timeframe.parse()?;
        let tz = parse_timezone(timezone)?;
        let date = match reference_date {
            Some(reference) => parse_reference_date(reference, tz)?,
            None => local_today(tz),
        };

        self.averages_for(user_id, timeframe, tz, date).await
    }

    async fn get_summary(&self, user_id: i64, timezone: &str) -> Result<Summary, BloodPressureServiceError> {
        let tz = parse_timezone(timezone)?;
        let today = local_today(tz);
        debug!("Building summary for user {} on {} ({})", user_id, today, tz.name());

        let (today, this_week, this_month, all_time) = tokio::try_join!(
            self.averages_for(user_id, Timeframe::Daily, tz, today),
            self.averages_for(user_id, Timeframe::Weekly, tz, today),
            self.averages_for(user_id, Timeframe::Monthly, tz, today),
            self.averages_for(user_id, Timeframe::AllTime, tz, today),
        )?;

        Ok(Summary {
            today,
            this_week,
            this_month,
            all_time,
        })
    }

    async fn get_daily_averages_range(
        &self,
        user_id: i64,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError> {
        self.averages_range(user_id, Granularity::Day, timezone, start_date, end_date)
            .await
    }

    async fn get_weekly_averages_range(
        &self,
        user_id: i64,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError> {
        self.averages_range(user_id, Granularity::Week, timezone, start_date, end_date)
            .await
    }

    async fn get_monthly_averages_range(
        &self,
        user_id: i64,
        timezone: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AveragesResult>, BloodPressureServiceError> {
        self.averages_range(user_id, Granularity::Month, timezone, start_date, end_date)
            .await
    }

    async fn health(&self) -> SystemHealth {
        health::get_system_health(&self.repository).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_data::models::Arm;
    use bp_tracker_data::repository::{BloodPressureRepository, InMemoryStorage, MockReadingRepositoryTrait};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const USER: i64 = 284_991_234_567_890_123;
    const LA: &str = "America/Los_Angeles";

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn raw(id: i64, created_at: DateTime<Utc>, left: Option<(i32, i32)>, right: Option<(i32, i32)>) -> RawReading {
        RawReading {
            id,
            user_id: USER,
            created_at,
            l_systolic: left.map(|l| l.0),
            l_diastolic: left.map(|l| l.1),
            r_systolic: right.map(|r| r.0),
            r_diastolic: right.map(|r| r.1),
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("bp_tracker_domain=debug")
            .with_test_writer()
            .try_init();
    }

    async fn seeded_service(rows: Vec<RawReading>) -> BloodPressureService<BloodPressureRepository> {
        init_tracing();
        let storage = InMemoryStorage::new();
        for row in rows {
            storage.store_raw(row).await.unwrap();
        }
        BloodPressureService::new(BloodPressureRepository::with_storage(storage))
    }

    fn storage_error() -> RepositoryError {
        RepositoryError::Lock("connection reset".to_string())
    }

    fn request(systolic: i32, diastolic: i32) -> CreateReadingRequest {
        CreateReadingRequest {
            user_id: USER,
            arm: Arm::Left,
            systolic,
            diastolic,
            created_at: utc(2024, 1, 15, 17, 0),
        }
    }

    #[tokio::test]
    async fn test_daily_averages_in_los_angeles() {
        // Jan 15 local is 08:00Z on the 15th to 07:59:59.999999Z on the 16th
        let service = seeded_service(vec![
            raw(1, utc(2024, 1, 15, 16, 0), Some((118, 76)), None),
            raw(2, utc(2024, 1, 15, 20, 0), Some((122, 80)), None),
            raw(3, utc(2024, 1, 16, 3, 0), None, Some((130, 85))),
            raw(4, utc(2024, 1, 16, 9, 0), Some((200, 100)), None),
            raw(5, utc(2024, 1, 15, 7, 0), Some((90, 60)), None),
        ])
        .await;

        let result = service
            .get_averages(USER, "daily", LA, Some("2024-01-15"))
            .await
            .unwrap();

        assert_eq!(result.display_name(), "January 15, 2024");
        assert_eq!(result.reading_count(), 3);
        assert_eq!(result.stats.combined.avg_systolic, Some(123.33));
        assert_eq!(result.stats.combined.avg_diastolic, Some(80.33));
        assert_eq!(result.stats.left.avg_systolic, Some(120.0));
        assert_eq!(result.stats.left.avg_diastolic, Some(78.0));
        assert_eq!(result.stats.left.reading_count, 2);
        assert_eq!(result.stats.right.avg_systolic, Some(130.0));
        assert_eq!(result.stats.right.reading_count, 1);

        assert_eq!(result.period_start.to_rfc3339(), "2024-01-15T00:00:00-08:00");
        assert_eq!(result.first_reading_at.unwrap().to_rfc3339(), "2024-01-15T08:00:00-08:00");
        assert_eq!(result.last_reading_at.unwrap().to_rfc3339(), "2024-01-15T19:00:00-08:00");
    }

    #[tokio::test]
    async fn test_reading_on_window_end_is_included() {
        let end = utc(2024, 1, 16, 7, 59) + Duration::seconds(59) + Duration::microseconds(999_999);
        let service = seeded_service(vec![
            raw(1, end, None, Some((140, 90))),
            raw(2, end + Duration::microseconds(1), None, Some((100, 60))),
        ])
        .await;

        let result = service
            .get_averages(USER, "daily", LA, Some("2024-01-15"))
            .await
            .unwrap();
        assert_eq!(result.reading_count(), 1);
        assert_eq!(result.stats.right.avg_systolic, Some(140.0));
        assert_eq!(result.period_end.with_timezone(&Utc), end);
    }

    #[tokio::test]
    async fn test_empty_window_is_not_an_error() {
        let service = seeded_service(Vec::new()).await;

        let result = service
            .get_averages(USER, "weekly", LA, Some("2024-01-10"))
            .await
            .unwrap();

        assert_eq!(result.display_name(), "Week of January 8, 2024");
        assert_eq!(result.reading_count(), 0);
        assert!(result.stats.combined.avg_systolic.is_none());
        assert!(result.first_reading_at.is_none());
        assert!(result.last_reading_at.is_none());
    }

    #[tokio::test]
    async fn test_all_time_display_name_spans_first_and_last_rows() {
        let service = seeded_service(vec![
            raw(1, utc(2023, 11, 3, 18, 0), Some((120, 80)), None),
            raw(2, utc(2024, 2, 1, 6, 0), None, Some((124, 82))),
        ])
        .await;

        let result = service.get_averages(USER, "all_time", LA, None).await.unwrap();

        // the last row is still January 31 in Los Angeles
        assert_eq!(result.display_name(), "All Time (Nov 2023 - Jan 2024)");
        assert_eq!(result.reading_count(), 2);
        assert_eq!(result.stats.combined.avg_systolic, Some(122.0));
    }

    #[tokio::test]
    async fn test_all_time_without_rows_keeps_plain_name() {
        let service = seeded_service(Vec::new()).await;
        let result = service.get_averages(USER, "ALL_TIME", LA, None).await.unwrap();
        assert_eq!(result.display_name(), "All Time");
        assert_eq!(result.reading_count(), 0);
    }

    #[tokio::test]
    async fn test_both_pairs_complete_counts_left_only() {
        let service = seeded_service(vec![raw(1, utc(2024, 1, 15, 18, 0), Some((118, 76)), Some((140, 95)))]).await;

        let result = service
            .get_averages(USER, "daily", LA, Some("2024-01-15"))
            .await
            .unwrap();
        assert_eq!(result.stats.left.reading_count, 1);
        assert_eq!(result.stats.right.reading_count, 0);
        assert_eq!(result.stats.combined.avg_systolic, Some(118.0));
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_rejected() {
        let service = seeded_service(Vec::new()).await;

        let err = service.get_averages(USER, "yearly", LA, None).await.unwrap_err();
        assert!(matches!(err, BloodPressureServiceError::InvalidTimeframe(ref v) if v == "yearly"));
        assert!(err.to_string().contains("yearly"));

        let err = service.get_averages(USER, "daily", "Nowhere/Land", None).await.unwrap_err();
        assert!(matches!(err, BloodPressureServiceError::InvalidTimezone(_)));

        let err = service
            .get_averages(USER, "daily", LA, Some("15/01/2024"))
            .await
            .unwrap_err();
        assert!(matches!(err, BloodPressureServiceError::InvalidReferenceDate(_)));
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_storage_failure_becomes_storage_unavailable() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo
            .expect_fetch_readings_in_window()
            .times(1)
            .returning(|_, _, _| Err(storage_error()));
        let service = BloodPressureService::new(mock_repo);

        let err = service
            .get_averages(USER, "monthly", LA, Some("2024-02-10"))
            .await
            .unwrap_err();

        match &err {
            BloodPressureServiceError::StorageUnavailable { user_id, operation, .. } => {
                assert_eq!(*user_id, USER);
                assert_eq!(operation, "monthly");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_all_time_uses_unbounded_fetch() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo.expect_fetch_readings_in_window().never();
        mock_repo
            .expect_fetch_all_readings()
            .withf(|user_id| *user_id == USER)
            .times(1)
            .returning(|_| Ok(vec![raw(1, utc(2024, 3, 1, 20, 0), None, Some((120, 70)))]));
        let service = BloodPressureService::new(mock_repo);

        let result = service.get_averages(USER, "all_time", LA, None).await.unwrap();
        assert_eq!(result.display_name(), "All Time (Mar 2024 - Mar 2024)");
    }

    #[tokio::test]
    async fn test_summary_collects_all_four_timeframes() {
        let now = Utc::now();
        let service = seeded_service(vec![raw(1, now - Duration::seconds(1), Some((126, 78)), None)]).await;

        let summary = service.get_summary(USER, LA).await.unwrap();
        assert_eq!(summary.today.timeframe(), Timeframe::Daily);
        assert_eq!(summary.this_week.timeframe(), Timeframe::Weekly);
        assert_eq!(summary.this_month.timeframe(), Timeframe::Monthly);
        assert_eq!(summary.all_time.timeframe(), Timeframe::AllTime);
        assert_eq!(summary.all_time.reading_count(), 1);
        assert_eq!(summary.all_time.stats.left.avg_systolic, Some(126.0));
    }

    #[tokio::test]
    async fn test_summary_fails_when_storage_fails() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo
            .expect_fetch_readings_in_window()
            .returning(|_, _, _| Ok(Vec::new()));
        mock_repo.expect_fetch_all_readings().returning(|_| Err(storage_error()));
        let service = BloodPressureService::new(mock_repo);

        let err = service.get_summary(USER, LA).await.unwrap_err();
        assert!(matches!(err, BloodPressureServiceError::StorageUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_daily_range_yields_one_result_per_day() {
        let service = seeded_service(vec![
            raw(1, utc(2024, 1, 1, 18, 0), Some((120, 80)), None),
            raw(2, utc(2024, 1, 3, 18, 0), Some((130, 84)), None),
        ])
        .await;

        let results = service
            .get_daily_averages_range(USER, LA, "2024-01-01", "2024-01-03")
            .await
            .unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.display_name()).collect();
        assert_eq!(names, vec!["January 1, 2024", "January 2, 2024", "January 3, 2024"]);
        let counts: Vec<usize> = results.iter().map(|r| r.reading_count()).collect();
        assert_eq!(counts, vec![1, 0, 1]);
    }

    #[tokio::test]
    async fn test_weekly_and_monthly_ranges() {
        let service = seeded_service(Vec::new()).await;

        let weeks = service
            .get_weekly_averages_range(USER, LA, "2024-01-07", "2024-01-15")
            .await
            .unwrap();
        let names: Vec<&str> = weeks.iter().map(|r| r.display_name()).collect();
        assert_eq!(
            names,
            vec!["Week of January 1, 2024", "Week of January 8, 2024", "Week of January 15, 2024"]
        );

        let months = service
            .get_monthly_averages_range(USER, LA, "2024-01-31", "2024-03-01")
            .await
            .unwrap();
        let names: Vec<&str> = months.iter().map(|r| r.display_name()).collect();
        assert_eq!(names, vec!["January 2024", "February 2024", "March 2024"]);

        let empty = service
            .get_daily_averages_range(USER, LA, "2024-03-02", "2024-03-01")
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_range_stops_at_first_storage_failure() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        let mut sequence = mockall::Sequence::new();
        mock_repo
            .expect_fetch_readings_in_window()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _, _| Ok(Vec::new()));
        mock_repo
            .expect_fetch_readings_in_window()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _, _| Err(storage_error()));
        let service = BloodPressureService::new(mock_repo);

        let err = service
            .get_daily_averages_range(USER, LA, "2024-01-01", "2024-01-05")
            .await
            .unwrap_err();
        assert!(matches!(err, BloodPressureServiceError::StorageUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_oversized_range_is_rejected_before_fetching() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo.expect_fetch_readings_in_window().never();
        let service = BloodPressureService::new(mock_repo);

        let err = service
            .get_daily_averages_range(USER, LA, "1900-01-01", "2100-12-31")
            .await
            .unwrap_err();
        match &err {
            BloodPressureServiceError::RangeTooLarge { granularity, buckets, max } => {
                assert_eq!(*granularity, Granularity::Day);
                assert_eq!(*max, MAX_RANGE_BUCKETS);
                assert!(*buckets > 73_000);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_range_at_the_bucket_limit_is_served() {
        let service = seeded_service(Vec::new()).await;
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = start + Duration::days(MAX_RANGE_BUCKETS as i64 - 1);

        let results = service
            .get_daily_averages_range(USER, "UTC", &start.to_string(), &end.to_string())
            .await
            .unwrap();
        assert_eq!(results.len(), MAX_RANGE_BUCKETS);
    }

    #[tokio::test]
    async fn test_record_reading_then_daily_average() {
        let service = seeded_service(Vec::new()).await;

        let stored = service.record_reading(request(135, 88)).await.unwrap();
        assert_eq!(stored.l_systolic, Some(135));
        assert_eq!(stored.r_systolic, None);

        let result = service
            .get_averages(USER, "daily", LA, Some(&stored.created_at.to_rfc3339()))
            .await
            .unwrap();
        assert_eq!(result.display_name(), "January 15, 2024");
        assert_eq!(result.stats.left.avg_systolic, Some(135.0));
    }

    #[test]
    fn test_validate_create_request() {
        let service = BloodPressureService::new(MockReadingRepositoryTrait::new());

        assert!(service.validate_create_request(&request(120, 80)).is_ok());

        let err = service.validate_create_request(&request(350, 80)).unwrap_err();
        assert!(err.to_string().contains("Systolic"));

        let err = service.validate_create_request(&request(120, 250)).unwrap_err();
        assert!(err.to_string().contains("Diastolic"));

        let err = service.validate_create_request(&request(80, 80)).unwrap_err();
        assert!(err.to_string().contains("greater than"));
    }

    #[tokio::test]
    async fn test_invalid_reading_is_never_stored() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo.expect_insert_reading().never();
        let service = BloodPressureService::new(mock_repo);

        let err = service.record_reading(request(70, 90)).await.unwrap_err();
        assert!(matches!(err, BloodPressureServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_insert_failure_becomes_storage_unavailable() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo.expect_insert_reading().returning(|_| Err(storage_error()));
        let service = BloodPressureService::new(mock_repo);

        let err = service.record_reading(request(120, 80)).await.unwrap_err();
        assert!(matches!(
            err,
            BloodPressureServiceError::StorageUnavailable { ref operation, .. } if operation == "insert"
        ));
    }
}
