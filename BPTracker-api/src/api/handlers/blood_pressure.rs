use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use bp_tracker_domain::entities::CreateReadingRequest as DomainCreateReadingRequest;
use bp_tracker_domain::services::range::Granularity;

use crate::api::AppState;
use crate::entities::blood_pressure::{
    AveragesQuery, AveragesResponse, CreateReadingRequest, CreateReadingResponse, RangeQuery, ReadingResponse,
    SummaryQuery, SummaryResponse,
};
use crate::entities::common::ErrorResponse;

/// Record a reading, then report the daily averages of its day
#[instrument(skip(state, request))]
pub async fn create_reading(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<CreateReadingRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Recording blood pressure reading for user {}", user_id);

    let timezone = state.timezone(request.timezone.as_deref()).to_string();
    let domain_request = convert_to_domain_request(user_id, request);

    let stored = state.service.record_reading(domain_request).await?;
    info!("Blood pressure reading created with ID: {}", stored.id);

    // Reading is stored; a failed follow-up fetch only drops the averages
    let reference = stored.created_at.to_rfc3339();
    let daily_averages = match state
        .service
        .get_averages(user_id, "daily", &timezone, Some(&reference))
        .await
    {
        Ok(averages) => Some(averages.into()),
        Err(e) => {
            warn!("Reading {} stored but daily averages unavailable: {}", stored.id, e);
            None
        }
    };

    let response = CreateReadingResponse {
        reading: ReadingResponse::from(&stored),
        daily_averages,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Averages of one timeframe
#[instrument(skip(state))]
pub async fn get_averages(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<AveragesQuery>,
) -> Result<Json<AveragesResponse>, ErrorResponse> {
    let period = params.period.as_deref().unwrap_or("daily");
    let timezone = state.timezone(params.timezone.as_deref());

    let averages = state
        .service
        .get_averages(user_id, period, timezone, params.date.as_deref())
        .await?;

    Ok(Json(averages.into()))
}

/// Today, this week, this month and all time
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ErrorResponse> {
    let timezone = state.timezone(params.timezone.as_deref());
    let summary = state.service.get_summary(user_id, timezone).await?;
    Ok(Json(summary.into()))
}

/// One averages result per day, week or month of a date range
#[instrument(skip(state))]
pub async fn get_averages_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<AveragesResponse>>, ErrorResponse> {
    let granularity = match params.granularity.as_deref() {
        Some(value) => value.parse::<Granularity>().map_err(|_| {
            ErrorResponse::bad_request(&format!(
                "Invalid granularity: {}. Must be 'day', 'week', or 'month'",
                value
            ))
        })?,
        None => Granularity::Day,
    };
    let timezone = state.timezone(params.timezone.as_deref());

    let service = &state.service;
    let results = match granularity {
        Granularity::Day => {
            service
                .get_daily_averages_range(user_id, timezone, &params.start, &params.end)
                .await?
        }
        Granularity::Week => {
            service
                .get_weekly_averages_range(user_id, timezone, &params.start, &params.end)
                .await?
        }
        Granularity::Month => {
            service
                .get_monthly_averages_range(user_id, timezone, &params.start, &params.end)
                .await?
        }
    };

    Ok(Json(results.into_iter().map(AveragesResponse::from).collect()))
}

// Convert public request to domain request
fn convert_to_domain_request(user_id: i64, request: CreateReadingRequest) -> DomainCreateReadingRequest {
    DomainCreateReadingRequest {
        user_id,
        arm: request.arm,
        systolic: request.systolic,
        diastolic: request.diastolic,
        created_at: request.timestamp.unwrap_or_else(Utc::now),
    }
}
