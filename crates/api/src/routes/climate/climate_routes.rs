use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use climate_api_core::parse_iso_date;
use log::{debug, error};
use std::sync::Arc;

use crate::{
    routes::climate::ApiError, AppState, DateRange, Precipitation, TemperatureObservation,
    TemperatureStats,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Dates and precipitation for the latest year of data, one {\"YYYY-MM-DD\": precipitation} object per measurement", body = Vec<Precipitation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = String)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Precipitation>>, ApiError> {
    let readings = state
        .climate_db
        .latest_year_precipitation()
        .await
        .map_err(|e| {
            error!("error querying latest year precipitation: {}", e);
            e
        })?;

    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Names of all stations", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read stations", body = String)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let stations = state.climate_db.stations().await.map_err(|e| {
        error!("error querying stations: {}", e);
        e
    })?;

    Ok(Json(stations.into_iter().map(|s| s.name).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station for its latest year of data", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = String)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, ApiError> {
    let observations = state
        .climate_db
        .most_active_station_tobs()
        .await
        .map_err(|e| {
            error!("error querying most active station observations: {}", e);
            e
        })?;

    Ok(Json(observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Max, min and average temperature from the given date onwards", body = Vec<TemperatureStats>),
        (status = NOT_FOUND, description = "Date is not formatted as YYYY-MM-DD", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = String)
    ))]
pub async fn temperature_stats_from(
    State(state): State<Arc<AppState>>,
    start: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<TemperatureStats>>, ApiError> {
    let Path(start) = start.map_err(|e| {
        debug!("rejecting start path: {}", e);
        e
    })?;
    let start = parse_iso_date(&start).map_err(|e| {
        debug!("rejecting start date: {}", e);
        e
    })?;

    temperature_stats(&state, DateRange::from_start(start)).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
         ("end" = String, Path, description = "Last date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Max, min and average temperature for the inclusive date range", body = Vec<TemperatureStats>),
        (status = NOT_FOUND, description = "A date is not formatted as YYYY-MM-DD", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = String)
    ))]
pub async fn temperature_stats_range(
    State(state): State<Arc<AppState>>,
    range: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Vec<TemperatureStats>>, ApiError> {
    let Path((start, end)) = range.map_err(|e| {
        debug!("rejecting range path: {}", e);
        e
    })?;
    let (start, end) = parse_iso_date(&start)
        .and_then(|start| Ok((start, parse_iso_date(&end)?)))
        .map_err(|e| {
            debug!("rejecting date range: {}", e);
            e
        })?;

    temperature_stats(&state, DateRange::between(start, end)).await
}

async fn temperature_stats(
    state: &AppState,
    range: DateRange,
) -> Result<Json<Vec<TemperatureStats>>, ApiError> {
    let stats = state
        .climate_db
        .temperature_stats(&range)
        .await
        .map_err(|e| {
            error!("error querying temperature stats for {:?}: {}", range, e);
            e
        })?;

    Ok(Json(vec![stats]))
}
