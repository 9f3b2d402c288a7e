use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use climate_api_core::DateError;

use crate::ClimateDataError;

pub const INVALID_DATE_MESSAGE: &str = "Incorrect format. Please enter the date as YYYY-MM-DD";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid date parameter: {0}")]
    InvalidDate(#[from] DateError),
    #[error("unreadable path parameter: {0}")]
    InvalidPath(#[from] PathRejection),
    #[error("failed to read climate data: {0}")]
    Data(#[from] ClimateDataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Clients have always received 404 for malformed dates, not 400.
            ApiError::InvalidDate(_) | ApiError::InvalidPath(_) => {
                (StatusCode::NOT_FOUND, Json(INVALID_DATE_MESSAGE)).into_response()
            }
            ApiError::Data(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Failed to read climate data"),
            )
                .into_response(),
        }
    }
}
