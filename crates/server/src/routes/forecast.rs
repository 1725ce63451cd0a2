use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thermal_skies_core::{HourlyRecord, Location};
use utoipa::{IntoParams, ToSchema};

use crate::{AppState, ProviderError};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastQuery {
    /// Latitude in decimal degrees
    pub lat: Option<String>,
    /// Longitude in decimal degrees
    pub lon: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub status: String,
    pub route: String,
    pub lat: f64,
    pub lon: f64,
    /// Heat flux variable the provider accepted, null when none was
    pub heat_flux_source_var: Option<String>,
    pub hourly: Vec<HourlyRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl From<ProviderError> for (StatusCode, Json<ErrorBody>) {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Schema(e) => {
                (StatusCode::BAD_GATEWAY, Json(ErrorBody::new(e.to_string())))
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "failed to fetch forecast".to_string(),
                    details: Some(other.to_string()),
                }),
            ),
        }
    }
}

#[utoipa::path(
    get,
    path = "/forecast",
    params(ForecastQuery),
    responses(
        (status = OK, description = "Hourly forecast for the location", body = ForecastResponse),
        (status = BAD_REQUEST, description = "Missing or non-numeric lat/lon", body = ErrorBody),
        (status = BAD_GATEWAY, description = "Forecast provider response had no time axis", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Forecast provider unreachable or failed", body = ErrorBody)
    ))]
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, (StatusCode, Json<ErrorBody>)> {
    let location = Location::parse(query.lat.as_deref(), query.lon.as_deref()).map_err(|e| {
        warn!("rejecting forecast request: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string())))
    })?;

    let forecast = state
        .forecast_source
        .forecast(&location)
        .await
        .map_err(|e| {
            error!("error fetching forecast for {}: {}", location, e);
            e
        })?;

    Ok(Json(ForecastResponse {
        status: "ok".to_string(),
        route: "weather".to_string(),
        lat: location.lat,
        lon: location.lon,
        heat_flux_source_var: forecast.heat_flux_source_var,
        hourly: forecast.hourly,
    }))
}
