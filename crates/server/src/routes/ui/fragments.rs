use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    Form,
};
use log::{debug, warn};
use serde::Deserialize;
use thermal_skies_core::Location;

use crate::{
    templates::{forecast_view, hour_panel},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct LocationForm {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HourQuery {
    pub index: Option<usize>,
}

/// Handler for the forecast view fragment (GET /fragments/forecast)
///
/// Starts the first fetch if nothing has been requested yet.
pub async fn forecast_view_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.store.ensure_loaded().await;
    Html(forecast_view(&snapshot, &state.calibration, None).into_string())
}

/// Handler for the location form (POST /location)
///
/// Invalid input leaves the current forecast alone and re-renders the view
/// with the error inline.
pub async fn location_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LocationForm>,
) -> Html<String> {
    let location = match Location::parse(form.lat.as_deref(), form.lon.as_deref()) {
        Ok(location) => location,
        Err(e) => {
            warn!("rejecting location update: {}", e);
            let snapshot = state.store.snapshot().await;
            let message = e.to_string();
            return Html(forecast_view(&snapshot, &state.calibration, Some(&message)).into_string());
        }
    };

    let snapshot = state.store.set_location(location).await;
    Html(forecast_view(&snapshot, &state.calibration, None).into_string())
}

/// Handler for the hour panel fragment (GET /fragments/hour?index=n)
pub async fn hour_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HourQuery>,
) -> Html<String> {
    let snapshot = match query.index {
        Some(index) => {
            debug!("selecting forecast hour {}", index);
            state.store.set_selected_index(index).await
        }
        None => state.store.snapshot().await,
    };
    Html(hour_panel(&snapshot, &state.calibration).into_string())
}
