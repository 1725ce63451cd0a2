use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use thermal_skies_core::{HourlyRecord, Location, ThermalCalibration, WindReading};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dashboard_handler, forecast, forecast_view_handler, hour_handler, location_handler, routes,
    Cli, ForecastSource, ForecastStore, OpenMeteoClient,
};

#[derive(Clone)]
pub struct AppState {
    pub static_dir: String,
    pub forecast_source: Arc<dyn ForecastSource>,
    pub store: Arc<ForecastStore>,
    pub calibration: ThermalCalibration,
}

impl AppState {
    /// The UI store shares `forecast_source` with the JSON API.
    pub fn new(
        static_dir: String,
        forecast_source: Arc<dyn ForecastSource>,
        default_location: Location,
        calibration: ThermalCalibration,
    ) -> Self {
        let store = Arc::new(ForecastStore::new(
            forecast_source.clone(),
            default_location,
        ));
        Self {
            static_dir,
            forecast_source,
            store,
            calibration,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(routes::forecast::forecast),
    components(
        schemas(
                routes::forecast::ForecastResponse,
                routes::forecast::ErrorBody,
                HourlyRecord,
                WindReading
            )
    ),
    tags(
        (name = "thermal skies api", description = "hourly soaring forecast normalized from Open-Meteo")
    )
)]
struct ApiDoc;

pub fn build_app_state(cli: &Cli) -> Result<AppState, anyhow::Error> {
    let client = OpenMeteoClient::new(cli.provider_url(), cli.request_timeout())
        .map_err(|e| anyhow!("error setting up forecast client: {}", e))?
        .with_forecast_days(cli.forecast_days())
        .with_timezone(cli.timezone());

    let default_location = cli
        .default_location()
        .map_err(|e| anyhow!("invalid default location: {}", e))?;

    let calibration = cli.calibration();
    let multiplier = calibration.regional_multiplier;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(anyhow!(
            "invalid regional multiplier: {} (must be a positive number)",
            multiplier
        ));
    }

    Ok(AppState::new(
        cli.static_dir(),
        Arc::new(client),
        default_location,
        calibration,
    ))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let serve_static = ServeDir::new(&app_state.static_dir);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // UI routes
        .route("/", get(dashboard_handler))
        .route("/location", post(location_handler))
        // HTMX fragment routes
        .route("/fragments/forecast", get(forecast_view_handler))
        .route("/fragments/hour", get(hour_handler))
        // API routes
        .route("/forecast", get(forecast))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .nest_service("/static", serve_static)
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
