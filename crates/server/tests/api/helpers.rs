use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use mockall::mock;
use std::sync::Arc;
use thermal_skies::{app, AppState, Forecast, ForecastSource, ProviderError};
use thermal_skies_core::{HourlyRecord, Location, ThermalCalibration, WindReading};
use tower::ServiceExt;

mock! {
    pub ForecastAccess {}

    #[async_trait]
    impl ForecastSource for ForecastAccess {
        async fn forecast(&self, location: &Location) -> Result<Forecast, ProviderError>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub fn default_location() -> Location {
    Location::new(35.4676, -97.5164).unwrap()
}

pub async fn spawn_app(forecast_source: Arc<dyn ForecastSource>) -> TestApp {
    let app_state = AppState::new(
        String::from("./static"),
        forecast_source,
        default_location(),
        ThermalCalibration::default(),
    );

    TestApp {
        app: app(app_state),
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn body_text(response: Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Three hours at `location`. The first one is strong, the last is empty.
pub fn mock_forecast(location: &Location) -> Forecast {
    let mut strong = HourlyRecord::unknown("2026-06-01T13:00");
    strong.temperature_c = Some(31.5);
    strong.relative_humidity = Some(20.0);
    strong.cape = Some(800.0);
    strong.sensible_heat_flux_wm2 = Some(150.0);
    strong.heat_flux_source_var = Some("sensible_heat_flux".to_string());
    strong.wind_1000ft = WindReading {
        speed_kph: Some(12.0),
        direction_deg: Some(180.0),
    };

    let mut mild = HourlyRecord::unknown("2026-06-01T14:00");
    mild.relative_humidity = Some(50.0);
    mild.sensible_heat_flux_wm2 = Some(150.0);
    mild.heat_flux_source_var = Some("sensible_heat_flux".to_string());

    let empty = HourlyRecord::unknown("2026-06-01T15:00");

    Forecast {
        location: *location,
        heat_flux_source_var: Some("sensible_heat_flux".to_string()),
        hourly: vec![strong, mild, empty],
    }
}
