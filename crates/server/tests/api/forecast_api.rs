use crate::helpers::{body_text, mock_forecast, spawn_app, MockForecastAccess};
use axum::{body::Body, http::Request};
use hyper::{header, Method, StatusCode};
use reqwest::StatusCode as UpstreamStatus;
use serde_json::Value;
use std::sync::Arc;
use thermal_skies::{ForecastResponse, ProviderError};
use thermal_skies_core::NormalizeError;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn forecast_requires_lat_and_lon() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source.expect_forecast().times(0);
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    for uri in ["/forecast", "/forecast?lat=35.4", "/forecast?lon=-97.5"] {
        let response = test_app.send(get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn forecast_rejects_non_numeric_coordinates() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source.expect_forecast().times(0);
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    for uri in [
        "/forecast?lat=abc&lon=-97.5",
        "/forecast?lat=35.4&lon=NaN",
        "/forecast?lat=95&lon=-97.5",
    ] {
        let response = test_app.send(get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn forecast_returns_normalized_hours() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .withf(|location| location.lat == 35.4 && location.lon == -97.5)
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/forecast?lat=35.4&lon=-97.5")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    let body: ForecastResponse = serde_json::from_str(&text).unwrap();
    assert_eq!(body.status, "ok");
    assert_eq!(body.route, "weather");
    assert_eq!(body.lat, 35.4);
    assert_eq!(body.lon, -97.5);
    assert_eq!(body.heat_flux_source_var.as_deref(), Some("sensible_heat_flux"));
    assert_eq!(body.hourly.len(), 3);
    assert!(body
        .hourly
        .windows(2)
        .all(|pair| pair[0].time < pair[1].time));

    // Unknowns are explicit nulls, not missing keys
    let raw: Value = serde_json::from_str(&text).unwrap();
    let last = &raw["hourly"][2];
    assert!(last["cape"].is_null());
    assert!(last["wind_5000ft"]["speed_kph"].is_null());
    assert_eq!(raw["hourly"][0]["wind_1000ft"]["speed_kph"], 12.0);
}

#[tokio::test]
async fn forecast_schema_error_is_bad_gateway() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .times(1)
        .returning(|_| Err(ProviderError::Schema(NormalizeError::MissingTime)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/forecast?lat=35.4&lon=-97.5")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "upstream response has no hourly time axis");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn forecast_upstream_failure_is_internal_error_with_details() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source.expect_forecast().times(1).returning(|_| {
        Err(ProviderError::Status {
            status: UpstreamStatus::TOO_MANY_REQUESTS,
            body: "rate limited".to_string(),
        })
    });
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/forecast?lat=35.4&lon=-97.5")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "failed to fetch forecast");
    assert!(body["details"]
        .as_str()
        .is_some_and(|details| details.contains("rate limited")));
}

#[tokio::test]
async fn forecast_does_not_touch_ui_state() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/forecast?lat=10&lon=10")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The dashboard still shows the default location, not yet loaded
    let response = test_app.send(get("/")).await;
    let html = body_text(response).await;
    assert!(html.contains("Lat: 35.4676, Lon: -97.5164"));
    assert!(html.contains(r#"hx-get="/fragments/forecast""#));
}
