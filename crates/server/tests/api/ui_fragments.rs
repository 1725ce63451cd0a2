use crate::helpers::{body_text, default_location, mock_forecast, spawn_app, MockForecastAccess};
use axum::{body::Body, http::Request};
use hyper::{header, Method, StatusCode};
use reqwest::StatusCode as UpstreamStatus;
use std::sync::Arc;
use thermal_skies::ProviderError;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap()
}

fn post_location(form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/location")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// The page renders immediately and leaves the first fetch to the loading view
#[tokio::test]
async fn dashboard_renders_loading_view_before_first_fetch() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source.expect_forecast().times(0);
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/")).await;
    assert!(response.status().is_success());

    let html = body_text(response).await;
    assert!(html.contains("<title>Thermal Skies</title>"));
    assert!(!html.contains("API_BASE"));
    assert!(html.contains("Lat: 35.4676, Lon: -97.5164"));
    assert!(html.contains(r#"hx-get="/fragments/forecast""#));
    assert!(html.contains(r#"hx-post="/location""#));
    assert!(!html.contains("Selected Hour Snapshot"));
}

#[tokio::test]
async fn forecast_fragment_loads_default_location_once() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .withf(|location| *location == default_location())
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/fragments/forecast")).await;
    assert!(response.status().is_success());

    let html = body_text(response).await;
    assert!(html.contains(r#"id="forecast-view""#));
    assert!(html.contains("Hour index: 0 / 2"));
    assert!(html.contains("2026-06-01T13:00"));
    assert!(html.contains("Selected Hour Snapshot"));
    assert!(html.contains("sensible_heat_flux_wm2"));
    assert!(html.contains("Thermal Strength"));
    assert!(html.contains("1965 fpm"));
    assert!(html.contains("XC"));
    assert!(html.contains(r#"type="range""#));

    // Second render comes from the store
    let response = test_app.send(get("/")).await;
    let html = body_text(response).await;
    assert!(html.contains("Hour index: 0 / 2"));
}

#[tokio::test]
async fn hour_fragment_moves_selection() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;
    test_app.send(get("/fragments/forecast")).await;

    let response = test_app.send(get("/fragments/hour?index=1")).await;
    assert!(response.status().is_success());

    let html = body_text(response).await;
    assert!(html.contains(r#"id="hour-panel""#));
    assert!(html.contains("Hour index: 1 / 2"));
    assert!(html.contains("2026-06-01T14:00"));
    assert!(html.contains("384 fpm"));
    assert!(html.contains("Flyable"));
    // Fragment only, no page chrome
    assert!(!html.contains("<title>"));
}

#[tokio::test]
async fn hour_fragment_clamps_index_and_shows_unknowns() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;
    test_app.send(get("/fragments/forecast")).await;

    let response = test_app.send(get("/fragments/hour?index=42")).await;
    let html = body_text(response).await;
    assert!(html.contains("Hour index: 2 / 2"));
    assert!(html.contains("2026-06-01T15:00"));
    assert!(html.contains("0 fpm"));
    assert!(html.contains("Dead"));
    assert!(html.contains("Heat Flux: — W/m²"));
    assert!(html.contains("CAPE: — J/kg"));
    assert!(html.contains("RH: —%"));
}

#[tokio::test]
async fn failed_fetch_shows_no_data() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source.expect_forecast().times(1).returning(|_| {
        Err(ProviderError::Status {
            status: UpstreamStatus::SERVICE_UNAVAILABLE,
            body: "maintenance".to_string(),
        })
    });
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(get("/fragments/forecast")).await;
    assert!(response.status().is_success());

    let html = body_text(response).await;
    assert!(html.contains("No forecast data available"));
    assert!(html.contains("maintenance"));
    assert!(!html.contains(r#"type="range""#));
    assert!(!html.contains(r#"hx-get="/fragments/forecast""#));
}

#[tokio::test]
async fn location_update_refetches_and_resets_hour() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source
        .expect_forecast()
        .withf(|location| *location == default_location())
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    forecast_source
        .expect_forecast()
        .withf(|location| location.lat == 46.5 && location.lon == -121.25)
        .times(1)
        .returning(|location| Ok(mock_forecast(location)));
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    test_app.send(get("/fragments/forecast")).await;
    test_app.send(get("/fragments/hour?index=2")).await;

    let response = test_app.send(post_location("lat=46.5&lon=-121.25")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Lat: 46.5000, Lon: -121.2500"));
    assert!(html.contains("Hour index: 0 / 2"));
}

#[tokio::test]
async fn invalid_location_is_reported_inline() {
    let mut forecast_source = MockForecastAccess::new();
    forecast_source.expect_forecast().times(0);
    let test_app = spawn_app(Arc::new(forecast_source)).await;

    let response = test_app.send(post_location("lat=north&lon=-97.5")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("lat and lon must be finite numbers"));
    assert!(html.contains("Lat: 35.4676, Lon: -97.5164"));

    let response = test_app.send(post_location("lat=&lon=")).await;
    let html = body_text(response).await;
    assert!(html.contains("lat and lon are required"));
}
