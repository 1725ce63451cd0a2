use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{templates::dashboard_page, AppState};

/// Handler for the dashboard page (GET /)
///
/// Renders whatever the store holds right now. A pending forecast renders the
/// loading view, which pulls `/fragments/forecast` to start the fetch.
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.store.snapshot().await;
    Html(dashboard_page(&snapshot, &state.calibration).into_string())
}
