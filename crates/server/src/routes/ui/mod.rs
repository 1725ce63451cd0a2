mod dashboard;
mod fragments;

pub use dashboard::dashboard_handler;
pub use fragments::{forecast_view_handler, hour_handler, location_handler};
