pub mod fragments;
pub mod layouts;
pub mod pages;

pub use fragments::{forecast_view, hour_panel, thermal_widget};
pub use layouts::PageConfig;
pub use pages::dashboard_page;
