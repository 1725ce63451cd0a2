mod forecast_view;
mod hour_panel;
mod location_form;
mod thermal_widget;

pub use forecast_view::forecast_view;
pub use hour_panel::hour_panel;
pub use location_form::location_form;
pub use thermal_widget::{display_value, thermal_widget, UNKNOWN};
