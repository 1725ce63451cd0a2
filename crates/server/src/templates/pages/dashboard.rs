use maud::{html, Markup};
use thermal_skies_core::ThermalCalibration;

use crate::{
    templates::{
        fragments::forecast_view,
        layouts::{base, PageConfig},
    },
    ForecastState,
};

/// Dashboard page - location, hour scrubber, and thermal estimate
pub fn dashboard_page(state: &ForecastState, calibration: &ThermalCalibration) -> Markup {
    let config = PageConfig {
        title: "Thermal Skies",
    };

    base(&config, dashboard_content(state, calibration))
}

pub fn dashboard_content(state: &ForecastState, calibration: &ThermalCalibration) -> Markup {
    html! {
        (forecast_view(state, calibration, None))
    }
}
