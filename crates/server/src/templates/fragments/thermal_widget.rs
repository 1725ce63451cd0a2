use maud::{html, Markup};
use thermal_skies_core::{HourlyRecord, ThermalCalibration};

/// Placeholder shown for values the provider did not report
pub const UNKNOWN: &str = "—";

pub fn display_value(value: Option<f64>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |v| v.to_string())
}

/// Thermal strength readout for the selected hour
pub fn thermal_widget(hour: Option<&HourlyRecord>, calibration: &ThermalCalibration) -> Markup {
    html! {
        div class="box thermal-widget" id="thermal-widget" {
            h2 class="title is-5" { "Thermal Strength" }
            @match hour {
                Some(hour) => {
                    @let estimate = calibration.estimate(hour);
                    p class="is-size-3 has-text-weight-bold" {
                        (estimate.fpm) " fpm"
                    }
                    p class="is-size-5 has-text-weight-semibold thermal-tier"
                        style=(format!("color: {};", estimate.tier.color())) {
                        (estimate.tier.label())
                    }
                    div class="content is-small mt-3" {
                        p { "Heat Flux: " (display_value(hour.sensible_heat_flux_wm2)) " W/m²" }
                        p { "CAPE: " (display_value(hour.cape)) " J/kg" }
                        p { "RH: " (display_value(hour.relative_humidity)) "%" }
                    }
                }
                None => {
                    p class="has-text-grey" { "Loading thermal data…" }
                }
            }
        }
    }
}
