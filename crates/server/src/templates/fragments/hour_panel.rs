use maud::{html, Markup};
use thermal_skies_core::{AltitudeBand, HourlyRecord, ThermalCalibration};

use super::thermal_widget::{display_value, thermal_widget};
use crate::ForecastState;

/// Everything that changes when the scrubber moves.
///
/// Served on its own from `/fragments/hour` and swapped into `#hour-panel`.
pub fn hour_panel(state: &ForecastState, calibration: &ThermalCalibration) -> Markup {
    let hour = state.selected_hour();

    html! {
        div id="hour-panel" {
            div class="level is-mobile mb-3" {
                div class="level-left" {
                    p class="level-item" {
                        "Hour index: " (state.selected_index) " / " (state.last_index())
                    }
                }
                div class="level-right" {
                    p class="level-item" {
                        "Time: "
                        strong { (hour.map_or("", |h| h.time.as_str())) }
                    }
                }
            }

            div class="columns" {
                div class="column is-two-thirds" {
                    @if let Some(hour) = hour {
                        (winds_aloft(hour))
                    }
                    div class="box" {
                        h2 class="title is-5" { "Selected Hour Snapshot" }
                        pre class="hour-snapshot" { (snapshot_json(hour)) }
                    }
                }
                div class="column" {
                    (thermal_widget(hour, calibration))
                }
            }
        }
    }
}

fn winds_aloft(hour: &HourlyRecord) -> Markup {
    html! {
        div class="box" {
            h2 class="title is-5" { "Winds Aloft" }
            table class="table is-fullwidth is-narrow" {
                thead {
                    tr {
                        th { "Altitude" }
                        th { "Speed (km/h)" }
                        th { "Direction (°)" }
                    }
                }
                tbody {
                    @for band in AltitudeBand::ALL {
                        @let wind = hour.wind(band);
                        tr {
                            td { (band.label()) }
                            td { (display_value(wind.speed_kph)) }
                            td { (display_value(wind.direction_deg)) }
                        }
                    }
                }
            }
        }
    }
}

fn snapshot_json(hour: Option<&HourlyRecord>) -> String {
    match hour {
        Some(hour) => serde_json::to_string_pretty(hour)
            .unwrap_or_else(|e| format!("failed to render hour: {}", e)),
        None => "null".to_string(),
    }
}
