use maud::{html, Markup};
use thermal_skies_core::ThermalCalibration;

use super::{hour_panel::hour_panel, location_form::location_form};
use crate::ForecastState;

/// Location picker, scrubber, and selected hour.
///
/// While a fetch is pending the loading view re-requests itself from
/// `/fragments/forecast` until the store settles.
pub fn forecast_view(
    state: &ForecastState,
    calibration: &ThermalCalibration,
    error: Option<&str>,
) -> Markup {
    html! {
        div id="forecast-view" {
            (location_form(&state.location, error))

            @if state.loading() {
                div class="box has-text-centered"
                    hx-get="/fragments/forecast"
                    hx-trigger="load delay:500ms"
                    hx-target="#forecast-view"
                    hx-swap="outerHTML" {
                    p class="has-text-grey" { "Loading forecast…" }
                }
            } @else if state.hourly.is_empty() {
                div class="box has-text-centered" {
                    p { "No forecast data available" }
                    @if let Some(ref last_error) = state.last_error {
                        p class="help is-danger mt-2" { (last_error) }
                    }
                }
            } @else {
                (time_control(state))
                (hour_panel(state, calibration))
            }
        }
    }
}

fn time_control(state: &ForecastState) -> Markup {
    html! {
        div class="box" id="time-control" {
            h2 class="title is-5" { "Forecast Hour" }
            input class="slider is-fullwidth hour-scrubber"
                type="range"
                name="index"
                min="0"
                max=(state.last_index())
                step="1"
                value=(state.selected_index)
                hx-get="/fragments/hour"
                hx-trigger="input changed delay:75ms"
                hx-target="#hour-panel"
                hx-swap="outerHTML";
            @if let Some(ref var) = state.heat_flux_source_var {
                p class="help" { "Heat flux from " code { (var) } }
            }
        }
    }
}
