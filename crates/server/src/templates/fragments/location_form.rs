use maud::{html, Markup};
use thermal_skies_core::Location;

/// Location picker. Submitting swaps the whole `#forecast-view`.
pub fn location_form(location: &Location, error: Option<&str>) -> Markup {
    html! {
        div class="box" id="location-section" {
            h2 class="title is-5" { "Location" }
            p class="mb-3" {
                "Lat: " (format!("{:.4}", location.lat))
                ", Lon: " (format!("{:.4}", location.lon))
            }
            form hx-post="/location"
                hx-target="#forecast-view"
                hx-swap="outerHTML"
                hx-indicator="#location-indicator" {
                div class="field is-grouped is-grouped-multiline" {
                    div class="control" {
                        input class="input" type="text" name="lat" placeholder="Latitude"
                            value=(location.lat);
                    }
                    div class="control" {
                        input class="input" type="text" name="lon" placeholder="Longitude"
                            value=(location.lon);
                    }
                    div class="control" {
                        button class="button is-link" type="submit" { "Update" }
                    }
                    div class="control" {
                        span id="location-indicator" class="htmx-indicator has-text-grey" {
                            "Loading forecast…"
                        }
                    }
                }
                @if let Some(error) = error {
                    p class="help is-danger" { (error) }
                }
            }
        }
    }
}
