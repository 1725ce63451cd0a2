//! Hourly forecast model and normalization of the provider's column-oriented payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Hourly variable names understood by the forecast provider.
pub mod variables {
    pub const TEMPERATURE: &str = "temperature_2m";
    pub const RELATIVE_HUMIDITY: &str = "relative_humidity_2m";
    pub const CAPE: &str = "cape";
    pub const CLOUD_COVER: &str = "cloud_cover";
    pub const PRESSURE_MSL: &str = "pressure_msl";
    pub const BOUNDARY_LAYER_HEIGHT: &str = "boundary_layer_height";

    /// Requested on every call, in request order.
    pub const BASE: [&str; 12] = [
        TEMPERATURE,
        RELATIVE_HUMIDITY,
        CAPE,
        CLOUD_COVER,
        PRESSURE_MSL,
        BOUNDARY_LAYER_HEIGHT,
        "wind_speed_975hPa",
        "wind_speed_925hPa",
        "wind_speed_850hPa",
        "wind_direction_975hPa",
        "wind_direction_925hPa",
        "wind_direction_850hPa",
    ];

    /// Names the provider has used for sensible heat flux, tried in this order.
    pub const HEAT_FLUX_CANDIDATES: [&str; 3] = [
        "sensible_heat_flux",
        "surface_sensible_heat_flux",
        "sensible_heatflux",
    ];
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("upstream response has no hourly time axis")]
    MissingTime,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("lat and lon are required")]
    Missing,
    #[error("lat and lon must be finite numbers")]
    NotNumeric,
    #[error("lat must be within [-90, 90] and lon within [-180, 180]")]
    OutOfRange,
}

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Result<Self, LocationError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(LocationError::NotNumeric);
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::OutOfRange);
        }
        Ok(Self { lat, lon })
    }

    /// Build a location from raw user input, e.g. query string or form fields.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, LocationError> {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(LocationError::Missing);
        };
        let lat = lat.trim();
        let lon = lon.trim();
        if lat.is_empty() || lon.is_empty() {
            return Err(LocationError::Missing);
        }
        let lat = lat
            .parse::<f64>()
            .map_err(|_| LocationError::NotNumeric)?;
        let lon = lon
            .parse::<f64>()
            .map_err(|_| LocationError::NotNumeric)?;
        Self::new(lat, lon)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Provider payload as received. Only `hourly` is normalized; the grid point
/// and timezone are informational.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastResponse {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub hourly: Option<RawHourly>,
}

impl RawForecastResponse {
    /// `name` if the payload carries it as an array column, otherwise `None`.
    pub fn honored_heat_flux_var<'a>(&self, name: Option<&'a str>) -> Option<&'a str> {
        let hourly = self.hourly.as_ref()?;
        name.filter(|name| {
            hourly
                .columns
                .get(*name)
                .is_some_and(|column| column.is_array())
        })
    }
}

/// Parallel arrays keyed by variable name, index-aligned with `time`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHourly {
    #[serde(default)]
    pub time: Option<Vec<String>>,
    #[serde(flatten)]
    pub columns: HashMap<String, Value>,
}

/// Fixed altitude bands the isobaric wind levels are relabelled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeBand {
    Ft1000,
    Ft2500,
    Ft5000,
}

impl AltitudeBand {
    pub const ALL: [AltitudeBand; 3] = [Self::Ft1000, Self::Ft2500, Self::Ft5000];

    pub fn pressure_level_hpa(&self) -> u16 {
        match self {
            Self::Ft1000 => 975,
            Self::Ft2500 => 925,
            Self::Ft5000 => 850,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ft1000 => "1000 ft",
            Self::Ft2500 => "2500 ft",
            Self::Ft5000 => "5000 ft",
        }
    }

    pub fn speed_variable(&self) -> String {
        format!("wind_speed_{}hPa", self.pressure_level_hpa())
    }

    pub fn direction_variable(&self) -> String {
        format!("wind_direction_{}hPa", self.pressure_level_hpa())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WindReading {
    pub speed_kph: Option<f64>,
    pub direction_deg: Option<f64>,
}

/// One forecast hour. `None` means the provider gave no usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HourlyRecord {
    pub time: String,
    pub temperature_c: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub cape: Option<f64>,
    pub cloud_cover_percent: Option<f64>,
    pub pressure_msl_hpa: Option<f64>,
    pub boundary_layer_height_m: Option<f64>,
    pub wind_1000ft: WindReading,
    pub wind_2500ft: WindReading,
    pub wind_5000ft: WindReading,
    pub sensible_heat_flux_wm2: Option<f64>,
    pub heat_flux_source_var: Option<String>,
}

impl HourlyRecord {
    /// Record with a timestamp and nothing else known.
    pub fn unknown(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            temperature_c: None,
            relative_humidity: None,
            cape: None,
            cloud_cover_percent: None,
            pressure_msl_hpa: None,
            boundary_layer_height_m: None,
            wind_1000ft: WindReading::default(),
            wind_2500ft: WindReading::default(),
            wind_5000ft: WindReading::default(),
            sensible_heat_flux_wm2: None,
            heat_flux_source_var: None,
        }
    }

    pub fn wind(&self, band: AltitudeBand) -> &WindReading {
        match band {
            AltitudeBand::Ft1000 => &self.wind_1000ft,
            AltitudeBand::Ft2500 => &self.wind_2500ft,
            AltitudeBand::Ft5000 => &self.wind_5000ft,
        }
    }
}

/// A single source array. Absent or non-array columns read as empty.
struct Column<'a>(Option<&'a Vec<Value>>);

impl<'a> Column<'a> {
    fn lookup(hourly: &'a RawHourly, name: &str) -> Self {
        Column(hourly.columns.get(name).and_then(Value::as_array))
    }

    fn at(&self, index: usize) -> Option<f64> {
        self.0
            .and_then(|values| values.get(index))
            .and_then(finite_number)
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Turn the provider's parallel arrays into one record per timestamp.
///
/// `heat_flux_var` is the candidate name the provider accepted, if any. It is
/// only honored when that column is actually present in the payload.
pub fn normalize_hourly(
    raw: &RawForecastResponse,
    heat_flux_var: Option<&str>,
) -> Result<Vec<HourlyRecord>, NormalizeError> {
    let hourly = raw.hourly.as_ref().ok_or(NormalizeError::MissingTime)?;
    let times = hourly.time.as_ref().ok_or(NormalizeError::MissingTime)?;

    let temperature = Column::lookup(hourly, variables::TEMPERATURE);
    let humidity = Column::lookup(hourly, variables::RELATIVE_HUMIDITY);
    let cape = Column::lookup(hourly, variables::CAPE);
    let cloud_cover = Column::lookup(hourly, variables::CLOUD_COVER);
    let pressure = Column::lookup(hourly, variables::PRESSURE_MSL);
    let boundary_layer = Column::lookup(hourly, variables::BOUNDARY_LAYER_HEIGHT);
    let winds: Vec<(Column, Column)> = AltitudeBand::ALL
        .iter()
        .map(|band| {
            (
                Column::lookup(hourly, &band.speed_variable()),
                Column::lookup(hourly, &band.direction_variable()),
            )
        })
        .collect();

    let heat_flux_var = raw.honored_heat_flux_var(heat_flux_var);
    let heat_flux = Column(heat_flux_var.and_then(|name| hourly.columns.get(name)?.as_array()));

    let wind_at = |band: usize, i: usize| WindReading {
        speed_kph: winds[band].0.at(i),
        direction_deg: winds[band].1.at(i),
    };

    Ok(times
        .iter()
        .enumerate()
        .map(|(i, time)| HourlyRecord {
            time: time.clone(),
            temperature_c: temperature.at(i),
            relative_humidity: humidity.at(i),
            cape: cape.at(i),
            cloud_cover_percent: cloud_cover.at(i),
            pressure_msl_hpa: pressure.at(i),
            boundary_layer_height_m: boundary_layer.at(i),
            wind_1000ft: wind_at(0, i),
            wind_2500ft: wind_at(1, i),
            wind_5000ft: wind_at(2, i),
            sensible_heat_flux_wm2: heat_flux.at(i),
            heat_flux_source_var: heat_flux_var.map(str::to_owned),
        })
        .collect())
}
