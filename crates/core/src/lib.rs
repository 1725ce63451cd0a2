//! Thermal Skies Core Library
//!
//! IO-free pieces shared by the server:
//! - Configuration loading (XDG-compliant)
//! - Forecast model and normalization
//! - Thermal strength estimation

mod config;
pub mod forecast;
pub mod thermal;

pub use config::{find_config_file, load_config, ConfigSource};
pub use forecast::{
    normalize_hourly, variables, AltitudeBand, HourlyRecord, Location, LocationError,
    NormalizeError, RawForecastResponse, RawHourly, WindReading,
};
pub use thermal::{
    classify_fpm, estimate_thermal, ThermalCalibration, ThermalEstimate, ThermalTier, MS_TO_FPM,
};

/// Application name used for XDG paths
pub const APP_NAME: &str = "thermal-skies";

/// Default server port
pub const DEFAULT_PORT: u16 = 9810;

/// Oklahoma City, shown until the user picks another location
pub const DEFAULT_LOCATION: Location = Location {
    lat: 35.4676,
    lon: -97.5164,
};
