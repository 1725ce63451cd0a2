use std::{env, time::Duration};

use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use thermal_skies_core::{
    find_config_file, load_config, ConfigSource, Location, LocationError, ThermalCalibration,
    DEFAULT_LOCATION, DEFAULT_PORT,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::open_meteo::{
    DEFAULT_FORECAST_DAYS, DEFAULT_PROVIDER_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TIMEZONE,
};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Thermal Skies - Hourly soaring forecast with thermal strength estimates"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $THERMAL_SKIES_CONFIG, ./thermal-skies.toml,
    /// $XDG_CONFIG_HOME/thermal-skies/thermal-skies.toml, /etc/thermal-skies/thermal-skies.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "THERMAL_SKIES_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "THERMAL_SKIES_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "THERMAL_SKIES_PORT")]
    pub port: Option<String>,

    /// Directory containing UI static files
    #[arg(short, long, env = "THERMAL_SKIES_UI_DIR")]
    pub ui_dir: Option<String>,

    /// Forecast API endpoint
    #[arg(long, env = "THERMAL_SKIES_PROVIDER_URL")]
    pub provider_url: Option<String>,

    /// Forecast horizon in days
    #[arg(long, env = "THERMAL_SKIES_FORECAST_DAYS")]
    pub forecast_days: Option<u8>,

    /// Timezone the provider reports hours in ("auto" uses the location's zone)
    #[arg(long, env = "THERMAL_SKIES_TIMEZONE")]
    pub timezone: Option<String>,

    /// Timeout for each forecast API request, in seconds
    #[arg(long, env = "THERMAL_SKIES_REQUEST_TIMEOUT")]
    pub request_timeout_secs: Option<u64>,

    /// Regional calibration applied to thermal estimates
    #[arg(long, env = "THERMAL_SKIES_REGIONAL_MULTIPLIER")]
    pub regional_multiplier: Option<f64>,

    /// Latitude shown before the user picks a location
    #[arg(long, env = "THERMAL_SKIES_DEFAULT_LAT", allow_negative_numbers = true)]
    pub default_lat: Option<f64>,

    /// Longitude shown before the user picks a location
    #[arg(long, env = "THERMAL_SKIES_DEFAULT_LON", allow_negative_numbers = true)]
    pub default_lon: Option<f64>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
    }

    pub fn static_dir(&self) -> String {
        self.ui_dir
            .clone()
            .unwrap_or_else(|| "./static".to_string())
    }

    pub fn provider_url(&self) -> String {
        self.provider_url
            .clone()
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string())
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS)
    }

    pub fn timezone(&self) -> String {
        self.timezone
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn calibration(&self) -> ThermalCalibration {
        let calibration = ThermalCalibration::default();
        match self.regional_multiplier {
            Some(multiplier) => calibration.with_regional_multiplier(multiplier),
            None => calibration,
        }
    }

    pub fn default_location(&self) -> Result<Location, LocationError> {
        Location::new(
            self.default_lat.unwrap_or(DEFAULT_LOCATION.lat),
            self.default_lon.unwrap_or(DEFAULT_LOCATION.lon),
        )
    }

    /// Fill anything unset here from `fallback`
    fn or(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(fallback.level),
            domain: self.domain.or(fallback.domain),
            port: self.port.or(fallback.port),
            ui_dir: self.ui_dir.or(fallback.ui_dir),
            provider_url: self.provider_url.or(fallback.provider_url),
            forecast_days: self.forecast_days.or(fallback.forecast_days),
            timezone: self.timezone.or(fallback.timezone),
            request_timeout_secs: self.request_timeout_secs.or(fallback.request_timeout_secs),
            regional_multiplier: self.regional_multiplier.or(fallback.regional_multiplier),
            default_lat: self.default_lat.or(fallback.default_lat),
            default_lon: self.default_lon.or(fallback.default_lon),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("THERMAL_SKIES_CONFIG", "thermal-skies.toml")
    };

    if let Some(path) = source.path() {
        log::info!("Loading config from: {}", path.display());
    }

    let file_config: Cli = load_config(&source).unwrap_or_else(|e| {
        eprintln!("ignoring config file {}: {}", source, e);
        Cli::default()
    });

    // CLI args override file config (env vars are handled by clap)
    cli_args.or(file_config)
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
