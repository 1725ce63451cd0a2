use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use thermal_skies_core::{
    normalize_hourly, variables, HourlyRecord, Location, NormalizeError, RawForecastResponse,
};

pub const DEFAULT_PROVIDER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_FORECAST_DAYS: u8 = 3;
pub const DEFAULT_TIMEZONE: &str = "auto";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("failed to reach forecast provider: {0}")]
    Network(#[from] reqwest::Error),
    #[error("forecast provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode forecast response: {0}")]
    Decode(String),
    #[error("malformed forecast response: {0}")]
    Schema(#[from] NormalizeError),
}

/// Normalized forecast for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub location: Location,
    pub heat_flux_source_var: Option<String>,
    pub hourly: Vec<HourlyRecord>,
}

#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn forecast(&self, location: &Location) -> Result<Forecast, ProviderError>;
}

/// Raw payload plus the heat flux candidate the provider accepted, if any.
#[derive(Debug)]
pub struct ProviderResponse {
    pub raw: RawForecastResponse,
    pub heat_flux_var: Option<String>,
}

enum Attempt {
    Accepted(RawForecastResponse),
    /// 400 from the provider, meaning the variable list was not understood
    Rejected(String),
}

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    forecast_days: u8,
    timezone: String,
    heat_flux_candidates: Vec<String>,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("thermal-skies/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timezone: DEFAULT_TIMEZONE.to_string(),
            heat_flux_candidates: variables::HEAT_FLUX_CANDIDATES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        })
    }

    pub fn with_forecast_days(mut self, forecast_days: u8) -> Self {
        self.forecast_days = forecast_days;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_heat_flux_candidates(mut self, candidates: Vec<String>) -> Self {
        self.heat_flux_candidates = candidates;
        self
    }

    fn hourly_param(heat_flux_var: Option<&str>) -> String {
        let mut names: Vec<&str> = variables::BASE.to_vec();
        names.extend(heat_flux_var);
        names.join(",")
    }

    async fn request(
        &self,
        location: &Location,
        heat_flux_var: Option<&str>,
    ) -> Result<Attempt, ProviderError> {
        let query = [
            ("latitude", location.lat.to_string()),
            ("longitude", location.lon.to_string()),
            ("hourly", Self::hourly_param(heat_flux_var)),
            ("timezone", self.timezone.clone()),
            ("forecast_days", self.forecast_days.to_string()),
            ("wind_speed_unit", "kmh".to_string()),
        ];

        let response = self.client.get(&self.base_url).query(&query).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            let raw = serde_json::from_slice::<RawForecastResponse>(&body)
                .map_err(|e| ProviderError::Decode(e.to_string()))?;
            return Ok(Attempt::Accepted(raw));
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST {
            Ok(Attempt::Rejected(body))
        } else {
            Err(ProviderError::Status { status, body })
        }
    }

    /// Probe the heat flux candidates in order, one request at a time.
    ///
    /// A 400 moves on to the next candidate; any other failure stops the
    /// probe. When every candidate is rejected the base variables are
    /// requested on their own.
    pub async fn fetch_raw(&self, location: &Location) -> Result<ProviderResponse, ProviderError> {
        for candidate in &self.heat_flux_candidates {
            debug!("requesting forecast for {} with {}", location, candidate);
            let attempt = self
                .request(location, Some(candidate))
                .await
                .inspect_err(|e| error!("forecast request for {} aborted: {}", location, e))?;

            match attempt {
                Attempt::Accepted(raw) => {
                    debug!("provider accepted heat flux variable {}", candidate);
                    return Ok(ProviderResponse {
                        raw,
                        heat_flux_var: Some(candidate.clone()),
                    });
                }
                Attempt::Rejected(body) => {
                    info!("provider rejected heat flux variable {}: {}", candidate, body);
                }
            }
        }

        info!(
            "no heat flux variable accepted for {}, requesting base variables only",
            location
        );
        match self
            .request(location, None)
            .await
            .inspect_err(|e| error!("fallback forecast request for {} failed: {}", location, e))?
        {
            Attempt::Accepted(raw) => Ok(ProviderResponse {
                raw,
                heat_flux_var: None,
            }),
            Attempt::Rejected(body) => {
                error!("provider rejected base variables for {}: {}", location, body);
                Err(ProviderError::Status {
                    status: StatusCode::BAD_REQUEST,
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn forecast(&self, location: &Location) -> Result<Forecast, ProviderError> {
        let response = self.fetch_raw(location).await?;
        let raw = &response.raw;
        if let (Some(lat), Some(lon)) = (raw.latitude, raw.longitude) {
            debug!(
                "provider grid point for {} is {:.4}, {:.4} ({})",
                location,
                lat,
                lon,
                raw.timezone.as_deref().unwrap_or("unknown timezone")
            );
        }

        let requested = response.heat_flux_var.as_deref();
        let heat_flux_source_var = raw.honored_heat_flux_var(requested).map(str::to_owned);
        if let (Some(name), None) = (requested, &heat_flux_source_var) {
            info!("provider accepted {} but returned no such column", name);
        }

        let hourly = normalize_hourly(raw, requested)?;
        debug!("normalized {} forecast hours for {}", hourly.len(), location);

        Ok(Forecast {
            location: *location,
            heat_flux_source_var,
            hourly,
        })
    }
}
