//! Thermal strength estimate for soaring pilots.
//!
//! Two vertical velocity estimates (m/s) are taken from CAPE and from sensible
//! heat flux, the stronger one is damped by humidity, scaled by a regional
//! multiplier and reported in feet per minute.

use serde::Serialize;
use utoipa::ToSchema;

use crate::HourlyRecord;

pub const MS_TO_FPM: f64 = 196.85;

/// Empirical constants behind the estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalCalibration {
    /// Applied to `sqrt(2 * CAPE)`.
    pub cape_scale: f64,
    /// Heat flux (W/m²) is divided by this before the cube root.
    pub heat_flux_divisor: f64,
    /// Lowest value the humidity penalty can reach.
    pub humidity_floor: f64,
    /// Per-region calibration, currently tuned for the central US.
    pub regional_multiplier: f64,
}

impl ThermalCalibration {
    pub const CAPE_SCALE: f64 = 0.1;
    pub const HEAT_FLUX_DIVISOR: f64 = 150.0;
    pub const HUMIDITY_FLOOR: f64 = 0.3;
    pub const REGIONAL_MULTIPLIER: f64 = 2.6;

    pub fn with_regional_multiplier(mut self, multiplier: f64) -> Self {
        self.regional_multiplier = multiplier;
        self
    }

    pub fn velocity_from_cape(&self, cape: f64) -> f64 {
        if cape > 0.0 {
            (2.0 * cape).sqrt() * self.cape_scale
        } else {
            0.0
        }
    }

    pub fn velocity_from_heat_flux(&self, heat_flux: f64) -> f64 {
        if heat_flux > 0.0 {
            (heat_flux / self.heat_flux_divisor).cbrt()
        } else {
            0.0
        }
    }

    pub fn humidity_penalty(&self, relative_humidity: f64) -> f64 {
        let fraction = relative_humidity / 100.0;
        (1.0 - fraction * fraction).max(self.humidity_floor)
    }

    /// Unknown inputs count as zero here; the formulas have no "unknown" case.
    pub fn estimate(&self, hour: &HourlyRecord) -> ThermalEstimate {
        let cape = hour.cape.unwrap_or(0.0);
        let heat_flux = hour.sensible_heat_flux_wm2.unwrap_or(0.0);
        let humidity = hour.relative_humidity.unwrap_or(0.0);

        let velocity_ms = self
            .velocity_from_cape(cape)
            .max(self.velocity_from_heat_flux(heat_flux))
            * self.humidity_penalty(humidity)
            * self.regional_multiplier;

        let fpm = (velocity_ms * MS_TO_FPM).round() as i64;
        ThermalEstimate {
            fpm,
            tier: ThermalTier::from_fpm(fpm),
        }
    }
}

impl Default for ThermalCalibration {
    fn default() -> Self {
        Self {
            cape_scale: Self::CAPE_SCALE,
            heat_flux_divisor: Self::HEAT_FLUX_DIVISOR,
            humidity_floor: Self::HUMIDITY_FLOOR,
            regional_multiplier: Self::REGIONAL_MULTIPLIER,
        }
    }
}

/// Severity tiers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
pub enum ThermalTier {
    Dead,
    Weak,
    Flyable,
    Strong,
    #[serde(rename = "XC")]
    Xc,
}

impl ThermalTier {
    /// Exclusive upper bounds; anything at or above the last bound is XC.
    const THRESHOLDS: [(i64, ThermalTier); 4] = [
        (100, ThermalTier::Dead),
        (250, ThermalTier::Weak),
        (400, ThermalTier::Flyable),
        (600, ThermalTier::Strong),
    ];

    pub fn from_fpm(fpm: i64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(upper, _)| fpm < *upper)
            .map(|(_, tier)| *tier)
            .unwrap_or(ThermalTier::Xc)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dead => "Dead",
            Self::Weak => "Weak",
            Self::Flyable => "Flyable",
            Self::Strong => "Strong",
            Self::Xc => "XC",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Dead => "#666",
            Self::Weak => "#caa400",
            Self::Flyable => "#4caf50",
            Self::Strong => "#2196f3",
            Self::Xc => "#9c27b0",
        }
    }
}

impl std::fmt::Display for ThermalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ThermalEstimate {
    pub fpm: i64,
    pub tier: ThermalTier,
}

/// Estimate with the default calibration.
pub fn estimate_thermal(hour: &HourlyRecord) -> ThermalEstimate {
    ThermalCalibration::default().estimate(hour)
}

pub fn classify_fpm(fpm: i64) -> ThermalTier {
    ThermalTier::from_fpm(fpm)
}
