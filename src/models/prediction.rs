use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::PredictionError;

pub const DEFAULT_TILT_DEG: f64 = 30.0;
pub const DEFAULT_AZIMUTH_DEG: f64 = 180.0;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Site coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Builds a location from possibly-missing request values.
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self, PredictionError> {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(PredictionError::Configuration(
                "latitude and longitude are required".to_string(),
            ));
        };
        let location = Self { latitude, longitude };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<(), PredictionError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PredictionError::Configuration(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PredictionError::Configuration(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Panel geometry. Tilt is measured from horizontal, azimuth clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelConfig {
    /// Panel surface (m²)
    pub area_m2: f64,
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
}

impl PanelConfig {
    /// Unset tilt/azimuth take the 30° / 180° defaults.
    pub fn new(area_m2: Option<f64>, tilt_deg: Option<f64>, azimuth_deg: Option<f64>) -> Result<Self, PredictionError> {
        let area_m2 = area_m2.ok_or_else(|| {
            PredictionError::Configuration("a valid panel area is required".to_string())
        })?;
        let panel = Self {
            area_m2,
            tilt_deg: tilt_deg.unwrap_or(DEFAULT_TILT_DEG),
            azimuth_deg: azimuth_deg.unwrap_or(DEFAULT_AZIMUTH_DEG),
        };
        panel.validate()?;
        Ok(panel)
    }

    pub fn validate(&self) -> Result<(), PredictionError> {
        if !self.area_m2.is_finite() || self.area_m2 <= 0.0 {
            return Err(PredictionError::Configuration(format!(
                "panel area must be positive, got {}",
                self.area_m2
            )));
        }
        if !self.tilt_deg.is_finite() || !self.azimuth_deg.is_finite() {
            return Err(PredictionError::Configuration(
                "tilt and azimuth must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_orientation(&self, orientation: OptimalConfig) -> Self {
        Self {
            area_m2: self.area_m2,
            tilt_deg: orientation.tilt,
            azimuth_deg: orientation.azimuth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for Horizon {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Horizon::Daily),
            "weekly" => Ok(Horizon::Weekly),
            "monthly" => Ok(Horizon::Monthly),
            _ => Err(PredictionError::UnsupportedHorizon(s.to_string())),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Horizon::Daily => "daily",
            Horizon::Weekly => "weekly",
            Horizon::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// One entry of a breakdown: an hour (daily) or a day (weekly / monthly).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodPower {
    pub period: u32,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionResult {
    pub horizon: Horizon,
    /// Sum of `breakdown` powers (Wh)
    pub total_power: f64,
    pub peak_power: f64,
    pub peak_period: u32,
    pub breakdown: Vec<PeriodPower>,
    /// Weekly and monthly only: `total_power / breakdown.len()`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_daily: Option<f64>,
}

/// Recommended orientation for a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OptimalConfig {
    pub tilt: f64,
    pub azimuth: f64,
}

/// Requested configuration compared against the recommended one.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OptimizationOutcome {
    pub prediction: PredictionResult,
    pub optimal_config: OptimalConfig,
    pub optimal_prediction: PredictionResult,
    pub improvement_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_parsing_is_case_insensitive() {
        assert_eq!("Daily".parse::<Horizon>().unwrap(), Horizon::Daily);
        assert_eq!(" weekly ".parse::<Horizon>().unwrap(), Horizon::Weekly);
        assert_eq!("MONTHLY".parse::<Horizon>().unwrap(), Horizon::Monthly);
    }

    #[test]
    fn unknown_horizon_is_rejected() {
        match "yearly".parse::<Horizon>() {
            Err(PredictionError::UnsupportedHorizon(h)) => assert_eq!(h, "yearly"),
            other => panic!("expected UnsupportedHorizon, got {:?}", other),
        }
    }

    #[test]
    fn location_requires_both_coordinates() {
        assert!(GeoLocation::new(Some(45.0), None).is_err());
        assert!(GeoLocation::new(None, Some(7.0)).is_err());
        assert!(GeoLocation::new(Some(91.0), Some(7.0)).is_err());
        assert!(GeoLocation::new(Some(45.0), Some(-181.0)).is_err());
        assert!(GeoLocation::new(Some(45.0), Some(7.0)).is_ok());
    }

    #[test]
    fn panel_defaults_orientation_and_rejects_bad_area() {
        let panel = PanelConfig::new(Some(10.0), None, None).unwrap();
        assert_eq!(panel.tilt_deg, 30.0);
        assert_eq!(panel.azimuth_deg, 180.0);

        assert!(PanelConfig::new(None, None, None).is_err());
        assert!(PanelConfig::new(Some(0.0), None, None).is_err());
        assert!(PanelConfig::new(Some(-3.0), Some(10.0), Some(90.0)).is_err());
    }
}
