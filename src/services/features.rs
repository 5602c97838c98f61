//! Model input assembly.
//!
//! The column order below is fixed: the scaler and the regressor were fit
//! against it, so rows must always be built through [`FeatureVector::to_row`].

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::models::prediction::{GeoLocation, PanelConfig};
use crate::models::weather::WeatherReading;
use super::scaler::StandardScaler;
use super::solar_geometry::sun_position;

pub const FEATURE_COUNT: usize = 14;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "latitude",
    "longitude",
    "panel_area",
    "tilt_angle",
    "azimuth_angle",
    "solar_irradiance",
    "temperature",
    "humidity",
    "wind_speed",
    "cloud_cover",
    "day_of_year",
    "hour_of_day",
    "sun_elevation",
    "sun_azimuth",
];

/// Raw (unscaled) model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub latitude: f64,
    pub longitude: f64,
    pub panel_area: f64,
    pub tilt_angle: f64,
    pub azimuth_angle: f64,
    pub solar_irradiance: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub cloud_cover: f64,
    pub day_of_year: f64,
    pub hour_of_day: f64,
    pub sun_elevation: f64,
    pub sun_azimuth: f64,
}

impl FeatureVector {
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.latitude,
            self.longitude,
            self.panel_area,
            self.tilt_angle,
            self.azimuth_angle,
            self.solar_irradiance,
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.cloud_cover,
            self.day_of_year,
            self.hour_of_day,
            self.sun_elevation,
            self.sun_azimuth,
        ]
    }

    pub fn from_row(row: &[f64]) -> Option<Self> {
        let r: &[f64; FEATURE_COUNT] = row.try_into().ok()?;
        Some(Self {
            latitude: r[0],
            longitude: r[1],
            panel_area: r[2],
            tilt_angle: r[3],
            azimuth_angle: r[4],
            solar_irradiance: r[5],
            temperature: r[6],
            humidity: r[7],
            wind_speed: r[8],
            cloud_cover: r[9],
            day_of_year: r[10],
            hour_of_day: r[11],
            sun_elevation: r[12],
            sun_azimuth: r[13],
        })
    }
}

/// A feature row after the fitted scaler has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFeatures(Vec<f64>);

impl ScaledFeatures {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Builds the raw feature vector for a request made at local time `at`.
/// Missing weather fields fall back to the [`WeatherReading`] defaults.
pub fn assemble_features(
    location: &GeoLocation,
    panel: &PanelConfig,
    weather: &WeatherReading,
    at: NaiveDateTime,
) -> FeatureVector {
    let day_of_year = at.ordinal() as f64;
    let hour_of_day = at.hour() as f64;
    let sun = sun_position(location.latitude, day_of_year, hour_of_day);

    FeatureVector {
        latitude: location.latitude,
        longitude: location.longitude,
        panel_area: panel.area_m2,
        tilt_angle: panel.tilt_deg,
        azimuth_angle: panel.azimuth_deg,
        solar_irradiance: weather.irradiance_or_default(),
        temperature: weather.temperature_or_default(),
        humidity: weather.humidity_or_default(),
        wind_speed: weather.wind_speed_or_default(),
        cloud_cover: weather.cloud_cover_or_default(),
        day_of_year,
        hour_of_day,
        sun_elevation: sun.elevation_deg,
        sun_azimuth: sun.azimuth_deg,
    }
}

/// Applies the persisted scaler. Never refits.
pub fn scale_features(scaler: &StandardScaler, features: &FeatureVector) -> ScaledFeatures {
    ScaledFeatures(scaler.transform(&features.to_row()))
}
