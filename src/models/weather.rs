use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_IRRADIANCE_W_M2: f64 = 0.0;
pub const DEFAULT_TEMPERATURE_C: f64 = 25.0;
pub const DEFAULT_HUMIDITY_PCT: f64 = 50.0;
pub const DEFAULT_WIND_SPEED_M_S: f64 = 5.0;
pub const DEFAULT_CLOUD_COVER_PCT: f64 = 0.0;

/// Weather observation handed to the engine. Any missing field is replaced by
/// its default when features are assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherReading {
    /// Ambient temperature (°C)
    pub temperature: Option<f64>,
    /// Relative humidity (%)
    pub humidity: Option<f64>,
    /// Wind speed (m/s)
    pub wind_speed: Option<f64>,
    /// Cloud cover (%)
    pub cloud_cover: Option<f64>,
    /// Global horizontal irradiance (W/m²)
    pub solar_irradiance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forecast: Vec<ForecastEntry>,
}

impl WeatherReading {
    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE_C)
    }

    pub fn humidity_or_default(&self) -> f64 {
        self.humidity.unwrap_or(DEFAULT_HUMIDITY_PCT)
    }

    pub fn wind_speed_or_default(&self) -> f64 {
        self.wind_speed.unwrap_or(DEFAULT_WIND_SPEED_M_S)
    }

    pub fn cloud_cover_or_default(&self) -> f64 {
        self.cloud_cover.unwrap_or(DEFAULT_CLOUD_COVER_PCT)
    }

    pub fn irradiance_or_default(&self) -> f64 {
        self.solar_irradiance.unwrap_or(DEFAULT_IRRADIANCE_W_M2)
    }
}

/// A 3-hourly forecast step. Informational only; the engine ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastEntry {
    /// Local time, `%Y-%m-%d %H:%M:%S`
    pub datetime: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub cloud_cover: f64,
    pub description: String,
}

// ─── Open-Meteo wire types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub current: CurrentData,
}

#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub shortwave_radiation: Option<f64>,
}
