use std::f64::consts::PI;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDateTime, TimeDelta};
use rand::Rng;

use crate::models::weather::{CurrentWeatherResponse, ForecastEntry, WeatherReading};
use crate::services::solar_geometry::estimate_solar_irradiance;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const FORECAST_STEPS: i64 = 8;

/// Current conditions from Open-Meteo
pub async fn fetch_current(lat: f64, lon: f64, timeout: Duration) -> Result<WeatherReading, reqwest::Error> {
    let url = format!(
        "{}?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,wind_speed_10m,cloud_cover,shortwave_radiation&wind_speed_unit=ms",
        OPEN_METEO_URL, lat, lon
    );

    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let resp: CurrentWeatherResponse = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let current = resp.current;
    Ok(WeatherReading {
        temperature: current.temperature_2m,
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        cloud_cover: current.cloud_cover,
        solar_irradiance: current.shortwave_radiation,
        description: None,
        forecast: demo_forecast(Local::now().naive_local()),
    })
}

/// Weather for a site: live when online, the demo reading otherwise or when
/// the live request fails for any reason.
pub async fn get_weather<R: Rng + ?Sized>(
    lat: f64,
    lon: f64,
    offline: bool,
    timeout: Duration,
    rng: &mut R,
) -> WeatherReading {
    if !offline {
        match fetch_current(lat, lon, timeout).await {
            Ok(reading) => return reading,
            Err(e) => tracing::warn!("weather fetch failed for ({}, {}): {}, using demo data", lat, lon, e),
        }
    }
    demo_weather(lat, Local::now().naive_local(), rng)
}

/// Pure offline reading. No network calls.
///
/// Temperature follows latitude and season; humidity, wind and cloud cover
/// are uniform draws; irradiance is estimated from the sun position.
pub fn demo_weather<R: Rng + ?Sized>(lat: f64, at: NaiveDateTime, rng: &mut R) -> WeatherReading {
    let doy = at.ordinal() as f64;
    let base_temp = 20.0 - lat.abs() * 0.5;
    let seasonal = 10.0 * (2.0 * PI * (doy - 80.0) / 365.0).sin();
    let temperature = round1(base_temp + seasonal + rng.gen_range(-5.0..5.0));

    let humidity = rng.gen_range(30.0..90.0);
    let wind_speed = rng.gen_range(0.0..15.0);
    let cloud_cover = rng.gen_range(0.0..100.0);

    WeatherReading {
        temperature: Some(temperature),
        humidity: Some(humidity),
        wind_speed: Some(wind_speed),
        cloud_cover: Some(cloud_cover),
        solar_irradiance: Some(estimate_solar_irradiance(temperature, cloud_cover, lat, at)),
        description: Some("Clear sky".to_string()),
        forecast: demo_forecast(at),
    }
}

/// Eight 3-hourly steps starting at `from`.
pub fn demo_forecast(from: NaiveDateTime) -> Vec<ForecastEntry> {
    (0..FORECAST_STEPS)
        .map(|i| {
            let f = i as f64;
            ForecastEntry {
                datetime: (from + TimeDelta::hours(i * 3)).format("%Y-%m-%d %H:%M:%S").to_string(),
                temperature: 20.0 + f * 2.0 + ((i % 3) - 1) as f64 * 3.0,
                humidity: 50.0 + (i % 4) as f64 * 10.0,
                wind_speed: 5.0 + (i % 2) as f64 * 3.0,
                cloud_cover: 30.0 + (i % 3) as f64 * 20.0,
                description: if i % 2 == 0 { "Clear sky" } else { "Partly cloudy" }.to_string(),
            }
        })
        .collect()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
