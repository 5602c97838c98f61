/// ============================================================
///  Solar geometry
///
///   1. Declination   – Cooper (1969): 23.45° · sin(360°·(284+n)/365)
///   2. Hour angle    – 15° per hour from local solar noon
///   3. Elevation     – asin(sinδ·sinφ + cosδ·cosφ·cosω)
///   4. Azimuth       – atan2(sinω, cosω·sinφ − tanδ·cosφ)
///   5. Clear-sky irradiance estimate used by the offline weather reading
/// ============================================================

use chrono::{Datelike, NaiveDateTime, Timelike};

const DEG: f64 = std::f64::consts::PI / 180.0;

/// Sun position in degrees. Elevation ≤ 0 means the sun is below the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

#[inline]
pub fn declination_deg(day_of_year: f64) -> f64 {
    23.45 * (360.0 * (284.0 + day_of_year) / 365.0 * DEG).sin()
}

/// Sun position for a latitude, day of year (1–366) and local solar hour (0–23).
///
/// Azimuth is measured from the meridian: 0 at solar noon, negative in the
/// morning, positive in the afternoon.
pub fn sun_position(latitude_deg: f64, day_of_year: f64, hour: f64) -> SunPosition {
    let lat = latitude_deg * DEG;
    let decl = declination_deg(day_of_year) * DEG;
    let omega = 15.0 * (hour - 12.0) * DEG;

    let sin_alpha = decl.sin() * lat.sin() + decl.cos() * lat.cos() * omega.cos();
    let elevation = sin_alpha.clamp(-1.0, 1.0).asin();

    let azimuth = omega
        .sin()
        .atan2(omega.cos() * lat.sin() - decl.tan() * lat.cos());

    SunPosition {
        elevation_deg: elevation / DEG,
        azimuth_deg: azimuth / DEG,
    }
}

/// Rough irradiance (W/m²) for a given moment: `1000·sin(elevation)` attenuated
/// by cloud cover and ambient temperature. Zero at night.
pub fn estimate_solar_irradiance(
    temperature_c: f64,
    cloud_cover_pct: f64,
    latitude_deg: f64,
    at: NaiveDateTime,
) -> f64 {
    let sun = sun_position(latitude_deg, at.ordinal() as f64, at.hour() as f64);

    let base = if sun.elevation_deg <= 0.0 {
        0.0
    } else {
        1000.0 * (sun.elevation_deg * DEG).sin()
    };
    let cloud_factor = 1.0 - (cloud_cover_pct / 100.0) * 0.7;
    let temp_factor = 1.0 - (temperature_c - 25.0) * 0.001;

    (base * cloud_factor * temp_factor).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_equinox_noon_equator() {
        let sun = sun_position(0.0, 80.0, 12.0);
        assert!(
            (sun.elevation_deg - 90.0).abs() < 1.0,
            "Equinox noon on the equator should be ~90°, got {:.2}",
            sun.elevation_deg
        );
    }

    #[test]
    fn test_midnight_below_horizon() {
        let sun = sun_position(45.0, 172.0, 0.0);
        assert!(sun.elevation_deg < 0.0, "got {:.1}", sun.elevation_deg);
    }

    #[test]
    fn test_summer_solstice_turin() {
        // 90 - 45 + 23.45
        let sun = sun_position(45.0, 172.0, 12.0);
        assert!((sun.elevation_deg - 68.45).abs() < 0.5, "got {:.2}", sun.elevation_deg);
        assert!(sun.azimuth_deg.abs() < 1e-9, "noon azimuth should be 0, got {}", sun.azimuth_deg);
    }

    #[test]
    fn test_morning_afternoon_symmetry() {
        let am = sun_position(30.0, 100.0, 9.0);
        let pm = sun_position(30.0, 100.0, 15.0);
        assert!((am.elevation_deg - pm.elevation_deg).abs() < 1e-9);
        assert!((am.azimuth_deg + pm.azimuth_deg).abs() < 1e-9);
        assert!(am.azimuth_deg < 0.0);
    }

    #[test]
    fn test_defined_at_the_poles() {
        for lat in [-90.0, 90.0] {
            for hour in 0..24 {
                let sun = sun_position(lat, 355.0, hour as f64);
                assert!(sun.elevation_deg.is_finite());
                assert!(sun.azimuth_deg.is_finite());
            }
        }
    }

    #[test]
    fn test_irradiance_zero_at_night_and_cloud_attenuated() {
        let night = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(estimate_solar_irradiance(20.0, 0.0, 45.0, night), 0.0);

        let noon = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let clear = estimate_solar_irradiance(25.0, 0.0, 45.0, noon);
        let overcast = estimate_solar_irradiance(25.0, 100.0, 45.0, noon);
        assert!(clear > 900.0, "got {:.1}", clear);
        assert!((overcast - clear * 0.3).abs() < 1e-6);
    }
}
