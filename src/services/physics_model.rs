//! First-order PV power model used to label synthetic training samples.
//!
//! P = G · A · η · cos(θ) · (1 − 0.7·cloud) · (1 + β·(T − 25)), floored at 0.
//! Only the training pipeline calls this; live predictions come from the model.

use super::solar_geometry::SunPosition;

const DEG: f64 = std::f64::consts::PI / 180.0;

pub const PANEL_EFFICIENCY: f64 = 0.20;
/// Per-°C derating referenced to 25 °C
pub const TEMP_COEFFICIENT: f64 = -0.004;
/// Share of irradiance removed by full cloud cover
pub const CLOUD_ATTENUATION: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct PowerInputs {
    pub irradiance_w_m2: f64,
    pub area_m2: f64,
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
    pub sun: SunPosition,
    pub temperature_c: f64,
    pub cloud_cover_pct: f64,
}

/// Cosine of the angle between the sun's rays and the panel normal.
pub fn cos_incidence(sun: SunPosition, tilt_deg: f64, azimuth_deg: f64) -> f64 {
    let alpha = sun.elevation_deg * DEG;
    let tilt = tilt_deg * DEG;
    let az_diff = (sun.azimuth_deg - azimuth_deg) * DEG;

    // cos(acos(x)) == x on [-1, 1]
    (alpha.sin() * tilt.cos() + alpha.cos() * tilt.sin() * az_diff.cos()).clamp(-1.0, 1.0)
}

/// Instantaneous DC power (W). Exactly 0 when the sun is at or below the horizon.
pub fn panel_power_w(inputs: &PowerInputs) -> f64 {
    if inputs.sun.elevation_deg <= 0.0 {
        return 0.0;
    }

    let temp_loss = TEMP_COEFFICIENT * (inputs.temperature_c - 25.0);
    let cloud_factor = 1.0 - (inputs.cloud_cover_pct / 100.0) * CLOUD_ATTENUATION;
    let cos_theta = cos_incidence(inputs.sun, inputs.tilt_deg, inputs.azimuth_deg);

    let power = inputs.irradiance_w_m2
        * inputs.area_m2
        * PANEL_EFFICIENCY
        * cos_theta
        * cloud_factor
        * (1.0 + temp_loss);

    power.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn inputs(sun: SunPosition) -> PowerInputs {
        PowerInputs {
            irradiance_w_m2: 1000.0,
            area_m2: 10.0,
            tilt_deg: 0.0,
            azimuth_deg: 180.0,
            sun,
            temperature_c: 25.0,
            cloud_cover_pct: 0.0,
        }
    }

    #[test]
    fn test_zenith_sun_on_flat_panel() {
        let sun = SunPosition { elevation_deg: 90.0, azimuth_deg: 0.0 };
        let p = panel_power_w(&inputs(sun));
        assert!((p - 2000.0).abs() < 1e-6, "got {}", p);
    }

    #[test]
    fn test_below_horizon_is_exactly_zero() {
        for elevation in [0.0, -0.001, -45.0] {
            let sun = SunPosition { elevation_deg: elevation, azimuth_deg: 10.0 };
            let mut i = inputs(sun);
            i.irradiance_w_m2 = 5000.0;
            i.temperature_c = -40.0;
            assert_eq!(panel_power_w(&i), 0.0);
        }
    }

    #[test]
    fn test_cloud_and_temperature_derating() {
        let sun = SunPosition { elevation_deg: 90.0, azimuth_deg: 0.0 };
        let mut i = inputs(sun);
        i.cloud_cover_pct = 50.0;
        i.temperature_c = 35.0;
        // 2000 · 0.65 · 0.96
        assert!((panel_power_w(&i) - 1248.0).abs() < 1e-6);
    }

    #[test]
    fn test_panel_facing_away_produces_nothing() {
        let sun = SunPosition { elevation_deg: 10.0, azimuth_deg: 0.0 };
        let mut i = inputs(sun);
        i.tilt_deg = 90.0;
        i.azimuth_deg = 180.0;
        assert_eq!(panel_power_w(&i), 0.0);
    }

    #[test]
    fn test_never_negative_over_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5_000 {
            let i = PowerInputs {
                irradiance_w_m2: rng.gen_range(0.0..1000.0),
                area_m2: rng.gen_range(1.0..50.0),
                tilt_deg: rng.gen_range(0.0..90.0),
                azimuth_deg: rng.gen_range(0.0..360.0),
                sun: SunPosition {
                    elevation_deg: rng.gen_range(-90.0..90.0),
                    azimuth_deg: rng.gen_range(-180.0..180.0),
                },
                temperature_c: rng.gen_range(-10.0..45.0),
                cloud_cover_pct: rng.gen_range(0.0..100.0),
            };
            assert!(panel_power_w(&i) >= 0.0);
        }
    }
}
