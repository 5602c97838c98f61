//! Labeled training data drawn uniformly from the input domain and labeled
//! with the physics model. A fixed seed reproduces the dataset bit for bit.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::PredictionError;
use super::features::FeatureVector;
use super::physics_model::{PowerInputs, panel_power_w};
use super::solar_geometry::sun_position;

pub const DEFAULT_SAMPLES: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Draws one sample from the training domain.
pub fn draw_sample<R: Rng + ?Sized>(rng: &mut R) -> (FeatureVector, f64) {
    let latitude = rng.gen_range(-60.0..60.0);
    let longitude = rng.gen_range(-180.0..180.0);

    let panel_area = rng.gen_range(1.0..50.0);
    let tilt_angle = rng.gen_range(0.0..90.0);
    let azimuth_angle = rng.gen_range(0.0..360.0);

    let solar_irradiance = rng.gen_range(0.0..1000.0);
    let temperature = rng.gen_range(-10.0..45.0);
    let humidity = rng.gen_range(10.0..100.0);
    let wind_speed = rng.gen_range(0.0..20.0);
    let cloud_cover = rng.gen_range(0.0..100.0);

    let day_of_year = rng.gen_range(1..=365u32) as f64;
    let hour_of_day = rng.gen_range(0..=23u32) as f64;

    let sun = sun_position(latitude, day_of_year, hour_of_day);
    let power = panel_power_w(&PowerInputs {
        irradiance_w_m2: solar_irradiance,
        area_m2: panel_area,
        tilt_deg: tilt_angle,
        azimuth_deg: azimuth_angle,
        sun,
        temperature_c: temperature,
        cloud_cover_pct: cloud_cover,
    });

    let features = FeatureVector {
        latitude,
        longitude,
        panel_area,
        tilt_angle,
        azimuth_angle,
        solar_irradiance,
        temperature,
        humidity,
        wind_speed,
        cloud_cover,
        day_of_year,
        hour_of_day,
        sun_elevation: sun.elevation_deg,
        sun_azimuth: sun.azimuth_deg,
    };
    (features, power)
}

#[derive(Debug, Clone)]
pub struct SyntheticDataGenerator {
    pub n_samples: usize,
    pub seed: u64,
}

impl Default for SyntheticDataGenerator {
    fn default() -> Self {
        Self { n_samples: DEFAULT_SAMPLES, seed: DEFAULT_SEED }
    }
}

impl SyntheticDataGenerator {
    pub fn new(n_samples: usize, seed: u64) -> Self {
        Self { n_samples, seed }
    }

    pub fn generate(&self) -> Result<Dataset, PredictionError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.generate_with(&mut rng)
    }

    /// Same as [`generate`](Self::generate) with a caller-supplied random source.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dataset, PredictionError> {
        if self.n_samples < 2 {
            return Err(PredictionError::Training(format!(
                "at least 2 samples are needed, {} requested",
                self.n_samples
            )));
        }

        let mut features = Vec::with_capacity(self.n_samples);
        let mut targets = Vec::with_capacity(self.n_samples);
        for _ in 0..self.n_samples {
            let (fv, power) = draw_sample(rng);
            features.push(fv.to_row().to_vec());
            targets.push(power);
        }

        let daylight = targets.iter().filter(|p| **p > 0.0).count();
        tracing::info!(
            "generated {} synthetic samples (seed {}, {} with non-zero power)",
            self.n_samples,
            self.seed,
            daylight
        );

        Ok(Dataset { features, targets })
    }
}
