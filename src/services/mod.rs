pub mod features;
pub mod model_store;
pub mod optimal;
pub mod physics_model;
pub mod prediction_service;
pub mod regression;
pub mod scaler;
pub mod solar_geometry;
pub mod synthesizer;
pub mod synthetic_data;
pub mod trainer;
pub mod weather_service;

#[cfg(test)]
pub(crate) mod test_support;
