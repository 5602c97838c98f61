use crate::models::prediction::OptimalConfig;

/// Fixed-tilt rule of thumb: tilt equal to latitude (clamped to [0, 90]),
/// facing the equator.
pub fn optimal_configuration(latitude: f64) -> OptimalConfig {
    OptimalConfig {
        tilt: latitude.clamp(0.0, 90.0),
        azimuth: if latitude >= 0.0 { 180.0 } else { 0.0 },
    }
}

/// `(optimal − requested) / requested · 100`, or 0 when nothing was requested.
pub fn improvement_percentage(requested_total: f64, optimal_total: f64) -> f64 {
    if requested_total > 0.0 {
        (optimal_total - requested_total) / requested_total * 100.0
    } else {
        0.0
    }
}
