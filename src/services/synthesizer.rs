//! Expands one point prediction into a horizon-shaped series.
//!
//! The model is queried once per request. `daily` reshapes that value with a
//! fixed diurnal sinusoid; `weekly`/`monthly` scale it to a daily total and
//! apply an independent variation draw per day.

use rand::Rng;
use std::f64::consts::PI;

use crate::models::prediction::{Horizon, PeriodPower, PredictionResult};

pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_WEEK: u32 = 7;
pub const DAYS_PER_MONTH: u32 = 30;

/// `base · (0.8 + 0.4·sin(π·hour/12))`, floored at 0.
pub fn hourly_power(base: f64, hour: u32) -> f64 {
    (base * (0.8 + 0.4 * (PI * hour as f64 / 12.0).sin())).max(0.0)
}

pub fn synthesize<R: Rng + ?Sized>(base: f64, horizon: Horizon, rng: &mut R) -> PredictionResult {
    let breakdown: Vec<PeriodPower> = match horizon {
        Horizon::Daily => (0..HOURS_PER_DAY)
            .map(|hour| PeriodPower { period: hour, power: hourly_power(base, hour) })
            .collect(),
        Horizon::Weekly => (0..DAYS_PER_WEEK)
            .map(|day| PeriodPower { period: day, power: daily_power(base, 0.8, 0.4, &mut *rng) })
            .collect(),
        Horizon::Monthly => (1..=DAYS_PER_MONTH)
            .map(|day| PeriodPower { period: day, power: daily_power(base, 0.7, 0.6, &mut *rng) })
            .collect(),
    };

    let total_power: f64 = breakdown.iter().map(|p| p.power).sum();
    let (peak_period, peak_power) = peak(&breakdown);
    let average_daily = match horizon {
        Horizon::Daily => None,
        Horizon::Weekly | Horizon::Monthly => Some(total_power / breakdown.len() as f64),
    };

    PredictionResult {
        horizon,
        total_power,
        peak_power,
        peak_period,
        breakdown,
        average_daily,
    }
}

/// `base · 24 · (low + span·r)`, r ~ U(0,1), floored at 0.
fn daily_power<R: Rng + ?Sized>(base: f64, low: f64, span: f64, rng: &mut R) -> f64 {
    let r: f64 = rng.gen_range(0.0..1.0);
    (base * HOURS_PER_DAY as f64 * (low + span * r)).max(0.0)
}

/// First maximum wins ties.
fn peak(breakdown: &[PeriodPower]) -> (u32, f64) {
    breakdown
        .iter()
        .fold(None, |best: Option<&PeriodPower>, p| match best {
            Some(b) if b.power >= p.power => Some(b),
            _ => Some(p),
        })
        .map_or((0, 0.0), |p| (p.period, p.power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn daily_total_is_the_sum_of_hours() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = synthesize(150.0, Horizon::Daily, &mut rng);

        assert_eq!(result.breakdown.len(), 24);
        let sum: f64 = result.breakdown.iter().map(|p| p.power).sum();
        assert!((sum - result.total_power).abs() < 1e-9);
        assert!(result.average_daily.is_none());
    }

    #[test]
    fn daily_peak_is_at_hour_six() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = synthesize(100.0, Horizon::Daily, &mut rng);

        let (idx, max) = result
            .breakdown
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, p)| if p.power > acc.1 { (i, p.power) } else { acc });
        assert_eq!(result.peak_period as usize, idx);
        assert_eq!(result.peak_power, max);
        // sin peaks at π/2
        assert_eq!(result.peak_period, 6);
        assert!((result.peak_power - 120.0).abs() < 1e-9);
    }

    #[test]
    fn daily_does_not_consume_randomness() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        synthesize(10.0, Horizon::Daily, &mut a);
        assert_eq!(a.gen_range(0..u64::MAX), b.gen_range(0..u64::MAX));
    }

    #[test]
    fn negative_base_floors_to_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        for horizon in [Horizon::Daily, Horizon::Weekly, Horizon::Monthly] {
            let result = synthesize(-25.0, horizon, &mut rng);
            assert!(result.breakdown.iter().all(|p| p.power == 0.0));
            assert_eq!(result.total_power, 0.0);
            assert_eq!(result.peak_period, result.breakdown[0].period);
        }
    }

    #[test]
    fn weekly_entries_and_average() {
        let mut rng = StdRng::seed_from_u64(42);
        let base = 200.0;
        let result = synthesize(base, Horizon::Weekly, &mut rng);

        assert_eq!(result.breakdown.len(), 7);
        let periods: Vec<u32> = result.breakdown.iter().map(|p| p.period).collect();
        assert_eq!(periods, (0..7).collect::<Vec<_>>());
        for p in &result.breakdown {
            assert!(p.power >= base * 24.0 * 0.8 && p.power <= base * 24.0 * 1.2);
        }
        assert_eq!(result.average_daily, Some(result.total_power / 7.0));
    }

    #[test]
    fn monthly_entries_and_average() {
        let mut rng = StdRng::seed_from_u64(42);
        let base = 80.0;
        let result = synthesize(base, Horizon::Monthly, &mut rng);

        assert_eq!(result.breakdown.len(), 30);
        assert_eq!(result.breakdown[0].period, 1);
        assert_eq!(result.breakdown[29].period, 30);
        for p in &result.breakdown {
            assert!(p.power >= 0.0);
            assert!(p.power >= base * 24.0 * 0.7 && p.power <= base * 24.0 * 1.3);
        }
        assert_eq!(result.average_daily, Some(result.total_power / 30.0));
        let sum: f64 = result.breakdown.iter().map(|p| p.power).sum();
        assert!((sum - result.total_power).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_series() {
        let a = synthesize(50.0, Horizon::Monthly, &mut StdRng::seed_from_u64(9));
        let b = synthesize(50.0, Horizon::Monthly, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
