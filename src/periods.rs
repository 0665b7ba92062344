//! Oscillator period grids for response spectra.

use crate::motion::MotionError;

pub const DEFAULT_PERIOD_MIN: f64 = 0.01;
pub const DEFAULT_PERIOD_MAX: f64 = 10.0;
pub const DEFAULT_PERIOD_COUNT: usize = 100;

/// `count` periods spaced evenly in log between `min` and `max` (inclusive).
pub fn log_spaced(min: f64, max: f64, count: usize) -> Result<Vec<f64>, MotionError> {
    for p in [min, max] {
        if !(p.is_finite() && p > 0.0) {
            return Err(MotionError::InvalidPeriod(p));
        }
    }
    if count == 0 {
        return Err(MotionError::EmptyPeriods);
    }
    if min > max {
        return Err(MotionError::InvalidPeriod(min));
    }
    if count == 1 {
        return Ok(vec![min]);
    }

    let (lo, hi) = (min.ln(), max.ln());
    let step = (hi - lo) / (count - 1) as f64;
    let mut periods: Vec<f64> = (0..count).map(|i| (lo + step * i as f64).exp()).collect();
    // Pin the endpoints so they survive the exp/ln round trip exactly.
    periods[0] = min;
    periods[count - 1] = max;
    Ok(periods)
}

/// 100 periods from 0.01 s to 10 s.
pub fn default_periods() -> Vec<f64> {
    log_spaced(DEFAULT_PERIOD_MIN, DEFAULT_PERIOD_MAX, DEFAULT_PERIOD_COUNT)
        .unwrap_or_else(|_| vec![DEFAULT_PERIOD_MIN, DEFAULT_PERIOD_MAX])
}
