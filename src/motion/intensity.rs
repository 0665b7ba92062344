//! Arias intensity and significant durations.
//!
//! The cumulative intensity is the trapezoidal integral of `acc²` scaled by
//! π/4. Durations are measured between the samples where the normalized
//! curve (the Husid plot) first reaches 5 %, 75 % and 95 %.

use std::f64::consts::PI;

use super::MotionError;

/// Total intensity plus the 5–75 % and 5–95 % significant durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityDurations {
    pub arias: f64,
    pub dur5_75: f64,
    pub dur5_95: f64,
}

/// Cumulative Arias intensity curve, same length as `acc`.
pub fn cumulative(acc: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(acc.len());
    if acc.is_empty() {
        return out;
    }

    out.push(0.0);
    for w in acc.windows(2) {
        let prev = out[out.len() - 1];
        out.push(prev + PI * 0.25 * dt * (w[1] * w[1] + w[0] * w[0]));
    }
    out
}

/// Compute total intensity and significant durations.
///
/// Each percentile index is the count of samples whose normalized intensity
/// is strictly below the threshold, so `dur5_75 <= dur5_95` always holds.
pub fn analyze(acc: &[f64], dt: f64) -> Result<IntensityDurations, MotionError> {
    let curve = cumulative(acc, dt);
    let arias = match curve.last() {
        Some(&v) => v,
        None => return Err(MotionError::EmptyAcceleration),
    };
    if arias <= 0.0 || !arias.is_finite() {
        return Err(MotionError::ZeroIntensity);
    }

    let mut i5 = 0usize;
    let mut i75 = 0usize;
    let mut i95 = 0usize;
    for v in &curve {
        let norm = v / arias;
        if norm < 0.05 {
            i5 += 1;
        }
        if norm < 0.75 {
            i75 += 1;
        }
        if norm < 0.95 {
            i95 += 1;
        }
    }

    Ok(IntensityDurations {
        arias,
        dur5_75: dt * (i75 - i5) as f64,
        dur5_95: dt * (i95 - i5) as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_is_non_decreasing() {
        let acc: Vec<f64> = (0..500)
            .map(|i| ((i as f64) * 0.37).sin() * (1.0 + (i % 7) as f64))
            .collect();
        let curve = cumulative(&acc, 0.01);
        assert_eq!(curve.len(), acc.len());
        assert_eq!(curve[0], 0.0);
        for w in curve.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_total_intensity_of_constant_record() {
        // 4 intervals of dt = 0.5 on acc = 2 → (π/4)·0.5·8·4
        let r = analyze(&[2.0; 5], 0.5).unwrap();
        assert!((r.arias - PI * 0.25 * 0.5 * 8.0 * 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_duration_ordering() {
        let acc: Vec<f64> = (0..1000)
            .map(|i| {
                let t = i as f64 * 0.01;
                (t * 9.0).sin() * (-(t - 4.0).powi(2)).exp()
            })
            .collect();
        let r = analyze(&acc, 0.01).unwrap();
        assert!(r.dur5_75 > 0.0);
        assert!(r.dur5_75 <= r.dur5_95);
        assert!(r.dur5_95 <= 999.0 * 0.01);
    }

    #[test]
    fn test_uniform_energy_durations() {
        // Constant amplitude: intensity grows linearly, so 5→95 % spans ~90 %
        // of the record.
        let n = 1001;
        let dt = 0.01;
        let r = analyze(&vec![1.0; n], dt).unwrap();
        let total = (n - 1) as f64 * dt;
        assert!((r.dur5_95 - 0.9 * total).abs() < 2.0 * dt);
        assert!((r.dur5_75 - 0.7 * total).abs() < 2.0 * dt);
    }

    #[test]
    fn test_exact_percentile_counts() {
        // acc² = [0, 1, 1, 1, 0] → cumulative ∝ [0, 1, 3, 5, 6]
        // normalized [0, 0.167, 0.5, 0.833, 1]: i5 = 1, i75 = 3, i95 = 4
        let r = analyze(&[0.0, 1.0, -1.0, 1.0, 0.0], 0.5).unwrap();
        assert_eq!(r.dur5_75, 0.5 * 2.0);
        assert_eq!(r.dur5_95, 0.5 * 3.0);
        assert!((r.arias - PI * 0.25 * 0.5 * 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_small_record_counts() {
        // acc² = [0, 1, 1, .25, .25, 0, 0, 0] → cumulative ∝
        // [0, 1, 3, 4.25, 4.75, 5, 5, 5], normalized [0, .2, .6, .85, .95, 1, 1, 1]
        // i5 = 1, i75 = 3; the 95 % crossing sits on the fifth sample, so
        // i95 is 4 or 5 depending on rounding of 4.75 / 5.
        let dt = 0.02;
        let r = analyze(&[0.0, 1.0, -1.0, 0.5, -0.5, 0.0, 0.0, 0.0], dt).unwrap();
        assert!((r.dur5_75 - 2.0 * dt).abs() < 1e-15);
        assert!(
            (r.dur5_95 - 3.0 * dt).abs() < 1e-15 || (r.dur5_95 - 4.0 * dt).abs() < 1e-15,
            "dur5_95 = {}",
            r.dur5_95
        );
    }

    #[test]
    fn test_all_zero_is_rejected() {
        assert!(matches!(
            analyze(&[0.0; 16], 0.01),
            Err(MotionError::ZeroIntensity)
        ));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(
            analyze(&[], 0.01),
            Err(MotionError::EmptyAcceleration)
        ));
    }
}
