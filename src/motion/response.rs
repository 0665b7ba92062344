//! Pseudo-acceleration response spectrum via an SDOF transfer function.
//!
//! For each oscillator period the Fourier spectrum of the ground motion is
//! multiplied by the single-degree-of-freedom transfer function, extended
//! with zeros so the time step after inversion resolves the oscillator
//! frequency, and inverse transformed. The spectral value is the peak of the
//! resulting time series.

use rayon::prelude::*;
use realfft::num_complex::Complex64;
use serde::Serialize;

use super::MotionError;
use super::kinematics::peak_abs;
use super::spectral::{self, FourierSpectrum};

/// Ratio of the required Nyquist frequency to the oscillator frequency.
const NYQUIST_FACTOR: f64 = 5.0;

/// Upper bound on the extended coefficient count for a single period.
pub const MAX_WORKING_SIZE: usize = 1 << 22;

/// Response spectrum for one damping ratio over an ordered period set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseSpectrum {
    pub damping: f64,
    pub periods: Vec<f64>,
    pub sa: Vec<f64>,
    pub ln_sa: Vec<f64>,
    pub avg_ln_sa: f64,
}

impl ResponseSpectrum {
    fn from_sa(damping: f64, periods: &[f64], sa: Vec<f64>) -> Self {
        let ln_sa: Vec<f64> = sa.iter().map(|v| v.ln()).collect();
        let avg_ln_sa = ln_sa.iter().sum::<f64>() / ln_sa.len() as f64;
        Self {
            damping,
            periods: periods.to_vec(),
            sa,
            ln_sa,
            avg_ln_sa,
        }
    }
}

/// Reject negative or non-finite damping ratios.
pub fn validate_damping(damping: f64) -> Result<(), MotionError> {
    if damping.is_finite() && damping >= 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidDamping(damping))
    }
}

/// Reject empty period sets and periods that have no natural frequency.
pub fn validate_periods(periods: &[f64]) -> Result<(), MotionError> {
    if periods.is_empty() {
        return Err(MotionError::EmptyPeriods);
    }
    match periods.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        Some(&p) => Err(MotionError::InvalidPeriod(p)),
        None => Ok(()),
    }
}

/// SDOF transfer function evaluated on `freq`:
///
/// ```text
///                     -fn²
/// H(f) = -------------------------------
///        (f² - fn²) - 2i·damping·fn·f
/// ```
pub fn sdof_transfer(damping: f64, fn_: f64, freq: &[f64]) -> Vec<Complex64> {
    let num = Complex64::new(-fn_ * fn_, 0.0);
    freq.iter()
        .map(|&f| num / Complex64::new(f * f - fn_ * fn_, -2.0 * damping * fn_ * f))
        .collect()
}

/// Number of coefficients needed so the inverse transform has a Nyquist
/// frequency of at least `NYQUIST_FACTOR · fn`. Periods that would need more
/// than `MAX_WORKING_SIZE` coefficients are rejected.
fn working_size(
    original: usize,
    period: f64,
    delta_freq: f64,
) -> Result<usize, MotionError> {
    let required = (NYQUIST_FACTOR / (period * delta_freq)).ceil();
    if !required.is_finite() || required > MAX_WORKING_SIZE as f64 {
        return Err(MotionError::PeriodTooShort(period));
    }
    Ok(original.max(required as usize))
}

/// Peak oscillator response for a single period.
fn peak_response(
    damping: f64,
    period: f64,
    spectrum: &FourierSpectrum,
) -> Result<f64, MotionError> {
    let fn_ = 1.0 / period;
    let original = spectrum.fas.len();
    let size = working_size(original, period, spectrum.delta_freq())?;
    let scale = size as f64 / original as f64;

    let tf = sdof_transfer(damping, fn_, &spectrum.freq);
    let mut y = vec![Complex64::new(0.0, 0.0); size];
    for ((slot, h), f) in y.iter_mut().zip(&tf).zip(&spectrum.fas) {
        *slot = scale * *h * *f;
    }

    let ts = spectral::inverse(&y)?;
    peak_abs(&ts).ok_or(MotionError::EmptyTransform)
}

/// Compute the response spectrum for every requested period.
///
/// Periods are processed in parallel; each writes only its own slot.
pub fn compute(
    damping: f64,
    periods: &[f64],
    spectrum: &FourierSpectrum,
) -> Result<ResponseSpectrum, MotionError> {
    validate_damping(damping)?;
    validate_periods(periods)?;
    if spectrum.fas.len() < 2 || spectrum.freq.len() != spectrum.fas.len() {
        return Err(MotionError::EmptyTransform);
    }

    let sa = periods
        .par_iter()
        .map(|&period| peak_response(damping, period, spectrum))
        .collect::<Result<Vec<f64>, MotionError>>()?;

    log::trace!(
        "Response spectrum: {} periods, damping {:.3}",
        periods.len(),
        damping
    );

    Ok(ResponseSpectrum::from_sa(damping, periods, sa))
}
