//! Real-valued forward/inverse DFT and the Fourier amplitude spectrum.
//!
//! Forward transforms of `m` real samples return the `m/2 + 1` non-negative
//! frequency coefficients. Inverse transforms of `k` coefficients return
//! `2(k - 1)` samples divided by that length, so a round trip reproduces the
//! input. Plans and buffers live only for the duration of one call.

use realfft::RealFftPlanner;
use realfft::num_complex::Complex64;

use super::MotionError;

/// Fourier amplitude spectrum paired with its frequency axis (Hz).
#[derive(Debug, Clone, Default)]
pub struct FourierSpectrum {
    pub freq: Vec<f64>,
    pub fas: Vec<Complex64>,
}

impl FourierSpectrum {
    /// Frequency spacing of the axis, or 0 when it has a single bin.
    pub fn delta_freq(&self) -> f64 {
        if self.freq.len() < 2 {
            0.0
        } else {
            self.freq[1] - self.freq[0]
        }
    }

    /// Amplitudes `|F(f)|` of the complex coefficients.
    pub fn amplitudes(&self) -> Vec<f64> {
        self.fas.iter().map(|c| c.norm()).collect()
    }
}

/// Smallest power of two `>= n` (1 for an empty series).
pub fn padded_len(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Forward real-to-complex transform.
pub fn forward(series: &[f64]) -> Result<Vec<Complex64>, MotionError> {
    if series.is_empty() {
        return Err(MotionError::EmptyTransform);
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(series.len());
    let mut input = series.to_vec();
    let mut output = r2c.make_output_vec();
    r2c.process(&mut input, &mut output)
        .map_err(|e| MotionError::Fft(e.to_string()))?;
    Ok(output)
}

/// Inverse complex-to-real transform, normalized by the output length.
pub fn inverse(coeffs: &[Complex64]) -> Result<Vec<f64>, MotionError> {
    if coeffs.len() < 2 {
        return Err(MotionError::EmptyTransform);
    }

    let len = 2 * (coeffs.len() - 1);
    let mut planner = RealFftPlanner::<f64>::new();
    let c2r = planner.plan_fft_inverse(len);
    let mut input = coeffs.to_vec();
    // DC and Nyquist bins of a real signal are real; the c2r transform only
    // reads their real parts.
    input[0].im = 0.0;
    let last = input.len() - 1;
    input[last].im = 0.0;

    let mut output = c2r.make_output_vec();
    c2r.process(&mut input, &mut output)
        .map_err(|e| MotionError::Fft(e.to_string()))?;

    let norm = len as f64;
    for v in &mut output {
        *v /= norm;
    }
    Ok(output)
}

/// Frequency axis for `k` coefficients of a series sampled every `dt`:
/// `freq[i] = i / (2·dt·(k - 1))`.
pub fn frequency_axis(k: usize, dt: f64) -> Vec<f64> {
    if k < 2 {
        return vec![0.0; k];
    }
    let d_freq = 1.0 / (2.0 * dt * (k - 1) as f64);
    (0..k).map(|i| i as f64 * d_freq).collect()
}

/// Fourier spectrum of `acc`, zero-padded to the next power of two.
pub fn fourier_spectrum(acc: &[f64], dt: f64) -> Result<FourierSpectrum, MotionError> {
    if acc.is_empty() {
        return Err(MotionError::EmptyTransform);
    }

    let mut data = acc.to_vec();
    data.resize(padded_len(acc.len()), 0.0);

    let fas = forward(&data)?;
    let freq = frequency_axis(fas.len(), dt);
    Ok(FourierSpectrum { freq, fas })
}
