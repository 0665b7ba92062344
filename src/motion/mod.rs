pub mod intensity;
pub mod kinematics;
pub mod response;
pub mod spectral;

use realfft::num_complex::Complex64;
use thiserror::Error;

use kinematics::GRAVITY_CM_S2;
use response::ResponseSpectrum;
use spectral::FourierSpectrum;

#[derive(Error, Debug)]
pub enum MotionError {
    #[error("Invalid time step: {0} (must be finite and > 0)")]
    InvalidTimeStep(f64),
    #[error("Acceleration record is empty")]
    EmptyAcceleration,
    #[error("Total Arias intensity is zero; durations are undefined")]
    ZeroIntensity,
    #[error("Invalid oscillator period: {0} (must be finite and > 0)")]
    InvalidPeriod(f64),
    #[error("Oscillator period {0} is too short to resolve for this record")]
    PeriodTooShort(f64),
    #[error("No oscillator periods requested")]
    EmptyPeriods,
    #[error("Invalid damping ratio: {0}")]
    InvalidDamping(f64),
    #[error("Invalid scale factor: {0} (must be finite and > 0)")]
    InvalidScale(f64),
    #[error("Transform needs at least one sample")]
    EmptyTransform,
    #[error("FFT error: {0}")]
    Fft(String),
}

/// Raw record as handed over by a loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMotion {
    pub event_id: String,
    pub station_id: String,
    pub component_id: String,
    pub details: String,
    pub dt: f64,
    pub acceleration: Vec<f64>,
}

/// Settings applied when deriving spectra from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSettings {
    /// Fraction of critical damping.
    pub damping: f64,
    /// Oscillator periods (s), in the order the spectrum is reported.
    pub periods: Vec<f64>,
    /// Multiplier turning acceleration units into velocity units per second.
    pub gravity: f64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            damping: 0.05,
            periods: crate::periods::default_periods(),
            gravity: GRAVITY_CM_S2,
        }
    }
}

/// A single-component accelerogram with every derived quantity.
///
/// All derived fields are populated once by [`MotionRecord::process`]. The
/// only mutation afterwards is [`MotionRecord::scale_by`], which rescales the
/// time series, peaks and Arias intensity in place. The Fourier and response
/// spectra keep the values from the last full processing until
/// [`MotionRecord::refresh_spectra`] is called.
#[derive(Debug, Clone)]
pub struct MotionRecord {
    event_id: String,
    station_id: String,
    component_id: String,
    details: String,

    dt: f64,
    time: Vec<f64>,
    acc: Vec<f64>,
    vel: Vec<f64>,
    disp: Vec<f64>,

    pga: f64,
    pgv: f64,
    pgd: f64,
    arias: f64,
    dur5_75: f64,
    dur5_95: f64,

    fourier: FourierSpectrum,
    response: ResponseSpectrum,

    prev_scale: f64,
}

impl MotionRecord {
    /// Validate a raw record and derive kinematics, durations and spectra.
    pub fn process(raw: RawMotion, settings: &ProcessingSettings) -> Result<Self, MotionError> {
        let RawMotion {
            event_id,
            station_id,
            component_id,
            details,
            dt,
            acceleration: acc,
        } = raw;

        if !(dt.is_finite() && dt > 0.0) {
            return Err(MotionError::InvalidTimeStep(dt));
        }
        let pga = kinematics::peak_abs(&acc).ok_or(MotionError::EmptyAcceleration)?;
        response::validate_damping(settings.damping)?;
        response::validate_periods(&settings.periods)?;

        let time: Vec<f64> = (0..acc.len()).map(|i| i as f64 * dt).collect();

        let kin = kinematics::integrate(&acc, dt, settings.gravity);
        let pgv = kinematics::peak_abs(&kin.vel).unwrap_or(0.0);
        let pgd = kinematics::peak_abs(&kin.disp).unwrap_or(0.0);

        let durations = intensity::analyze(&acc, dt)?;

        let fourier = spectral::fourier_spectrum(&acc, dt)?;
        let response = response::compute(settings.damping, &settings.periods, &fourier)?;

        let record = Self {
            event_id,
            station_id,
            component_id,
            details,
            dt,
            time,
            acc,
            vel: kin.vel,
            disp: kin.disp,
            pga,
            pgv,
            pgd,
            arias: durations.arias,
            dur5_75: durations.dur5_75,
            dur5_95: durations.dur5_95,
            fourier,
            response,
            prev_scale: 1.0,
        };

        log::debug!(
            "Processed {}: n={}, dt={}, PGA={:.4}, D5-95={:.2}s",
            record.name(),
            record.len(),
            record.dt,
            record.pga,
            record.dur5_95
        );

        Ok(record)
    }

    /// `event/stationcomponent`
    pub fn name(&self) -> String {
        format!("{}/{}{}", self.event_id, self.station_id, self.component_id)
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    /// Records are always single-component.
    pub fn component_count(&self) -> usize {
        1
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.acc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acc.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn acc(&self) -> &[f64] {
        &self.acc
    }

    pub fn vel(&self) -> &[f64] {
        &self.vel
    }

    pub fn disp(&self) -> &[f64] {
        &self.disp
    }

    pub fn pga(&self) -> f64 {
        self.pga
    }

    pub fn pgv(&self) -> f64 {
        self.pgv
    }

    pub fn pgd(&self) -> f64 {
        self.pgd
    }

    pub fn arias_intensity(&self) -> f64 {
        self.arias
    }

    pub fn dur5_75(&self) -> f64 {
        self.dur5_75
    }

    pub fn dur5_95(&self) -> f64 {
        self.dur5_95
    }

    /// Frequency axis of the Fourier spectrum (Hz).
    pub fn freq(&self) -> &[f64] {
        &self.fourier.freq
    }

    /// Complex Fourier coefficients of the zero-padded acceleration.
    pub fn fas(&self) -> &[Complex64] {
        &self.fourier.fas
    }

    pub fn fourier(&self) -> &FourierSpectrum {
        &self.fourier
    }

    pub fn response(&self) -> &ResponseSpectrum {
        &self.response
    }

    pub fn damping(&self) -> f64 {
        self.response.damping
    }

    pub fn periods(&self) -> &[f64] {
        &self.response.periods
    }

    pub fn sa(&self) -> &[f64] {
        &self.response.sa
    }

    pub fn ln_sa(&self) -> &[f64] {
        &self.response.ln_sa
    }

    pub fn avg_ln_sa(&self) -> f64 {
        self.response.avg_ln_sa
    }

    /// Net amplitude multiplier applied relative to the loaded record.
    pub fn prev_scale(&self) -> f64 {
        self.prev_scale
    }

    /// Rescale to an absolute multiplier of the original record.
    ///
    /// The step actually applied is `factor / prev_scale`; amplitudes scale
    /// by that ratio and Arias intensity by its square. Durations are
    /// amplitude-independent. Spectra are left as computed at the last full
    /// processing; call [`MotionRecord::refresh_spectra`] to bring them up
    /// to date.
    pub fn scale_by(&mut self, factor: f64) -> Result<(), MotionError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(MotionError::InvalidScale(factor));
        }
        let rel = factor / self.prev_scale;

        for v in self
            .acc
            .iter_mut()
            .chain(self.vel.iter_mut())
            .chain(self.disp.iter_mut())
        {
            *v *= rel;
        }

        self.pga *= rel;
        self.pgv *= rel;
        self.pgd *= rel;
        self.arias *= rel * rel;

        self.prev_scale = factor;
        log::debug!("Scaled {} by {} (step {})", self.name(), factor, rel);
        Ok(())
    }

    /// Response spectrum of the current acceleration for the given settings.
    /// Does not touch the stored spectra.
    pub fn compute_response_spectrum(
        &self,
        damping: f64,
        periods: &[f64],
    ) -> Result<Vec<f64>, MotionError> {
        let fourier = spectral::fourier_spectrum(&self.acc, self.dt)?;
        Ok(response::compute(damping, periods, &fourier)?.sa)
    }

    /// Recompute the Fourier and response spectra from the current
    /// acceleration, keeping the damping and periods of the last processing.
    pub fn refresh_spectra(&mut self) -> Result<(), MotionError> {
        let fourier = spectral::fourier_spectrum(&self.acc, self.dt)?;
        let response = response::compute(self.response.damping, &self.response.periods, &fourier)?;
        self.fourier = fourier;
        self.response = response;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(dt: f64, acc: Vec<f64>) -> RawMotion {
        RawMotion {
            event_id: "NORTHR".into(),
            station_id: "MUL".into(),
            component_id: "009".into(),
            details: "Northridge 1994".into(),
            dt,
            acceleration: acc,
        }
    }

    fn settings() -> ProcessingSettings {
        ProcessingSettings {
            damping: 0.05,
            periods: vec![0.05, 0.1, 0.2, 0.5, 1.0],
            gravity: GRAVITY_CM_S2,
        }
    }

    fn pulse() -> Vec<f64> {
        (0..400)
            .map(|i| {
                let t = i as f64 * 0.01;
                0.3 * (t * 11.0).sin() * (-(t - 1.5).powi(2)).exp()
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_small_record() {
        let acc = vec![0.0, 1.0, -1.0, 0.5, -0.5, 0.0, 0.0, 0.0];
        let m = MotionRecord::process(raw(0.02, acc), &settings()).unwrap();

        assert_eq!(m.pga(), 1.0);
        assert!(m.dur5_95() >= 0.0);
        assert!(m.dur5_95() <= 7.0 * 0.02);
        assert!(m.dur5_75() <= m.dur5_95());
        assert_eq!(m.fas().len(), 5);
        assert_eq!(m.freq().len(), 5);
        assert_eq!(m.sa().len(), 5);
        assert_eq!(m.name(), "NORTHR/MUL009");
        assert_eq!(m.component_count(), 1);
    }

    #[test]
    fn test_series_lengths_match() {
        let m = MotionRecord::process(raw(0.01, pulse()), &settings()).unwrap();
        assert_eq!(m.time().len(), m.len());
        assert_eq!(m.vel().len(), m.len());
        assert_eq!(m.disp().len(), m.len());
        assert!((m.time()[10] - 0.1).abs() < 1e-12);
        assert_eq!(m.fas().len(), 512 / 2 + 1);
    }

    #[test]
    fn test_pgd_is_peak_of_displacement() {
        let m = MotionRecord::process(raw(0.01, pulse()), &settings()).unwrap();
        let peak = m.disp().iter().fold(0.0_f64, |a, v| a.max(v.abs()));
        assert_eq!(m.pgd(), peak);
        let peak_v = m.vel().iter().fold(0.0_f64, |a, v| a.max(v.abs()));
        assert_eq!(m.pgv(), peak_v);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            MotionRecord::process(raw(0.0, pulse()), &settings()),
            Err(MotionError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            MotionRecord::process(raw(-0.01, pulse()), &settings()),
            Err(MotionError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            MotionRecord::process(raw(0.01, vec![]), &settings()),
            Err(MotionError::EmptyAcceleration)
        ));
        assert!(matches!(
            MotionRecord::process(raw(0.01, vec![0.0; 32]), &settings()),
            Err(MotionError::ZeroIntensity)
        ));

        let mut bad = settings();
        bad.periods.push(0.0);
        assert!(matches!(
            MotionRecord::process(raw(0.01, pulse()), &bad),
            Err(MotionError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_scale_is_relative_to_previous() {
        let mut m = MotionRecord::process(raw(0.01, pulse()), &settings()).unwrap();
        let pga0 = m.pga();
        let pgv0 = m.pgv();
        let arias0 = m.arias_intensity();
        let acc0 = m.acc().to_vec();

        m.scale_by(2.0).unwrap();
        let pga2 = m.pga();
        assert!((pga2 / pga0 - 2.0).abs() < 1e-12);
        assert!((m.arias_intensity() / arias0 - 4.0).abs() < 1e-12);

        m.scale_by(3.0).unwrap();
        assert!((m.pga() / pga2 - 1.5).abs() < 1e-12);
        assert!((m.pga() / pga0 - 3.0).abs() < 1e-12);
        assert!((m.pgv() / pgv0 - 3.0).abs() < 1e-12);
        assert!((m.arias_intensity() / arias0 - 9.0).abs() < 1e-9);
        assert_eq!(m.prev_scale(), 3.0);
        for (a, b) in m.acc().iter().zip(&acc0) {
            assert!((a - 3.0 * b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scale_leaves_durations_and_spectra() {
        let mut m = MotionRecord::process(raw(0.01, pulse()), &settings()).unwrap();
        let d = (m.dur5_75(), m.dur5_95());
        let sa0 = m.sa().to_vec();

        m.scale_by(2.0).unwrap();
        assert_eq!((m.dur5_75(), m.dur5_95()), d);
        assert_eq!(m.sa(), sa0.as_slice());

        m.refresh_spectra().unwrap();
        for (a, b) in m.sa().iter().zip(&sa0) {
            assert!((a / b - 2.0).abs() < 1e-9);
        }
        assert!((m.avg_ln_sa() - sa0.iter().map(|v| (2.0 * v).ln()).sum::<f64>() / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_response_spectrum_uses_current_acc() {
        let mut m = MotionRecord::process(raw(0.01, pulse()), &settings()).unwrap();
        m.scale_by(0.5).unwrap();
        let sa = m.compute_response_spectrum(0.05, &[0.1, 1.0]).unwrap();
        assert!((sa[0] / m.sa()[1] - 0.5).abs() < 1e-9);
        assert!((sa[1] / m.sa()[4] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_scale_rejects_non_positive() {
        let mut m = MotionRecord::process(raw(0.01, pulse()), &settings()).unwrap();
        assert!(matches!(m.scale_by(0.0), Err(MotionError::InvalidScale(_))));
        assert!(matches!(m.scale_by(f64::NAN), Err(MotionError::InvalidScale(_))));
        assert_eq!(m.prev_scale(), 1.0);
    }
}
