//! Time-domain kinematics: cumulative trapezoidal integration and peak values.

/// Standard gravity in cm/s², used to turn accelerations in g into
/// velocities in cm/s.
pub const GRAVITY_CM_S2: f64 = 980.665;

/// Cumulative trapezoidal integral of `series` sampled every `dt`, multiplied
/// by `scale`. The output has the same length as the input and starts at 0.
pub fn cumtrapz(series: &[f64], dt: f64, scale: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    if series.is_empty() {
        return out;
    }

    out.push(0.0);
    for w in series.windows(2) {
        let prev = out[out.len() - 1];
        out.push(prev + scale * dt * (w[1] + w[0]) / 2.0);
    }
    out
}

/// Maximum absolute value of a series, or `None` for an empty one.
pub fn peak_abs(series: &[f64]) -> Option<f64> {
    series.iter().map(|v| v.abs()).reduce(f64::max)
}

/// Velocity and displacement derived from an acceleration record.
#[derive(Debug, Clone)]
pub struct Kinematics {
    pub vel: Vec<f64>,
    pub disp: Vec<f64>,
}

/// Integrate acceleration once (with the `gravity` unit conversion) into
/// velocity, and velocity once more into displacement.
pub fn integrate(acc: &[f64], dt: f64, gravity: f64) -> Kinematics {
    let vel = cumtrapz(acc, dt, gravity);
    let disp = cumtrapz(&vel, dt, 1.0);
    Kinematics { vel, disp }
}
