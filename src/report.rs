//! Serializable read-only views of a processed record.

use serde::Serialize;

use crate::motion::MotionRecord;

/// Scalar characterization of one record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MotionSummary {
    pub name: String,
    pub details: String,
    pub dt: f64,
    pub npts: usize,
    pub scale: f64,
    pub pga: f64,
    pub pgv: f64,
    pub pgd: f64,
    pub arias_intensity: f64,
    pub dur5_75: f64,
    pub dur5_95: f64,
    pub damping: f64,
    pub avg_ln_sa: f64,
}

impl From<&MotionRecord> for MotionSummary {
    fn from(m: &MotionRecord) -> Self {
        Self {
            name: m.name(),
            details: m.details().to_string(),
            dt: m.dt(),
            npts: m.len(),
            scale: m.prev_scale(),
            pga: m.pga(),
            pgv: m.pgv(),
            pgd: m.pgd(),
            arias_intensity: m.arias_intensity(),
            dur5_75: m.dur5_75(),
            dur5_95: m.dur5_95(),
            damping: m.damping(),
            avg_ln_sa: m.avg_ln_sa(),
        }
    }
}

/// One ordinate of a response spectrum.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpectrumRow {
    pub period: f64,
    pub frequency: f64,
    pub sa: f64,
    pub ln_sa: f64,
}

/// Rows for the stored response spectrum of `m`, in period order.
pub fn spectrum_rows(m: &MotionRecord) -> Vec<SpectrumRow> {
    m.periods()
        .iter()
        .zip(m.sa())
        .zip(m.ln_sa())
        .map(|((&period, &sa), &ln_sa)| SpectrumRow {
            period,
            frequency: 1.0 / period,
            sa,
            ln_sa,
        })
        .collect()
}

/// Fit `name` into `width` characters, ending in `...` when it is cut.
pub fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let keep = width.saturating_sub(3);
        format!("{}...", name.chars().take(keep).collect::<String>())
    }
}
