pub mod analyzer;
pub mod config;
pub mod motion;
pub mod periods;
pub mod report;
pub mod scanner;

pub use motion::{MotionError, MotionRecord, ProcessingSettings, RawMotion};
pub use realfft::num_complex::Complex64;

/// Record file extensions we support
pub const SUPPORTED_EXTENSIONS: &[&str] = &["at2"];

/// Application name for XDG paths
pub const APP_NAME: &str = "groundmotion";
