pub mod at2;
pub mod filename;

use crate::SUPPORTED_EXTENSIONS;
use crate::motion::RawMotion;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Malformed header (line {line}): {message}")]
    MalformedHeader { line: usize, message: String },
    #[error("Expected {expected} samples, found {found}")]
    SampleCount { expected: usize, found: usize },
    #[error("Unparsable sample value: {0:?}")]
    BadSample(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lowercased file extension, or "" when there is none.
fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load one accelerogram, dispatching on the file extension.
pub fn load_motion(path: &Path) -> Result<RawMotion, LoadError> {
    let ext = extension(path);
    let record = match ext.as_str() {
        "at2" => at2::load_at2(path)?,
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };

    let ids = filename::parse_path(path);
    if ids.event.is_none() {
        log::debug!("No event/station ids in path {}", path.display());
    }

    Ok(RawMotion {
        event_id: ids.event.unwrap_or_default(),
        station_id: ids.station.unwrap_or_default(),
        component_id: ids.component.unwrap_or_default(),
        details: record.details,
        dt: record.dt,
        acceleration: record.samples,
    })
}

/// Recursively collect supported record files under `paths`, sorted.
pub fn find_motion_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for path in paths {
        for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if SUPPORTED_EXTENSIONS.contains(&extension(entry.path()).as_str()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    log::info!("Found {} record files", files.len());
    files
}
