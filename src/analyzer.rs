use crate::motion::{MotionError, MotionRecord, ProcessingSettings};
use crate::scanner::{self, LoadError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Processing error: {0}")]
    Motion(#[from] MotionError),
    #[error("Thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome for one input file.
pub struct FileAnalysis {
    pub path: PathBuf,
    pub result: Result<MotionRecord, AnalyzeError>,
}

pub struct AnalyzeResult {
    pub files: Vec<FileAnalysis>,
    pub analyzed: u64,
    pub failed: u64,
}

impl AnalyzeResult {
    /// Successfully processed records, in input order.
    pub fn records(&self) -> impl Iterator<Item = &MotionRecord> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }
}

/// Load, process and optionally scale every file on a rayon pool of `jobs`
/// threads. A failure is recorded against its file and never stops the batch.
pub fn analyze_files(
    paths: &[PathBuf],
    settings: &ProcessingSettings,
    scale: Option<f64>,
    jobs: usize,
) -> Result<AnalyzeResult, AnalyzeError> {
    if paths.is_empty() {
        log::info!("No records to analyze");
        return Ok(AnalyzeResult {
            files: Vec::new(),
            analyzed: 0,
            failed: 0,
        });
    }

    log::info!("Analyzing {} records with {} workers", paths.len(), jobs);

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()?;

    let files: Vec<FileAnalysis> = pool.install(|| {
        use rayon::prelude::*;
        paths
            .par_iter()
            .map(|path| {
                let result = analyze_single_file(path, settings, scale);
                pb.inc(1);
                FileAnalysis {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    });

    let mut analyzed: u64 = 0;
    let mut failed: u64 = 0;
    for f in &files {
        match &f.result {
            Ok(_) => analyzed += 1,
            Err(e) => {
                log::warn!("Analysis failed for {}: {}", f.path.display(), e);
                failed += 1;
            }
        }
    }

    pb.finish_with_message(format!("Done: {} analyzed, {} failed", analyzed, failed));

    Ok(AnalyzeResult {
        files,
        analyzed,
        failed,
    })
}

/// Analyze a single file: load -> process -> scale.
pub fn analyze_single_file(
    path: &Path,
    settings: &ProcessingSettings,
    scale: Option<f64>,
) -> Result<MotionRecord, AnalyzeError> {
    log::debug!(
        "Analyzing: {}",
        path.file_name().and_then(|f| f.to_str()).unwrap_or("?")
    );

    let raw = scanner::load_motion(path)?;
    let mut record = MotionRecord::process(raw, settings)?;
    if let Some(factor) = scale {
        record.scale_by(factor)?;
    }
    Ok(record)
}
