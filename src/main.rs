use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use groundmotion::report::{self, MotionSummary, SpectrumRow};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "groundmotion", version, about = "Ground-motion accelerogram analyzer")]
struct Cli {
    /// Config file (defaults to the XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List record files found under the given directories
    Scan {
        /// Directories to scan (defaults to config file motion_dirs)
        paths: Vec<PathBuf>,
    },

    /// Process every record and print peaks, intensity and durations
    Analyze {
        /// Directories or files (defaults to config file motion_dirs)
        paths: Vec<PathBuf>,

        /// Number of parallel workers (0 = auto-detect from config)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        /// Damping ratio (overrides config)
        #[arg(long)]
        damping: Option<f64>,

        /// Absolute amplitude scale factor applied after processing
        #[arg(long)]
        scale: Option<f64>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the response spectrum of a single record
    Spectrum {
        /// Record file (.AT2)
        file: PathBuf,

        /// Damping ratio (overrides config)
        #[arg(long)]
        damping: Option<f64>,

        /// Absolute amplitude scale factor applied after processing
        #[arg(long)]
        scale: Option<f64>,

        /// Recompute spectra after scaling (otherwise they describe the
        /// unscaled record)
        #[arg(long)]
        refresh: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = groundmotion::config::AppConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Scan { paths } => {
            let dirs = resolve_paths(paths, &config.motion_dirs)?;
            let files = groundmotion::scanner::find_motion_files(&dirs);
            for f in &files {
                let ids = groundmotion::scanner::filename::parse_path(f);
                println!(
                    "{:<12} {:<10} {:<6} {}",
                    ids.event.as_deref().unwrap_or("?"),
                    ids.station.as_deref().unwrap_or("?"),
                    ids.component.as_deref().unwrap_or("?"),
                    f.display()
                );
            }
            println!();
            println!("Scan complete: {} records", files.len());
        }

        Commands::Analyze { paths, jobs, damping, scale, json } => {
            let dirs = resolve_paths(paths, &config.motion_dirs)?;
            let files = groundmotion::scanner::find_motion_files(&dirs);
            let settings = config
                .spectrum
                .settings(damping)
                .context("Invalid spectrum settings")?;
            let workers = if jobs > 0 { jobs } else { config.resolve_workers() };

            let result = groundmotion::analyzer::analyze_files(&files, &settings, scale, workers)
                .context("Analysis failed")?;
            let summaries: Vec<MotionSummary> = result.records().map(MotionSummary::from).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print_summary_table(&summaries);
                println!();
                println!(
                    "Analysis complete: {} analyzed, {} failed",
                    result.analyzed, result.failed
                );
            }
        }

        Commands::Spectrum { file, damping, scale, refresh, json } => {
            let settings = config
                .spectrum
                .settings(damping)
                .context("Invalid spectrum settings")?;
            let mut record = groundmotion::analyzer::analyze_single_file(&file, &settings, scale)
                .with_context(|| format!("Failed to analyze {}", file.display()))?;
            if refresh {
                record.refresh_spectra().context("Failed to recompute spectra")?;
            }

            let rows = report::spectrum_rows(&record);
            if json {
                let out = serde_json::json!({
                    "summary": MotionSummary::from(&record),
                    "spectrum": rows,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{} — {}", record.name(), record.details());
                println!(
                    "PGA {:.4}  PGV {:.3}  PGD {:.3}  D5-75 {:.2}s  D5-95 {:.2}s",
                    record.pga(),
                    record.pgv(),
                    record.pgd(),
                    record.dur5_75(),
                    record.dur5_95()
                );
                println!();
                print_spectrum_table(&rows, record.damping());
                if scale.is_some() && !refresh {
                    println!("(spectrum is for the unscaled record; pass --refresh to rescale it)");
                }
            }
        }
    }

    Ok(())
}

/// CLI paths take precedence over config `motion_dirs`.
fn resolve_paths(paths: Vec<PathBuf>, configured: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        Ok(paths)
    } else if !configured.is_empty() {
        Ok(configured.to_vec())
    } else {
        anyhow::bail!("No directories given. Pass paths as arguments or set motion_dirs in config.")
    }
}

/// Print a table of record summaries.
fn print_summary_table(rows: &[MotionSummary]) {
    println!(
        "{:<28} {:>6} {:>7} {:>5}  {:>8} {:>8} {:>8} {:>9} {:>6} {:>6}",
        "Record", "Npts", "Dt", "Scale", "PGA", "PGV", "PGD", "Arias", "D5-75", "D5-95"
    );
    println!("{}", "-".repeat(104));

    for r in rows {
        let name = report::truncate_name(&r.name, 28);

        println!(
            "{:<28} {:>6} {:>7.4} {:>5.2}  {:>8.4} {:>8.3} {:>8.3} {:>9.4} {:>6.2} {:>6.2}",
            name,
            r.npts,
            r.dt,
            r.scale,
            r.pga,
            r.pgv,
            r.pgd,
            r.arias_intensity,
            r.dur5_75,
            r.dur5_95,
        );
    }
}

/// Print a response spectrum table.
fn print_spectrum_table(rows: &[SpectrumRow], damping: f64) {
    println!("{:>10} {:>10} {:>12} {:>10}", "Period", "Freq", "Sa", "ln Sa");
    println!("{}", "-".repeat(45));
    for r in rows {
        println!(
            "{:>10.4} {:>10.3} {:>12.5} {:>10.4}",
            r.period, r.frequency, r.sa, r.ln_sa
        );
    }
    println!();
    println!("Damping: {:.1}%", damping * 100.0);
}
