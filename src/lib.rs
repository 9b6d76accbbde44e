//! Plots the time evolution of a tumbling particle from a simulation log.
//!
//! The pipeline runs strictly forward: [`loader`] reads the header and the trailing record window,
//! [`decoder`] turns every record line into a [`SimulationRecord`], [`projector`] derives the three
//! body axis trajectories and [`plot`] hands them to gnuplot.

pub mod config;
pub mod decoder;
pub mod error;
pub mod loader;
pub mod parallel;
pub mod plot;
pub mod projector;
pub mod schema;
pub mod synth;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

pub use config::Config;
pub use decoder::SimulationRecord;
pub use error::{EvoError, Result};
pub use loader::{LogWindow, ReferenceFrame};
pub use projector::OrbitTrajectories;

/// What a finished run produced
///
/// # Fields
///
/// * `records` - number of decoded records
/// * `figure` - path of the rendered PNG
/// * `csv` - path of the trajectory dump, if one was requested
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub figure: PathBuf,
    pub csv: Option<PathBuf>,
}

/// Loads, decodes and projects a log. Touches nothing but the log itself.
pub fn trajectories_from_log(path: &Path, threads: usize) -> Result<OrbitTrajectories> {
    let (frame, window) = loader::load(path)?;
    info!("{}: {} of {} lines are records", path.display(), window.len(), window.total_lines);

    let records = parallel::decode_window_parallel(&window, &frame, threads)?;
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        info!("decoded {} records, t = {} .. {}", records.len(), first.time.x, last.time.x);
    }
    Ok(projector::project(&records, &frame))
}

/// Runs the whole pipeline for `config`. Any failure aborts the run before a figure is written.
pub fn run(config: &Config) -> Result<RunSummary> {
    fs::create_dir_all(&config.output_dir).map_err(|source| EvoError::FileAccess {
        path: config.output_dir.clone(),
        source,
    })?;

    let trajectories = trajectories_from_log(&config.log_path, config.threads)?;

    let csv = if config.write_csv {
        let path = config.csv_path();
        trajectories.to_csv(&path)
            .map_err(|source| EvoError::FileAccess { path: path.clone(), source })?;
        info!("wrote {}", path.display());
        Some(path)
    } else {
        None
    };

    let figure = plot::plot_orbit(&trajectories, &config.output_dir, &config.output_base_name,
                                  config.keep_plot_files)?;

    Ok(RunSummary { records: trajectories.len(), figure, csv })
}
