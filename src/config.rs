//! Run configuration

use std::path::{Path, PathBuf};

pub const DEFAULT_LOG: &str = "log";
pub const DEFAULT_OUTPUT_DIR: &str = "figs";
/// prefix of every figure name
pub const BASE_NAME_PREFIX: &str = "Qt";
/// the part of the log name after the last occurrence of this marker is kept in the figure name
pub const LOG_NAME_MARKER: &str = "log";

/// Everything a single run needs to know
///
/// # Fields
///
/// * `log_path` - simulation log to read
/// * `output_dir` - created if missing, receives the figure
/// * `output_base_name` - figure file name without extension
/// * `threads` - decoder threads, 1 decodes on the calling thread
/// * `write_csv` - also dump the trajectories to `<base>.csv`
/// * `keep_plot_files` - keep the generated gnuplot script and data next to the figure
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_base_name: String,
    pub threads: usize,
    pub write_csv: bool,
    pub keep_plot_files: bool,
}

impl Config {
    /// Config with the figure name derived from `log_path`
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(log_path: P, output_dir: Q) -> Config {
        let log_path = log_path.into();
        let output_base_name = derive_base_name(&log_path);
        Config {
            log_path,
            output_dir: output_dir.into(),
            output_base_name,
            threads: 1,
            write_csv: false,
            keep_plot_files: false,
        }
    }

    pub fn figure_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.png", self.output_base_name))
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.csv", self.output_base_name))
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new(DEFAULT_LOG, DEFAULT_OUTPUT_DIR)
    }
}

/// `Qt` followed by whatever comes after the last `log` in the file name:
/// `log` gives `Qt`, `runs/log_17` gives `Qt_17`, `data.txt` gives `Qtdata.txt`.
pub fn derive_base_name(log_path: &Path) -> String {
    let file_name = log_path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = file_name.rsplit(LOG_NAME_MARKER).next().unwrap_or("");
    format!("{}{}", BASE_NAME_PREFIX, suffix)
}
