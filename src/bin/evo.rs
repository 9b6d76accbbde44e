use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info};
use rotation_evo::{config, Config, Result, RunSummary};

/// Plots the time evolution of particle rotation from a simulation log
#[derive(Parser)]
#[command(name = "evo", version, about)]
struct Cli {
    /// Simulation log to read
    #[arg(short, long, default_value = config::DEFAULT_LOG)]
    log: PathBuf,

    /// Directory the figure is written to, created if missing
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
    path: PathBuf,

    /// Figure name without extension (derived from the log name by default)
    #[arg(long)]
    name: Option<String>,

    /// Number of threads decoding the records
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,

    /// Also write the trajectories as csv next to the figure
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Keep the generated gnuplot script and data file
    #[arg(long, default_value_t = false)]
    keep_plot_files: bool,
}

/// Exit status for a command line clap rejected. Usage goes out with a failure status for
/// `--help` as well as for bad flags, only `--version` counts as success.
fn usage_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayVersion => 0,
        _ => 2,
    }
}

/// Exit status for a finished pipeline run
fn run_exit_code(result: &Result<RunSummary>) -> i32 {
    match *result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.log, self.path);
        if let Some(name) = self.name {
            config.output_base_name = name;
        }
        config.threads = self.threads.max(1);
        config.write_csv = self.csv;
        config.keep_plot_files = self.keep_plot_files;
        config
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(usage_exit_code(e.kind()));
        }
    };

    let result = rotation_evo::run(&cli.into_config());
    match result {
        Ok(ref summary) => info!("plotted {} records into {}", summary.records,
                                 summary.figure.display()),
        Err(ref e) => error!("{}", e),
    }
    process::exit(run_exit_code(&result));
}
