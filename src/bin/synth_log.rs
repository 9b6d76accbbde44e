use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use rotation_evo::synth::{self, SynthParams};

/// Writes a synthetic simulation log that the `evo` plotter can read
#[derive(Parser)]
#[command(name = "synth_log", version, about)]
struct Cli {
    /// Where to write the log
    #[arg(short, long, default_value = "log")]
    output: PathBuf,

    /// Number of record lines after the header
    #[arg(short = 'n', long, default_value_t = 2000)]
    records: usize,

    /// Time step between records
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Largest per step change of each angular velocity component
    #[arg(long, default_value_t = 0.05)]
    drift: f64,

    /// Seed byte, the same seed always gives the same log
    #[arg(long)]
    seed: Option<u8>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let params = SynthParams {
        records: cli.records,
        dt: cli.dt,
        drift: cli.drift,
        // one byte repeated is plenty to tell seeded runs apart
        seed: cli.seed.map(|s| [s; 32]),
    };

    if let Err(e) = synth::write_log(&cli.output, &params) {
        error!("could not write {}: {}", cli.output.display(), e);
        process::exit(1);
    }
    info!("wrote {} records to {}", params.records, cli.output.display());
}
