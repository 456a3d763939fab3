use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

use energy_efficiency_rs::analysis::{print_summary, run_comparison, write_report, RatioSummary, SessionConfig, SessionSummary};
use energy_efficiency_rs::runner::{ToolConfig, TrialRunner, TurbostatSampler};
use energy_efficiency_rs::Result;

const BENCHMARK_PATH: &str = "./bin/run_enc_dec";
const K: u32 = 2000;
const R: u32 = 40;
const N_TRIALS: usize = 100;
const RUN_COUNT: usize = 1;

/// Compares the energy efficiency of RS and RLC coding under turbostat.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory where the plot and summary are saved.
    #[arg(short, long)]
    output: PathBuf,
}

fn run(output: &Path) -> Result<()> {
    // Fail before any measurement if the output directory cannot be created
    fs::create_dir_all(output)?;

    let config = SessionConfig { k: K, r: R, trials: N_TRIALS };
    let tools = ToolConfig { benchmark: PathBuf::from(BENCHMARK_PATH), ..Default::default() };
    let mut runner = TrialRunner::new(TurbostatSampler::new(tools)?, RUN_COUNT)?;

    // Run the baseline and all trials
    let session = run_comparison(&mut runner, &config)?;
    let energy_ratios = session.energy_ratios()?;
    let power_ratios = session.power_ratios()?;

    let summary = SessionSummary {
        config,
        run_count: runner.run_count(),
        baseline: session.baseline,
        ratios: vec![
            RatioSummary::from_values("E_RS / E_RLC", &energy_ratios)?,
            RatioSummary::from_values("P_RS / P_RLC", &power_ratios)?,
        ],
    };

    // Save the plot and summary, then print the table
    write_report(output, &summary, &energy_ratios, &power_ratios)?;
    print_summary(&summary);
    Ok(())
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args.output) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}
