use log::info;
use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::measurement::{checked_ratio, AdjustedMeasurement, Algorithm, Measurement, TrialParams};
use crate::plot::plot_energy_efficiency;
use crate::runner::Measurer;

pub const SUMMARY_FILE_NAME: &str = "energy_efficiency.json";

/// Parameters of one comparison session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub k: u32,
    pub r: u32,
    /// Number of independent trials, each measuring both algorithms once.
    pub trials: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { k: 2000, r: 40, trials: 100 }
    }
}

/// Baseline-adjusted result of one algorithm in one trial.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct AlgorithmResult {
    pub adjusted: AdjustedMeasurement,
    pub watts: f64,
}

impl AlgorithmResult {
    pub fn from_measurement(measurement: &Measurement, baseline: &Measurement) -> Result<Self> {
        let adjusted = measurement.adjust(baseline);
        let watts = adjusted.watts()?;
        Ok(AlgorithmResult { adjusted, watts })
    }
}

/// Algorithm A (Reed-Solomon) and Algorithm B (RLC) measured in the same trial.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TrialRecord {
    pub rs: AlgorithmResult,
    pub rlc: AlgorithmResult,
}

impl TrialRecord {
    /// `E_RS / E_RLC`
    pub fn energy_ratio(&self) -> Result<f64> {
        checked_ratio(self.rs.adjusted.delta_joules, self.rlc.adjusted.delta_joules, "energy ratio")
    }

    /// `P_RS / P_RLC`
    pub fn power_ratio(&self) -> Result<f64> {
        checked_ratio(self.rs.watts, self.rlc.watts, "power ratio")
    }
}

/// All trials of one session, sharing a single baseline.
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    pub config: SessionConfig,
    pub baseline: Measurement,
    pub records: Vec<TrialRecord>,
}

impl ComparisonSession {
    pub fn new(config: SessionConfig, baseline: Measurement) -> Self {
        ComparisonSession { config, baseline, records: Vec::with_capacity(config.trials) }
    }

    /// Adjusts both raw measurements against the session baseline and appends the trial.
    pub fn record(&mut self, rs: &Measurement, rlc: &Measurement) -> Result<&TrialRecord> {
        let record = TrialRecord {
            rs: AlgorithmResult::from_measurement(rs, &self.baseline)?,
            rlc: AlgorithmResult::from_measurement(rlc, &self.baseline)?,
        };
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn energy_ratios(&self) -> Result<Vec<f64>> {
        self.records.iter().map(TrialRecord::energy_ratio).collect()
    }

    pub fn power_ratios(&self) -> Result<Vec<f64>> {
        self.records.iter().map(TrialRecord::power_ratio).collect()
    }
}

fn should_report(i: usize) -> bool {
    i == 0 || (i + 1) % 10 == 0
}

/// Measures the no-op baseline once, then RS and RLC `config.trials` times.
pub fn run_comparison<M: Measurer>(measurer: &mut M, config: &SessionConfig) -> Result<ComparisonSession> {
    // Measure the baseline once; it stays fixed for the whole session
    let baseline = measurer.measure(&TrialParams::baseline())?;
    info!(
        "Baseline: {:.6} s, {:.3} J",
        baseline.elapsed_secs, baseline.energy_joules
    );

    let rs_params = TrialParams::new(Algorithm::ReedSolomon, config.k, config.r);
    let rlc_params = TrialParams::new(Algorithm::Rlc, config.k, config.r);

    let mut session = ComparisonSession::new(*config, baseline);
    for i in 0..config.trials {
        if should_report(i) {
            info!("Running test {}", i + 1);
        }

        // Measure both algorithms under the same (k, r)
        let rs = measurer.measure(&rs_params)?;
        let rlc = measurer.measure(&rlc_params)?;

        // Subtract the baseline and derive power
        session.record(&rs, &rlc)?;
    }

    Ok(session)
}

/// Descriptive statistics of one ratio sequence.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RatioSummary {
    pub name: String,
    pub samples: usize,
    pub min: f64,
    pub median: f64,
    pub mean: f64,
    pub max: f64,
}

impl RatioSummary {
    pub fn from_values(name: &str, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::NoSamples(name.to_string()));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let len = sorted.len();
        let median = if len % 2 == 0 {
            (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
        } else {
            sorted[len / 2]
        };

        Ok(RatioSummary {
            name: name.to_string(),
            samples: len,
            min: sorted[0],
            median,
            mean: sorted.iter().sum::<f64>() / len as f64,
            max: sorted[len - 1],
        })
    }
}

/// What gets written next to the plot: configuration, baseline and ratio statistics.
#[derive(Serialize, Debug, Clone)]
pub struct SessionSummary {
    pub config: SessionConfig,
    /// Benchmark runs the measurer averaged into every measurement.
    pub run_count: usize,
    pub baseline: Measurement,
    pub ratios: Vec<RatioSummary>,
}

/// Files produced by [`write_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub plot: PathBuf,
    pub summary: PathBuf,
}

/// Creates `output` (with parents), renders the ECDF plot into it and then
/// writes the JSON summary next to it.
pub fn write_report(output: &Path, summary: &SessionSummary, energy_ratios: &[f64], power_ratios: &[f64]) -> Result<ReportPaths> {
    fs::create_dir_all(output)?;

    // Render the plot first so a failed plot leaves no summary behind
    let plot = plot_energy_efficiency(output, summary.config.k, summary.config.r, energy_ratios, power_ratios)?;
    info!("Saved plot to {}", plot.display());

    let summary_path = output.join(SUMMARY_FILE_NAME);
    fs::write(&summary_path, serde_json::to_string_pretty(summary)?)?;
    info!("Saved summary to {}", summary_path.display());

    Ok(ReportPaths { plot, summary: summary_path })
}

pub fn print_summary(summary: &SessionSummary) {
    let mut table = Table::new();
    table.add_row(row!["Ratio", "Trials", "Min", "Median", "Mean", "Max"]);

    for ratio in &summary.ratios {
        table.add_row(row![
            &ratio.name,
            ratio.samples,
            format!("{:.4}", ratio.min),
            format!("{:.4}", ratio.median),
            format!("{:.4}", ratio.mean),
            format!("{:.4}", ratio.max),
        ]);
    }

    println!(
        "\nEnergy efficiency, k={}, r={}, {} run(s) per measurement (baseline {:.6} s, {:.3} J)",
        summary.config.k,
        summary.config.r,
        summary.run_count,
        summary.baseline.elapsed_secs,
        summary.baseline.energy_joules
    );
    table.printstd();
}
