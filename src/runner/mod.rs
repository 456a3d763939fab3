use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::measurement::{Measurement, TrialParams};
use crate::turbostat::parse_summary;

/// Flags that make turbostat print only elapsed time and package joules.
pub const TURBOSTAT_FLAGS: [&str; 5] = ["--Summary", "--quiet", "--Joules", "--show", "Pkg_J"];

/// Takes a single raw measurement of a benchmark run.
pub trait Sampler {
    fn sample(&mut self, params: &TrialParams) -> Result<Measurement>;
}

/// Produces the averaged measurement for one trial condition.
///
/// The comparison loop only depends on this trait, so it can be driven by a
/// stub in tests or by a data source other than turbostat.
pub trait Measurer {
    fn measure(&mut self, params: &TrialParams) -> Result<Measurement>;
}

/// How the benchmark is launched.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolConfig {
    /// Program and leading arguments of the power tool, e.g. `sudo turbostat`.
    pub wrapper: Vec<String>,
    pub benchmark: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            wrapper: vec!["sudo".to_string(), "turbostat".to_string()],
            benchmark: PathBuf::from("./bin/run_enc_dec"),
        }
    }
}

/// Runs the benchmark under turbostat and parses the summary it leaves on stderr.
pub struct TurbostatSampler {
    config: ToolConfig,
}

impl TurbostatSampler {
    pub fn new(config: ToolConfig) -> Result<Self> {
        if config.wrapper.is_empty() {
            return Err(Error::InvalidConfig("power tool command is empty".to_string()));
        }
        Ok(TurbostatSampler { config })
    }

    /// Full command line for `params`, program first.
    pub fn command_line(&self, params: &TrialParams) -> Vec<String> {
        let mut line = self.config.wrapper.clone();
        line.extend(TURBOSTAT_FLAGS.iter().map(|s| s.to_string()));
        line.push(self.config.benchmark.to_string_lossy().into_owned());
        line.extend(params.to_args());
        line
    }
}

impl Sampler for TurbostatSampler {
    fn sample(&mut self, params: &TrialParams) -> Result<Measurement> {
        let line = self.command_line(params);
        let printable = line.join(" ");
        debug!("Executing {}", printable);

        // The benchmark's own stdout is not part of the report
        let output = Command::new(&line[0])
            .args(&line[1..])
            .stdout(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn { command: printable.clone(), source })?;

        if !output.status.success() {
            warn!("`{}` exited with {}", printable, output.status);
        }

        let stderr = String::from_utf8(output.stderr).map_err(|_| Error::Decode { command: printable })?;
        let measurement = parse_summary(&stderr)?;
        debug!(
            "{} k={} r={}: {:.6} s, {:.3} J",
            params.algorithm, params.k, params.r, measurement.elapsed_secs, measurement.energy_joules
        );

        Ok(measurement)
    }
}

/// Averages `run_count` sequential samples per trial condition.
pub struct TrialRunner<S: Sampler> {
    sampler: S,
    run_count: usize,
}

impl<S: Sampler> TrialRunner<S> {
    pub fn new(sampler: S, run_count: usize) -> Result<Self> {
        if run_count == 0 {
            return Err(Error::InvalidConfig("run count must be at least 1".to_string()));
        }
        Ok(TrialRunner { sampler, run_count })
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }
}

impl<S: Sampler> Measurer for TrialRunner<S> {
    fn measure(&mut self, params: &TrialParams) -> Result<Measurement> {
        let mut samples = Vec::with_capacity(self.run_count);
        for _ in 0..self.run_count {
            samples.push(self.sampler.sample(params)?);
        }

        Measurement::mean(&samples).ok_or_else(|| Error::NoSamples(format!("{} k={} r={}", params.algorithm, params.k, params.r)))
    }
}
