use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Algorithms understood by the `run_enc_dec` benchmark.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Sets up the data but encodes nothing; used as the baseline.
    #[serde(rename = "NO")]
    NoOp,
    #[serde(rename = "RS")]
    ReedSolomon,
    #[serde(rename = "RLC")]
    Rlc,
}

impl Algorithm {
    /// Name passed on the benchmark command line.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::NoOp => "NO",
            Algorithm::ReedSolomon => "RS",
            Algorithm::Rlc => "RLC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NO" => Ok(Algorithm::NoOp),
            "RS" => Ok(Algorithm::ReedSolomon),
            "RLC" => Ok(Algorithm::Rlc),
            _ => Err(Error::InvalidConfig(format!("unknown algorithm '{}'", s))),
        }
    }
}

/// One measurement condition: the algorithm plus the two opaque benchmark parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialParams {
    pub algorithm: Algorithm,
    pub k: u32,
    pub r: u32,
}

impl TrialParams {
    pub fn new(algorithm: Algorithm, k: u32, r: u32) -> Self {
        TrialParams { algorithm, k, r }
    }

    /// The no-op run every session subtracts from its trials.
    pub fn baseline() -> Self {
        TrialParams::new(Algorithm::NoOp, 0, 0)
    }

    /// Benchmark arguments in command-line order.
    pub fn to_args(&self) -> [String; 3] {
        [self.algorithm.name().to_string(), self.k.to_string(), self.r.to_string()]
    }
}

/// Elapsed time and package energy of one run, or the mean of several.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub elapsed_secs: f64,
    pub energy_joules: f64,
}

impl Measurement {
    pub fn new(elapsed_secs: f64, energy_joules: f64) -> Self {
        Measurement { elapsed_secs, energy_joules }
    }

    /// Component-wise arithmetic mean. Returns `None` for an empty slice.
    pub fn mean(samples: &[Measurement]) -> Option<Measurement> {
        if samples.is_empty() {
            return None;
        }

        let len = samples.len() as f64;
        let elapsed_secs = samples.iter().map(|m| m.elapsed_secs).sum::<f64>() / len;
        let energy_joules = samples.iter().map(|m| m.energy_joules).sum::<f64>() / len;

        Some(Measurement { elapsed_secs, energy_joules })
    }

    /// Subtracts the baseline overhead from this measurement.
    pub fn adjust(&self, baseline: &Measurement) -> AdjustedMeasurement {
        AdjustedMeasurement {
            delta_secs: self.elapsed_secs - baseline.elapsed_secs,
            delta_joules: self.energy_joules - baseline.energy_joules,
        }
    }
}

/// A measurement with the baseline subtracted. Deltas may be negative when a
/// trial happens to run faster than the baseline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustedMeasurement {
    pub delta_secs: f64,
    pub delta_joules: f64,
}

impl AdjustedMeasurement {
    /// Average power drawn on top of the baseline, in watts.
    pub fn watts(&self) -> Result<f64> {
        checked_ratio(self.delta_joules, self.delta_secs, "power (joules / seconds)")
    }
}

/// `numerator / denominator`, refusing to produce an infinity or NaN from a zero denominator.
pub fn checked_ratio(numerator: f64, denominator: f64, what: &'static str) -> Result<f64> {
    if denominator == 0.0 {
        return Err(Error::ZeroDenominator { what });
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn algorithm_names_round_trip() {
        for alg in [Algorithm::NoOp, Algorithm::ReedSolomon, Algorithm::Rlc] {
            assert_eq!(alg.name().parse::<Algorithm>().unwrap(), alg);
        }
        assert!("rs".parse::<Algorithm>().is_err());
    }

    #[test]
    fn trial_args_are_decimal() {
        let params = TrialParams::new(Algorithm::Rlc, 2000, 40);
        assert_eq!(params.to_args(), ["RLC".to_string(), "2000".to_string(), "40".to_string()]);
        assert_eq!(TrialParams::baseline().to_args(), ["NO".to_string(), "0".to_string(), "0".to_string()]);
    }

    #[test]
    fn mean_of_three_samples() {
        let samples = [
            Measurement::new(1.0, 10.0),
            Measurement::new(2.0, 20.0),
            Measurement::new(3.0, 30.0),
        ];
        let avg = Measurement::mean(&samples).unwrap();
        assert_abs_diff_eq!(avg.elapsed_secs, 2.0);
        assert_abs_diff_eq!(avg.energy_joules, 20.0);
        assert!(Measurement::mean(&[]).is_none());
    }

    #[test]
    fn adjust_subtracts_baseline() {
        let baseline = Measurement::new(1.0, 5.0);
        let adjusted = Measurement::new(3.0, 20.0).adjust(&baseline);
        assert_abs_diff_eq!(adjusted.delta_secs, 2.0);
        assert_abs_diff_eq!(adjusted.delta_joules, 15.0);
    }

    #[test]
    fn watts_from_adjusted() {
        let adjusted = AdjustedMeasurement { delta_secs: 5.0, delta_joules: 50.0 };
        assert_abs_diff_eq!(adjusted.watts().unwrap(), 10.0);
    }

    #[test]
    fn watts_rejects_zero_interval() {
        let adjusted = AdjustedMeasurement { delta_secs: 0.0, delta_joules: 50.0 };
        assert!(matches!(adjusted.watts(), Err(Error::ZeroDenominator { .. })));
    }
}
