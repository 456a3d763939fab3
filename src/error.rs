//! Error type shared by the measurement pipeline.
//!
//! Nothing in the harness recovers from an error locally: a failed spawn or a
//! malformed report aborts the whole comparison session.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The wrapped benchmark process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The power tool wrote something that is not UTF-8 to its diagnostic stream.
    #[error("diagnostic output of `{command}` is not valid UTF-8")]
    Decode { command: String },

    /// The power tool summary does not match the expected layout.
    #[error("malformed power report: {reason}")]
    Parse { reason: String },

    /// A derived quantity would divide by zero, e.g. a trial that ran no longer
    /// than the baseline.
    #[error("division by zero while computing {what}")]
    ZeroDenominator { what: &'static str },

    /// An average or summary was requested over an empty set of samples.
    #[error("no samples for {0}")]
    NoSamples(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse { reason: reason.into() }
    }
}
