pub mod error;
pub mod measurement;
pub mod turbostat;
pub mod runner;
pub mod analysis;
pub mod plot;

pub use error::{Error, Result};
