use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid --chrom filter '{0}'. Expected [id] or [id]:[start]-[end]")]
    InvalidChromFilter(String),

    #[error("--maxfreq must lie within [0, 1], got {0}")]
    InvalidMaxFreq(f64),

    #[error("--mu must be strictly positive, got {0}")]
    InvalidMu(f64),

    #[error("Output prefix '{0}' collides with an input file")]
    OutputCollision(PathBuf),
}
