use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use log::debug;
use serde::Serialize;

mod error;
pub use error::ConfigError;

/// A `--chrom` filter: either a whole chromosome, or a closed interval on it.
/// The absence of a bound means open on that end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChromFilter {
    pub chromosome: u8,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl ChromFilter {
    #[must_use]
    pub fn contains(&self, chromosome: u8, position: u32) -> bool {
        if chromosome != self.chromosome {
            return false;
        }
        self.start.map_or(true, |s| position >= s) && self.end.map_or(true, |e| position <= e)
    }
}

/// `sprime-rs`: score chains of rare, outgroup-depleted variants that co-occur in a target
/// cohort, emitting a per-variant segment label and score.
#[derive(Parser, Debug, Serialize)]
#[clap(name = "sprime-rs", author, version, about, long_about = None)]
pub struct Cli {
    /// Input variant table (tab-delimited, gzip accepted).
    #[clap(long)]
    pub gt: PathBuf,

    /// List of sample identifiers forming the outgroup, one per line.
    #[clap(long)]
    pub outgroup: PathBuf,

    /// PLINK-style four column genetic map (chromosome, marker id, cM, bp).
    #[clap(long)]
    pub map: PathBuf,

    /// Output file prefix. Writes `{out}.log` and `{out}.score`.
    #[clap(long)]
    pub out: PathBuf,

    /// Sample identifiers to drop from both the outgroup and the target cohort.
    #[clap(long)]
    pub excludesamples: Option<PathBuf>,

    /// Marker identifiers to drop before density and DP computations.
    #[clap(long)]
    pub excludemarkers: Option<PathBuf>,

    /// Restrict analysis to a chromosome, optionally sliced: `[id]` or `[id]:[start]-[end]`.
    #[clap(long)]
    pub chrom: Option<String>,

    /// Outgroup allele-frequency ceiling for a variant to be considered.
    #[clap(long, default_value("0.01"))]
    pub maxfreq: f64,

    /// Minimum total score for a chain of variants to be emitted as a segment.
    #[clap(long, default_value("100000"))]
    pub minscore: f64,

    /// Mutation rate per bp per meiosis.
    #[clap(long, default_value("0.000000012"))]
    pub mu: f64,

    /// Set the verbosity level (-v -vv -vvv).
    #[clap(short = 'v', long, parse(from_occurrences), global = true)]
    pub verbose: u8,

    /// Disable warnings; only errors are reported.
    #[clap(short = 'q', long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Serialize command line arguments to a human-readable string, for the log file.
    #[must_use]
    pub fn serialize(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_else(|e| format!("<failed to serialize args: {e}>"))
    }

    /// Parse `--chrom`, if provided.
    ///
    /// # Errors
    /// Returns an error if the filter does not match `[id]` or `[id]:[start]-[end]`.
    pub fn chrom_filter(&self) -> Result<Option<ChromFilter>> {
        let Some(raw) = &self.chrom else { return Ok(None) };

        let err = || ConfigError::InvalidChromFilter(raw.clone());
        let (chrom_part, range_part) = match raw.split_once(':') {
            Some((c, r)) => (c, Some(r)),
            None => (raw.as_str(), None),
        };
        let chromosome: u8 = chrom_part.parse().map_err(|_| err())?;

        let (start, end) = match range_part {
            None => (None, None),
            Some(r) => {
                let (s, e) = r.split_once('-').ok_or_else(err)?;
                let start = s.parse::<u32>().map_err(|_| err())?;
                let end = e.parse::<u32>().map_err(|_| err())?;
                (Some(start), Some(end))
            }
        };

        Ok(Some(ChromFilter{chromosome, start, end}))
    }

    /// Sanity check: `maxfreq` and `mu` must lie within their valid ranges, and the output
    /// prefix must not collide with any input file.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] on the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.maxfreq) {
            return Err(anyhow!(ConfigError::InvalidMaxFreq(self.maxfreq)));
        }
        if self.mu <= 0.0 {
            return Err(anyhow!(ConfigError::InvalidMu(self.mu)));
        }
        for input in [&self.gt, &self.outgroup, &self.map] {
            if paths_collide(input, &self.log_path()) || paths_collide(input, &self.score_path()) {
                return Err(anyhow!(ConfigError::OutputCollision(input.clone())));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        with_suffix(&self.out, "log")
    }

    #[must_use]
    pub fn score_path(&self) -> PathBuf {
        with_suffix(&self.out, "score")
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_owned();
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}

fn paths_collide(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_chromosome() {
        let cli = Cli::try_parse_from(["sprime-rs", "--gt", "a", "--outgroup", "b", "--map", "c", "--out", "d", "--chrom", "7"]).unwrap();
        let filter = cli.chrom_filter().unwrap().unwrap();
        assert_eq!(filter, ChromFilter{chromosome: 7, start: None, end: None});
    }

    #[test]
    fn parses_chromosome_slice() {
        let cli = Cli::try_parse_from(["sprime-rs", "--gt", "a", "--outgroup", "b", "--map", "c", "--out", "d", "--chrom", "7:1000-2000"]).unwrap();
        let filter = cli.chrom_filter().unwrap().unwrap();
        assert_eq!(filter, ChromFilter{chromosome: 7, start: Some(1000), end: Some(2000)});
    }

    #[test]
    fn rejects_malformed_chrom_filter() {
        let cli = Cli::try_parse_from(["sprime-rs", "--gt", "a", "--outgroup", "b", "--map", "c", "--out", "d", "--chrom", "7:oops"]).unwrap();
        assert!(cli.chrom_filter().is_err());
    }

    #[test]
    fn rejects_out_of_range_maxfreq() {
        let cli = Cli::try_parse_from(["sprime-rs", "--gt", "a", "--outgroup", "b", "--map", "c", "--out", "d", "--maxfreq", "1.5"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn chrom_filter_contains_respects_open_bounds() {
        let filter = ChromFilter{chromosome: 3, start: Some(100), end: None};
        assert!(filter.contains(3, 500));
        assert!(!filter.contains(3, 50));
        assert!(!filter.contains(4, 500));
    }
}
