use std::{collections::HashMap, fs::File, io::{BufRead, BufReader}, path::Path};

use located_error::prelude::*;

mod error;
pub use error::GeneticMapError;

use crate::coordinate::ChrIdx;

/// A single breakpoint of a piecewise-linear genetic map: `position` (bp) maps to `cm`
/// (centimorgans) for the chromosome it belongs to.
#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    position: u32,
    cm: f64,
}

/// PLINK-style genetic recombination map, indexed by chromosome.
///
/// Within a chromosome, `genpos` interpolates linearly between the two bracketing
/// breakpoints; positions outside the observed range extrapolate using the slope of the
/// nearest segment.
#[derive(Default)]
pub struct GeneticMap(HashMap<ChrIdx, Vec<Breakpoint>>);

impl GeneticMap {
    /// Parse a PLINK-style four column genetic map (`chromosome`, `marker id`, `cM`, `bp`) and
    /// add its breakpoints to `self`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, or if any line is malformed.
    pub fn from_map(&mut self, path: impl AsRef<Path>) -> Result<()> {
        use GeneticMapError::{InvalidFields, InvalidLine, ParseChr, ParseCm, ParsePos};

        let source = BufReader::new(File::open(path).loc(GeneticMapError::ReadFile)?);
        let mut breakpoints: HashMap<ChrIdx, Vec<Breakpoint>> = HashMap::new();

        for (i, line) in source.lines().enumerate().skip(1) { // skip header
            let line = line.with_loc(|| InvalidLine(i))?;
            if line.is_empty() { continue }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 4 {
                return Err(anyhow!(InvalidFields(i, fields.len())));
            }

            let chr: ChrIdx = fields[0].parse().with_loc(|| ParseChr(i))?;
            let cm: f64     = fields[2].parse::<f64>().with_loc(|| ParseCm(i))?;
            let pos: u32    = fields[3].parse::<u32>().with_loc(|| ParsePos(i))?;

            breakpoints.entry(chr).or_default().push(Breakpoint{position: pos, cm});
        }

        for points in breakpoints.values_mut() {
            points.sort_by_key(|b| b.position);
        }
        self.0.extend(breakpoints);
        Ok(())
    }

    /// Instantiate a `GeneticMap` from a single file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened/parsed, or carries no entries.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut out = Self::default();
        out.from_map(path)?;
        if out.0.is_empty() {
            return Err(anyhow!(GeneticMapError::Empty));
        }
        Ok(out)
    }

    /// Return the genetic position (cM) of `position` on `chromosome`, via piecewise-linear
    /// interpolation between the two bracketing breakpoints of the map.
    ///
    /// # Errors
    /// Returns an error if `chromosome` carries no breakpoints at all.
    pub fn genpos(&self, chromosome: ChrIdx, position: u32) -> Result<f64> {
        let points = self.0.get(&chromosome)
            .ok_or_else(|| anyhow!(GeneticMapError::MissingChromosome(chromosome)))?;

        if points.len() == 1 {
            return Ok(points[0].cm);
        }

        match points.binary_search_by_key(&position, |b| b.position) {
            Ok(idx) => Ok(points[idx].cm),
            Err(0) => Ok(Self::lerp(points[0], points[1], position)),
            Err(idx) if idx == points.len() => Ok(Self::lerp(points[idx - 2], points[idx - 1], position)),
            Err(idx) => Ok(Self::lerp(points[idx - 1], points[idx], position)),
        }
    }

    /// Linearly interpolate (or extrapolate) the cM value of `position` between `lo` and `hi`.
    fn lerp(lo: Breakpoint, hi: Breakpoint, position: u32) -> f64 {
        let span = f64::from(hi.position) - f64::from(lo.position);
        if span == 0.0 {
            return lo.cm;
        }
        let frac = (f64::from(position) - f64::from(lo.position)) / span;
        lo.cm + frac * (hi.cm - lo.cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_map(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let f = write_map("Chromosome\tID\tcM\tPosition\n1\trs1\t0.0\t1000\n1\trs2\t1.0\t2000\n");
        let map = GeneticMap::from_file(f.path()).unwrap();
        let got = map.genpos(ChrIdx(1), 1500).unwrap();
        assert!((got - 0.5).abs() < 1e-9);
    }

    #[test]
    fn extrapolates_below_first_breakpoint() {
        let f = write_map("Chromosome\tID\tcM\tPosition\n1\trs1\t1.0\t1000\n1\trs2\t2.0\t2000\n");
        let map = GeneticMap::from_file(f.path()).unwrap();
        let got = map.genpos(ChrIdx(1), 500).unwrap();
        assert!((got - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_chromosome_is_an_error() {
        let f = write_map("Chromosome\tID\tcM\tPosition\n1\trs1\t0.0\t1000\n");
        let map = GeneticMap::from_file(f.path()).unwrap();
        assert!(map.genpos(ChrIdx(2), 100).is_err());
    }
}
