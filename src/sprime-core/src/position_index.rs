use std::collections::HashMap;

use genome::{ChrIdx, GeneticMap};
use located_error::prelude::*;

use crate::error::EngineError;

const STEP: u32 = 5_000;
const MAX_ITERS: u32 = 20;
const MIN_FOR_DENSITY: usize = 6;
const DENSITY_STOP: usize = 10;
const CM_STOP: f64 = 0.01;

/// Sorted-per-chromosome store of every non-reference allele position, built once from the full
/// input and immutable afterward. Feeds the local/global density and cM/bp estimators.
#[derive(Debug, Default)]
pub struct PositionIndex {
    by_chrom: HashMap<ChrIdx, Vec<u32>>,
}

impl PositionIndex {
    pub fn build(entries: impl IntoIterator<Item = (ChrIdx, u32)>) -> Self {
        let mut by_chrom: HashMap<ChrIdx, Vec<u32>> = HashMap::new();
        for (chrom, pos) in entries {
            by_chrom.entry(chrom).or_default().push(pos);
        }
        for positions in by_chrom.values_mut() {
            positions.sort_unstable();
        }
        Self{by_chrom}
    }

    fn positions(&self, chrom: ChrIdx) -> &[u32] {
        self.by_chrom.get(&chrom).map_or(&[], Vec::as_slice)
    }

    /// Number of stored positions in the closed interval `[p1, p2]`.
    #[must_use]
    pub fn n_variants(&self, chrom: ChrIdx, p1: u32, p2: u32) -> usize {
        if p1 > p2 {
            return 0;
        }
        let positions = self.positions(chrom);
        let lo = positions.partition_point(|&p| p < p1);
        let hi = positions.partition_point(|&p| p <= p2);
        hi - lo
    }

    /// Maximum density (variants per bp) observed while expanding `[s, e]` by `STEP` on each
    /// side, clipped to the chromosome's stored span.
    ///
    /// # Errors
    /// Fails if fewer than `MIN_FOR_DENSITY` variants are ever found in an expansion.
    pub fn local_density(&self, chrom: ChrIdx, s: u32, e: u32) -> Result<f64> {
        let positions = self.positions(chrom);
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            return loc!(EngineError::TooFewVariantsForDensity(chrom));
        };

        let mut best: Option<f64> = None;
        for n in 0..MAX_ITERS {
            let expand = n * STEP;
            let lo = s.saturating_sub(expand).max(first);
            let hi = e.saturating_add(expand).min(last);
            if lo > hi {
                continue;
            }
            let count = self.n_variants(chrom, lo, hi);
            if count >= MIN_FOR_DENSITY {
                let width = f64::from(hi - lo + 1);
                let density = count as f64 / width;
                best = Some(best.map_or(density, |b: f64| b.max(density)));
            }
            if count >= DENSITY_STOP {
                break;
            }
        }
        best.ok_or(EngineError::TooFewVariantsForDensity(chrom)).with_loc(|| "While computing local density")
    }

    /// Minimum positive cM/bp observed while expanding `[s, e]` by `STEP` on each side.
    ///
    /// # Errors
    /// Fails if no positive cM estimate is ever found.
    pub fn cm_per_bp(&self, chrom: ChrIdx, s: u32, e: u32, map: &GeneticMap) -> Result<f64> {
        let positions = self.positions(chrom);
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            return loc!(EngineError::ZeroCmPerBp(chrom));
        };

        let mut best: Option<f64> = None;
        for n in 0..MAX_ITERS {
            let expand = n * STEP;
            let lo = s.saturating_sub(expand).max(first);
            let hi = e.saturating_add(expand).min(last);
            if lo > hi {
                continue;
            }
            let cm = map.genpos(chrom, hi)? - map.genpos(chrom, lo)?;
            if cm > 0.0 {
                let width = f64::from(hi - lo + 1);
                let rate = cm / width;
                best = Some(best.map_or(rate, |b: f64| b.min(rate)));
                if cm >= CM_STOP {
                    break;
                }
            }
        }
        best.ok_or_else(|| EngineError::ZeroCmPerBp(chrom)).with_loc(|| "While computing cM/bp")
    }

    /// `(ΣnVariants) / Σ(last − first + 1)` across every stored chromosome.
    ///
    /// # Errors
    /// Fails if no chromosome carries any stored position.
    pub fn global_density(&self) -> Result<f64> {
        let mut total_variants = 0u64;
        let mut total_width = 0u64;
        for positions in self.by_chrom.values() {
            if let (Some(&first), Some(&last)) = (positions.first(), positions.last()) {
                total_variants += positions.len() as u64;
                total_width += u64::from(last - first) + 1;
            }
        }
        if total_width == 0 {
            return loc!(EngineError::EmptyGlobalDensity);
        }
        Ok(total_variants as f64 / total_width as f64)
    }

    /// `(localDensity / globalDensity) · mu / cmPerBp`.
    ///
    /// # Errors
    /// Propagates failures from [`PositionIndex::local_density`] and [`PositionIndex::cm_per_bp`].
    pub fn mut_per_cm_per_gen(&self, chrom: ChrIdx, s: u32, e: u32, map: &GeneticMap, mu: f64, global_density: f64) -> Result<f64> {
        let local = self.local_density(chrom, s, e)?;
        let cm_per_bp = self.cm_per_bp(chrom, s, e, map)?;
        Ok((local / global_density) * mu / cm_per_bp)
    }

    #[must_use]
    pub fn n_chromosomes(&self) -> usize {
        self.by_chrom.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genome::ChrIdx;
    use std::io::Write;

    fn map_with(entries: &[(u8, &str, f64, u32)]) -> GeneticMap {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr\tid\tcm\tpos").unwrap();
        for (chr, id, cm, pos) in entries {
            writeln!(file, "{chr}\t{id}\t{cm}\t{pos}").unwrap();
        }
        GeneticMap::from_file(file.path()).unwrap()
    }

    #[test]
    fn counts_closed_interval_inclusive_of_duplicates() {
        let positions = PositionIndex::build([(ChrIdx(1), 100), (ChrIdx(1), 100), (ChrIdx(1), 150)]);
        assert_eq!(positions.n_variants(ChrIdx(1), 100, 100), 2);
        assert_eq!(positions.n_variants(ChrIdx(1), 100, 150), 3);
        assert_eq!(positions.n_variants(ChrIdx(1), 101, 149), 0);
    }

    #[test]
    fn local_density_fails_with_too_few_variants() {
        let positions = PositionIndex::build([(ChrIdx(1), 100), (ChrIdx(1), 200)]);
        assert!(positions.local_density(ChrIdx(1), 100, 200).is_err());
    }

    #[test]
    fn global_density_spans_all_chromosomes() {
        let positions = PositionIndex::build([(ChrIdx(1), 0), (ChrIdx(1), 999), (ChrIdx(2), 0), (ChrIdx(2), 999)]);
        let density = positions.global_density().unwrap();
        assert!((density - 2.0 / 2000.0).abs() < 1e-9);
    }

    #[test]
    fn cm_per_bp_uses_minimum_positive_rate() {
        let map = map_with(&[(1, "a", 0.0, 0), (1, "b", 10.0, 1_000_000)]);
        let positions = PositionIndex::build((0..20).map(|i| (ChrIdx(1), i * 10_000)));
        let rate = positions.cm_per_bp(ChrIdx(1), 0, 10_000, &map).unwrap();
        assert!(rate > 0.0);
    }
}
