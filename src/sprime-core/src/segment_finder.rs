use genome::{ChrIdx, GeneticMap};
use located_error::prelude::*;

use crate::dose::DoseRec;
use crate::pair_scorer::{pair_score, NeighborTable, MAX_DIST};
use crate::position_index::PositionIndex;

/// A chain of DoseRec indices (position-ascending) sharing one segment index and score.
#[derive(Debug, Clone)]
pub struct Segment {
    pub members: Vec<usize>,
    pub segment_index: usize,
    pub score: f64,
}

/// Repeated longest-path DP over one chromosome's DoseRec array, with incremental rescoring
/// after each extraction.
pub struct SegmentFinder<'a> {
    dose_recs: &'a [DoseRec],
    neighbor: NeighborTable,
    positions: &'a PositionIndex,
    chrom: ChrIdx,
    global_density: f64,
    map: &'a GeneticMap,
    mu: f64,
    score: Vec<f64>,
    prev: Vec<i64>,
    changed: Vec<bool>,
}

impl<'a> SegmentFinder<'a> {
    /// Build the neighbor table and run the initial DP fill over `dose_recs`.
    ///
    /// # Errors
    /// Propagates any estimator failure encountered while filling `score`.
    pub fn new(
        dose_recs: &'a [DoseRec],
        positions: &'a PositionIndex,
        chrom: ChrIdx,
        global_density: f64,
        map: &'a GeneticMap,
        mu: f64,
    ) -> Result<Self> {
        let raw_positions: Vec<u32> = dose_recs.iter().map(DoseRec::position).collect();
        let neighbor = NeighborTable::build(&raw_positions);
        let n = dose_recs.len();
        let mut finder = Self{
            dose_recs,
            neighbor,
            positions,
            chrom,
            global_density,
            map,
            mu,
            score: vec![0.0; n],
            prev: vec![-1; n],
            changed: vec![false; n],
        };
        for i in 0..n {
            finder.recompute(i)?;
        }
        Ok(finder)
    }

    fn mut_per_cm(&self, s: u32, e: u32) -> Result<f64> {
        self.positions.mut_per_cm_per_gen(self.chrom, s, e, self.map, self.mu, self.global_density)
    }

    /// Recompute `score[i]`/`prev[i]` from scratch against its current window of predecessors.
    fn recompute(&mut self, i: usize) -> Result<()> {
        self.score[i] = 0.0;
        self.prev[i] = -1;
        let (start, incl_end) = (self.neighbor.start[i], self.neighbor.incl_end[i]);
        if start < 0 {
            return Ok(());
        }
        let pos_i = self.dose_recs[i].position();
        for k in (start as usize)..=(incl_end as usize) {
            if self.score[k] < 0.0 {
                continue;
            }
            let mpc = self.mut_per_cm(self.dose_recs[k].position(), pos_i)?;
            let candidate = self.score[k] + pair_score(&self.dose_recs[k], &self.dose_recs[i], &self.neighbor, k, i, mpc);
            if candidate > self.score[i] {
                self.score[i] = candidate;
                self.prev[i] = k as i64;
            }
        }
        Ok(())
    }

    /// Index of the maximum score, ties broken toward the highest index.
    fn argmax(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in 0..self.score.len() {
            if best.map_or(true, |b| self.score[i] >= self.score[b]) {
                best = Some(i);
            }
        }
        best
    }

    /// Repeatedly extract the highest-scoring chain until the maximum drops below `minscore`.
    ///
    /// # Errors
    /// Propagates any estimator failure encountered while rescoring after an extraction.
    pub fn extract_segments(&mut self, minscore: f64) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut next_index = 0usize;

        loop {
            let Some(top) = self.argmax() else { break };
            if self.score[top] < minscore {
                break;
            }

            let mut members = Vec::new();
            let mut cursor = top as i64;
            while cursor >= 0 {
                members.push(cursor as usize);
                cursor = self.prev[cursor as usize];
            }
            members.reverse();
            let seg_score = self.score[top];

            for flag in &mut self.changed {
                *flag = false;
            }

            for &idx in &members {
                self.score[idx] = f64::NEG_INFINITY;
                self.prev[idx] = -1;
                self.changed[idx] = true;
            }

            let min_x = *members.iter().min().expect("a segment always has at least one member");
            let max_x = *members.iter().max().expect("a segment always has at least one member");
            let mut last_changed_pos = self.dose_recs[max_x].position();

            let mut i = min_x + 1;
            while i < self.dose_recs.len() {
                let pos_i = self.dose_recs[i].position();
                if pos_i.saturating_sub(last_changed_pos) > MAX_DIST {
                    break;
                }
                let predecessor_changed = self.prev[i] >= 0 && self.changed[self.prev[i] as usize];
                if predecessor_changed && self.score[i] >= 0.0 {
                    self.recompute(i)?;
                    self.changed[i] = true;
                    if pos_i > last_changed_pos {
                        last_changed_pos = pos_i;
                    }
                }
                i += 1;
            }

            segments.push(Segment{members, segment_index: next_index, score: seg_score});
            next_index += 1;
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dose::DoseRec;
    use crate::index_set::IndexSet;
    use genome::{ChrIdx, Marker, Position};
    use std::io::Write;

    fn flat_map() -> GeneticMap {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr\tid\tcm\tpos").unwrap();
        writeln!(file, "1\ta\t0.0\t0").unwrap();
        writeln!(file, "1\tb\t100.0\t20000000").unwrap();
        GeneticMap::from_file(file.path()).unwrap()
    }

    fn dose_at(pos: u32, carriers: &[u32]) -> DoseRec {
        let mut hets = IndexSet::new();
        for &c in carriers {
            hets.insert(c);
        }
        DoseRec{
            marker: Marker::new(ChrIdx(1), Position(pos), "rs", vec!["A".to_string(), "T".to_string()]),
            allele: 1,
            targ_cnt: hets.len() as u32,
            hets,
            homs: IndexSet::new(),
            out_cnt: 0,
            out_freq: 0.0,
        }
    }

    fn dense_positions(chrom: ChrIdx, positions: &[u32]) -> PositionIndex {
        PositionIndex::build(positions.iter().map(|&p| (chrom, p)))
    }

    #[test]
    fn isolated_variant_scores_zero_and_emits_nothing() {
        let recs = vec![dose_at(100, &[0, 1])];
        let positions = dense_positions(ChrIdx(1), &(0..20).map(|i| 100 + i * 1000).collect::<Vec<_>>());
        let map = flat_map();
        let mut finder = SegmentFinder::new(&recs, &positions, ChrIdx(1), 1.0, &map, 1.2e-8).unwrap();
        let segments = finder.extract_segments(100_000.0).unwrap();
        assert!(segments.is_empty());
        assert_eq!(finder.score[0], 0.0);
        assert_eq!(finder.prev[0], -1);
    }

    #[test]
    fn minscore_infinity_yields_no_segments_and_untouched_initial_fill() {
        let recs = vec![dose_at(100, &[0]), dose_at(120, &[0])];
        let positions = dense_positions(ChrIdx(1), &(0..20).map(|i| 100 + i * 1000).collect::<Vec<_>>());
        let map = flat_map();
        let mut finder = SegmentFinder::new(&recs, &positions, ChrIdx(1), 1.0, &map, 1.2e-8).unwrap();
        let before = finder.score.clone();
        let segments = finder.extract_segments(f64::INFINITY).unwrap();
        assert!(segments.is_empty());
        assert_eq!(finder.score, before);
    }

    #[test]
    fn rescore_after_extraction_drops_dependent_successor() {
        // Four tightly-chained, far apart from a fifth that depends only on the chain.
        let recs = vec![
            dose_at(100, &[0]),
            dose_at(150, &[0]),
            dose_at(200, &[0]),
            dose_at(250, &[0]),
            dose_at(10_000, &[0]),
        ];
        let positions = dense_positions(ChrIdx(1), &(0..20).map(|i| 100 + i * 1000).collect::<Vec<_>>());
        let map = flat_map();
        let mut finder = SegmentFinder::new(&recs, &positions, ChrIdx(1), 1.0, &map, 1.2e-8).unwrap();
        assert!(finder.prev[4] >= 0, "index 4 should initially chain off the first cluster");
        let segments = finder.extract_segments(1.0).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].members, vec![0, 1, 2, 3]);
        assert_eq!(finder.score[4], 0.0);
        assert_eq!(finder.prev[4], -1);
    }
}
