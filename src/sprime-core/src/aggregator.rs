use genome::Marker;
use variant_io::ScoreRecord;

/// Accumulates `(marker, segment, allele, score)` tuples across chromosomes and produces the
/// final, stably-sorted output list.
#[derive(Debug, Default)]
pub struct OutputAggregator {
    records: Vec<(Marker, usize, u8, f64)>,
}

impl OutputAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: Marker, segment: usize, allele: u8, score: f64) {
        self.records.push((marker, segment, allele, score));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stably sort by (marker, segment, score) ascending and produce [`ScoreRecord`]s.
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<ScoreRecord> {
        self.records.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.cmp(&b.1))
                .then(a.3.partial_cmp(&b.3).unwrap_or(std::cmp::Ordering::Equal))
        });
        self.records
            .into_iter()
            .map(|(marker, segment, allele, score)| ScoreRecord{marker, segment, allele, score})
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genome::{ChrIdx, Position};

    #[test]
    fn sorts_by_marker_then_segment_then_score() {
        let mut aggregator = OutputAggregator::new();
        let m1 = Marker::new(ChrIdx(1), Position(200), "b", vec!["A".to_string()]);
        let m2 = Marker::new(ChrIdx(1), Position(100), "a", vec!["A".to_string()]);
        aggregator.push(m1.clone(), 1, 0, 50.0);
        aggregator.push(m2.clone(), 0, 0, 10.0);
        let sorted = aggregator.into_sorted();
        assert_eq!(sorted[0].marker.id, "a");
        assert_eq!(sorted[1].marker.id, "b");
    }
}
