use std::cmp::Ordering;

use crate::coordinate::{ChrIdx, Coordinate, GenomeCoordinate, Position};
use crate::coordinate::derive::*;

/// A single variant table row: a genomic coordinate plus its ordered allele list.
///
/// Index `0` of `alleles` is always the reference allele, as laid out in the source record.
/// `Marker` is immutable once built; `hash`/equality only consider the coordinate (see
/// [`GenomeCoordinate`]), matching how the input format treats one position as one site even
/// when re-observed with a different allele ordering.
#[derive(Debug, Clone, CoordEq, CoordHash, CoordBorrow)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub id: String,
    pub alleles: Vec<String>,
}

impl GenomeCoordinate for Marker {
    fn coordinate(&self) -> &'_ Coordinate {
        &self.coordinate
    }
}

impl Marker {
    #[must_use]
    pub fn new(chromosome: impl Into<ChrIdx>, position: impl Into<Position>, id: impl Into<String>, alleles: Vec<String>) -> Self {
        Self { coordinate: Coordinate::new(chromosome, position), id: id.into(), alleles }
    }

    #[must_use]
    pub fn chromosome(&self) -> ChrIdx {
        self.coordinate.chromosome
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.coordinate.position
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        &self.alleles[0]
    }

    #[must_use]
    pub fn allele(&self, idx: usize) -> Option<&str> {
        self.alleles.get(idx).map(String::as_str)
    }
}

/// Full ordering used for output: chromosome, then position, then the allele list
/// lexicographically. This differs from `PartialEq`/`Hash`, which key only on coordinate.
impl PartialOrd for Marker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Marker {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.coordinate.chromosome, self.coordinate.position, &self.alleles)
            .cmp(&(other.coordinate.chromosome, other.coordinate.position, &other.alleles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(chr: u8, pos: u32, alleles: &[&str]) -> Marker {
        Marker::new(ChrIdx(chr), Position(pos), ".", alleles.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn orders_by_chromosome_then_position_then_alleles() {
        let a = marker(1, 100, &["A", "C"]);
        let b = marker(1, 100, &["A", "G"]);
        let c = marker(1, 200, &["A", "C"]);
        let d = marker(2, 50, &["A", "C"]);
        assert!(a < b);
        assert!(b < c);
        assert!(c < d);
    }

    #[test]
    fn equality_ignores_allele_list() {
        let a = marker(3, 500, &["A", "C"]);
        let b = marker(3, 500, &["A", "T"]);
        assert_eq!(a, b);
    }
}
