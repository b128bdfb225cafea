use crate::dose::DoseRec;

pub const MIN_DIST: u32 = 10;
pub const MAX_DIST: u32 = 20_000;

/// For a position-sorted array, `start[i]`/`incl_end[i]` give the inclusive index range of
/// prior records whose position lies in `[pos(i) − MAX_DIST, pos(i) − MIN_DIST]`. Sentinel `-1`
/// marks "no such prior record". Both arrays are monotone non-decreasing in `i`.
#[derive(Debug)]
pub struct NeighborTable {
    pub start: Vec<i64>,
    pub incl_end: Vec<i64>,
}

impl NeighborTable {
    #[must_use]
    pub fn build(positions: &[u32]) -> Self {
        let n = positions.len();
        let mut start = vec![-1i64; n];
        let mut incl_end = vec![-1i64; n];

        let mut next_end = 0usize;
        let mut start_ptr = 0usize;
        for i in 0..n {
            let threshold_min = i64::from(positions[i]) - i64::from(MIN_DIST);
            let threshold_max = i64::from(positions[i]) - i64::from(MAX_DIST);

            while next_end < i && i64::from(positions[next_end]) <= threshold_min {
                next_end += 1;
            }
            if next_end == 0 {
                continue;
            }
            let j_end = next_end - 1;
            incl_end[i] = j_end as i64;

            if start_ptr > j_end {
                start_ptr = j_end;
            }
            while start_ptr < j_end && i64::from(positions[start_ptr]) < threshold_max {
                start_ptr += 1;
            }
            start[i] = start_ptr as i64;
        }

        Self{start, incl_end}
    }

    #[must_use]
    pub fn contains(&self, j: usize, i: usize) -> bool {
        self.start[j] >= 0 && (self.start[j] as usize) <= i && i <= (self.incl_end[j] as usize)
    }
}

/// Sum over target samples of `|dose_a(s) − dose_b(s)|`, without materializing a dose vector.
#[must_use]
pub fn haplotype_distance(a: &DoseRec, b: &DoseRec) -> u32 {
    let mut d = 0u32;
    for s in a.hets.iter() {
        if !b.hets.contains(s) {
            d += 1;
        }
    }
    for s in a.homs.iter() {
        if b.hets.contains(s) {
            d += 1;
        } else if !b.homs.contains(s) {
            d += 2;
        }
    }
    for s in b.hets.iter() {
        if !a.hets.contains(s) && !a.homs.contains(s) {
            d += 1;
        }
    }
    for s in b.homs.iter() {
        if !a.hets.contains(s) && !a.homs.contains(s) {
            d += 2;
        }
    }
    d
}

/// Pairwise log-likelihood-like score for the DP edge `k -> i` (`a = R[k]`, `b = R[i]`, `k < i`).
#[must_use]
pub fn pair_score(a: &DoseRec, b: &DoseRec, neighbor: &NeighborTable, k: usize, i: usize, mut_per_cm: f64) -> f64 {
    debug_assert!(k < i);
    debug_assert!(mut_per_cm.is_finite() && mut_per_cm > 0.0);

    if !neighbor.contains(i, k) {
        return f64::NEG_INFINITY;
    }

    let d = haplotype_distance(a, b);
    let max_d = a.targ_cnt + b.targ_cnt;
    if d == max_d {
        return f64::NEG_INFINITY;
    }
    let n = a.targ_cnt.min(b.targ_cnt);

    let mut first_term = 6000.0 * (1.0 - (-1.0 / (mut_per_cm * 100.0)).exp()) / (1.0 - (-1.0_f64).exp());
    if b.out_cnt > 0 {
        first_term *= 0.80;
    }
    first_term - 25000.0 * f64::from(d) / f64::from(n)
}
