use genome::Marker;
use located_error::prelude::*;
use variant_io::VariantRecord;

use crate::error::EngineError;
use crate::index_set::IndexSet;

/// The role a sample plays in the analysis, as resolved from `--outgroup`/`--excludesamples`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRole {
    Target,
    Outgroup,
    Excluded,
}

/// A (variant, candidate allele) pair together with its target carrier sets and outgroup
/// frequency. Exists only for alleles whose outgroup copy count does not exceed `maxCnt`.
#[derive(Debug, Clone)]
pub struct DoseRec {
    pub marker: Marker,
    pub allele: u8,
    pub hets: IndexSet,
    pub homs: IndexSet,
    pub targ_cnt: u32,
    pub out_cnt: u32,
    pub out_freq: f64,
}

impl DoseRec {
    #[must_use]
    pub fn position(&self) -> u32 {
        self.marker.position().into()
    }
}

/// Build one [`DoseRec`] per candidate allele whose outgroup copy count is at most `max_cnt`.
///
/// # Errors
/// Fails if `roles` does not carry one entry per sample column of `record`.
pub fn build_dose_recs(record: &VariantRecord, roles: &[SampleRole], max_cnt: u32) -> Result<Vec<DoseRec>> {
    if roles.len() != record.calls.len() {
        return loc!(EngineError::SampleRoleMismatch{expected: record.calls.len(), found: roles.len()});
    }

    let n_alleles = record.n_alleles();
    debug_assert!(n_alleles <= usize::from(u8::MAX) + 1, "allele list exceeds u8 index range");

    let mut out_cnt = vec![0u32; n_alleles];
    let mut out_non_missing = 0u32;
    for (call, role) in record.calls.iter().zip(roles) {
        if *role != SampleRole::Outgroup {
            continue;
        }
        out_non_missing += u32::from(call.non_missing());
        if let Some(a) = call.allele1 {
            out_cnt[a as usize] += 1;
        }
        if let Some(a) = call.allele2 {
            out_cnt[a as usize] += 1;
        }
    }

    let mut dose_recs = Vec::new();
    for (allele, &cnt) in out_cnt.iter().enumerate() {
        if cnt > max_cnt {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let allele = allele as u8;

        let mut hets = IndexSet::new();
        let mut homs = IndexSet::new();
        for (sample_idx, (call, role)) in record.calls.iter().zip(roles).enumerate() {
            if *role != SampleRole::Target {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let sample_idx = sample_idx as u32;
            match call.copies_of(allele) {
                1 => { hets.insert(sample_idx); },
                2 => { homs.insert(sample_idx); },
                _ => {}
            }
        }

        let targ_cnt = hets.len() as u32 + 2 * homs.len() as u32;
        let out_freq = if out_non_missing == 0 { 0.0 } else { f64::from(cnt) / f64::from(out_non_missing) };

        dose_recs.push(DoseRec{
            marker: record.marker.clone(),
            allele,
            hets,
            homs,
            targ_cnt,
            out_cnt: cnt,
            out_freq,
        });
    }
    Ok(dose_recs)
}
