use genome::ChrIdx;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Chromosome {0}: local cM/bp resolved to zero")]
    ZeroCmPerBp(ChrIdx),

    #[error("Chromosome {0}: fewer than 6 variants were found in any density expansion window")]
    TooFewVariantsForDensity(ChrIdx),

    #[error("No variants remain after applying the requested --chrom filter")]
    EmptySelection,

    #[error("No chromosome carries any stored variant; cannot compute a global density")]
    EmptyGlobalDensity,

    #[error("Record at {0}:{1} carries a missing allele call")]
    MissingAlleleCall(ChrIdx, u32),

    #[error("Sample role assignment carries {found} entries, expected {expected}")]
    SampleRoleMismatch{expected: usize, found: usize},
}
