use thiserror::Error;

#[derive(Error, Debug)]
pub enum VariantTableError {
    #[error("Failed to open variant table")]
    Open,

    #[error("Unrecognized file extension for variant table. Expected a plain file or a '.gz' suffix")]
    InvalidFileExt,

    #[error("Variant table is empty: no header line found")]
    MissingHeader,

    #[error("Header line carries {0} fields, expected at least 6 (CHROM POS ID REF ALT and one sample)")]
    InvalidHeader(usize),

    #[error("Line {line}: expected {expected} tab-delimited fields, found {found}")]
    FieldCount{line: usize, expected: usize, found: usize},

    #[error("Line {0}: could not parse CHROM field")]
    InvalidChrom(usize),

    #[error("Line {0}: could not parse POS field")]
    InvalidPos(usize),

    #[error("Line {line}: sample column {col} carries a malformed genotype '{genotype}'")]
    InvalidGenotype{line: usize, col: usize, genotype: String},

    #[error("Line {line}: sample column {col} references allele index {allele}, outside of [0, {n_alleles})")]
    InvalidAlleleIndex{line: usize, col: usize, allele: u8, n_alleles: usize},
}
