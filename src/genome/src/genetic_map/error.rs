use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneticMapError {
    #[error("Failed to open genetic map file")]
    ReadFile,

    #[error("Line {0} appears to be invalid")]
    InvalidLine(usize),

    #[error("Expected 4 tab-separated fields @ line {0}, got {1}")]
    InvalidFields(usize, usize),

    #[error("Failed to parse chromosome field @ line {0}")]
    ParseChr(usize),

    #[error("Failed to parse position field @ line {0}")]
    ParsePos(usize),

    #[error("Failed to parse cM field @ line {0}")]
    ParseCm(usize),

    #[error("Genetic map contains no entries for any chromosome")]
    Empty,

    #[error("No genetic map entries for chromosome {0}")]
    MissingChromosome(crate::coordinate::ChrIdx),
}
