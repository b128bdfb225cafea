use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use genome::{ChrIdx, Marker};
use gzp::{deflate::Bgzf, par::decompress::ParDecompressBuilder};
use located_error::prelude::*;

mod error;
pub use error::VariantTableError;

/// A single sample's diploid allele call at one variant. `None` marks a missing allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCall {
    pub allele1: Option<u8>,
    pub allele2: Option<u8>,
}

impl SampleCall {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.allele1.is_none() || self.allele2.is_none()
    }

    /// Number of copies of `allele` carried by this sample (0, 1 or 2). Missing calls never
    /// count toward any allele.
    #[must_use]
    pub fn copies_of(&self, allele: u8) -> u8 {
        u8::from(self.allele1 == Some(allele)) + u8::from(self.allele2 == Some(allele))
    }

    /// Number of non-missing allele slots (0, 1 or 2).
    #[must_use]
    pub fn non_missing(&self) -> u8 {
        u8::from(self.allele1.is_some()) + u8::from(self.allele2.is_some())
    }
}

/// One row of the input variant table: a [`Marker`] plus every sample's diploid call, in the
/// same column order as [`VariantTableReader::samples`].
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub marker: Marker,
    pub calls: Vec<SampleCall>,
}

impl VariantRecord {
    #[must_use]
    pub fn n_alleles(&self) -> usize {
        self.marker.alleles.len()
    }
}

const VARIANT_TABLE_EXT: [&str; 2] = ["vt", "gz"];

/// Streams a tab-delimited variant table, transparently decompressing `.gz` input.
///
/// File layout: a header line `CHROM POS ID REF ALT <sample-id>...`, then one row per variant
/// with the same columns, samples holding diploid genotypes (`0|1`, `./.`, ...).
pub struct VariantTableReader {
    source: Box<dyn BufRead>,
    samples: Vec<String>,
    line_no: usize,
    next_line: Option<String>,
}

impl VariantTableReader {
    /// Open `path`, consume the header line, and position the reader on the first record.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, carries an unsupported extension, or its
    /// header is missing/malformed.
    pub fn new(path: &Path) -> Result<Self> {
        let mut source = Self::get_reader(path)?;
        let mut header = String::new();
        let bytes = source.read_line(&mut header).with_loc(|| "While reading variant table header")?;
        if bytes == 0 {
            return loc!(VariantTableError::MissingHeader);
        }
        let fields: Vec<&str> = header.trim_end().split('\t').collect();
        if fields.len() < 6 {
            return loc!(VariantTableError::InvalidHeader(fields.len()));
        }
        let samples = fields[5..].iter().map(|s| (*s).to_string()).collect();

        let mut reader = Self{source, samples, line_no: 1, next_line: None};
        reader.advance()?;
        Ok(reader)
    }

    /// Check the file extension and return an appropriate reader:
    /// - plain file -> a default `BufReader`
    /// - `.gz`      -> a parallel BGZF decompressor/reader
    fn get_reader(path: &Path) -> Result<Box<dyn BufRead>> {
        use VariantTableError::{InvalidFileExt, Open};
        let ext = path.extension().and_then(|e| e.to_str());
        let file = File::open(path).with_loc(|| Open)?;
        let source: Box<dyn Read> = match ext {
            Some("gz") => ParDecompressBuilder::<Bgzf>::new().maybe_num_threads(0).maybe_par_from_reader(file),
            Some(e) if VARIANT_TABLE_EXT.contains(&e) => Box::new(file),
            None => Box::new(file),
            _ => return loc!(InvalidFileExt),
        };
        Ok(Box::new(BufReader::new(source)))
    }

    fn advance(&mut self) -> Result<()> {
        let mut line = String::new();
        let bytes = self.source.read_line(&mut line).with_loc(|| format!("While reading line {}", self.line_no + 1))?;
        self.next_line = if bytes == 0 { None } else { Some(line) };
        Ok(())
    }

    /// Sample identifiers, in column order. Indices into this slice are used throughout the
    /// core to refer to samples.
    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_line.is_some()
    }

    /// Parse and return the next record, or `None` once the table is exhausted.
    ///
    /// # Errors
    /// Returns an error on any malformed line: wrong field count, unparseable CHROM/POS, or an
    /// invalid genotype string.
    pub fn next_record(&mut self) -> Result<Option<VariantRecord>> {
        let Some(line) = self.next_line.take() else { return Ok(None) };
        self.line_no += 1;
        let record = Self::parse_line(&line, self.samples.len(), self.line_no).with_loc(|| format!("While parsing line {}", self.line_no))?;
        self.advance()?;
        Ok(Some(record))
    }

    fn parse_line(line: &str, n_samples: usize, line_no: usize) -> Result<VariantRecord> {
        use VariantTableError::{FieldCount, InvalidChrom, InvalidPos};
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        let expected = 5 + n_samples;
        if fields.len() != expected {
            return loc!(FieldCount{line: line_no, expected, found: fields.len()});
        }

        let chromosome: ChrIdx = fields[0].parse().map_err(|_| InvalidChrom(line_no))?;
        let position: u32 = fields[1].parse().map_err(|_| InvalidPos(line_no))?;
        let id = fields[2].to_string();

        let mut alleles = vec![fields[3].to_string()];
        if fields[4] != "." {
            alleles.extend(fields[4].split(',').map(String::from));
        }
        let marker = Marker::new(chromosome, position, id, alleles);

        let mut calls = Vec::with_capacity(n_samples);
        for (col, raw) in fields[5..].iter().enumerate() {
            calls.push(Self::parse_call(raw, marker.alleles.len(), line_no, col)?);
        }

        Ok(VariantRecord{marker, calls})
    }

    fn parse_call(raw: &str, n_alleles: usize, line_no: usize, col: usize) -> Result<SampleCall> {
        use VariantTableError::{InvalidAlleleIndex, InvalidGenotype};
        let malformed = || InvalidGenotype{line: line_no, col, genotype: raw.to_string()};
        let sep = if raw.contains('|') { '|' } else { '/' };
        let (a1, a2) = raw.split_once(sep).ok_or_else(malformed)?;

        let parse_allele = |s: &str| -> Result<Option<u8>> {
            if s == "." {
                return Ok(None);
            }
            let allele: u8 = s.parse().map_err(|_| malformed())?;
            if (allele as usize) >= n_alleles {
                return loc!(InvalidAlleleIndex{line: line_no, col, allele, n_alleles});
            }
            Ok(Some(allele))
        };

        Ok(SampleCall{allele1: parse_allele(a1)?, allele2: parse_allele(a2)?})
    }
}
