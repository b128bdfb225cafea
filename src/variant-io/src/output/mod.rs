use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    time::Duration,
};

use genome::Marker;
use located_error::prelude::*;

mod error;
pub use error::OutputError;

/// One body line of the `.score` output: a scored variant, tagged with the segment it belongs
/// to and the candidate allele that was scored.
#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub marker: Marker,
    pub segment: usize,
    pub allele: u8,
    pub score: f64,
}

/// Writer for the `.score` output file (header `CHROM POS ID REF ALT SEGMENT ALLELE SCORE`).
pub struct ScoreWriter {
    writer: BufWriter<File>,
    path: std::path::PathBuf,
}

impl ScoreWriter {
    /// Create (or truncate) the output file and write its header line.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or the header cannot be written.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|_| OutputError::Create(path.to_path_buf())).with_loc(|| "While creating .score output")?;
        let mut writer = Self{writer: BufWriter::new(file), path: path.to_path_buf()};
        writer.write_line("CHROM\tPOS\tID\tREF\tALT\tSEGMENT\tALLELE\tSCORE")?;
        Ok(writer)
    }

    /// Append one scored record.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_record(&mut self, record: &ScoreRecord) -> Result<()> {
        let alt = if record.marker.alleles.len() > 1 {
            record.marker.alleles[1..].join(",")
        } else {
            ".".to_string()
        };
        let line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.marker.chromosome(),
            record.marker.position(),
            record.marker.id,
            record.marker.reference(),
            alt,
            record.segment,
            record.allele,
            record.score.round() as i64,
        );
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|_| OutputError::Write(self.path.clone())).with_loc(|| "While writing .score output")?;
        Ok(())
    }

    /// Flush any buffered output.
    ///
    /// # Errors
    /// Returns an error if the underlying flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|_| OutputError::Write(self.path.clone())).with_loc(|| "While flushing .score output")?;
        Ok(())
    }
}

/// Free-form `.log` output: run metadata, not machine-parsed.
pub struct LogWriter {
    writer: BufWriter<File>,
    path: std::path::PathBuf,
}

impl LogWriter {
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|_| OutputError::Create(path.to_path_buf())).with_loc(|| "While creating .log output")?;
        Ok(Self{writer: BufWriter::new(file), path: path.to_path_buf()})
    }

    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|_| OutputError::Write(self.path.clone())).with_loc(|| "While writing .log output")?;
        Ok(())
    }

    /// Write the standard run summary block.
    ///
    /// # Errors
    /// Returns an error if any of the underlying writes fail.
    #[allow(clippy::too_many_arguments)]
    pub fn write_summary(
        &mut self,
        version: &str,
        command_line: &str,
        n_outgroup: usize,
        n_target: usize,
        n_variants: usize,
        n_segments: usize,
        elapsed: Duration,
    ) -> Result<()> {
        self.write_line(&format!("sprime-rs {version}"))?;
        self.write_line(&format!("command: {command_line}"))?;
        self.write_line(&format!("outgroup samples: {n_outgroup}"))?;
        self.write_line(&format!("target samples: {n_target}"))?;
        self.write_line(&format!("analyzed variants: {n_variants}"))?;
        self.write_line(&format!("segments: {n_segments}"))?;
        self.write_line(&format!("elapsed: {:.3}s", elapsed.as_secs_f64()))?;
        self.flush()
    }

    /// # Errors
    /// Returns an error if the underlying flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|_| OutputError::Write(self.path.clone())).with_loc(|| "While flushing .log output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genome::{ChrIdx, Position};
    use std::fs;

    #[test]
    fn writes_header_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.score");
        let mut writer = ScoreWriter::create(&path).unwrap();
        let marker = Marker::new(ChrIdx(1), Position(100), "rs1", vec!["A".to_string(), "T".to_string()]);
        writer.write_record(&ScoreRecord{marker, segment: 0, allele: 1, score: 903.856}).unwrap();
        writer.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "CHROM\tPOS\tID\tREF\tALT\tSEGMENT\tALLELE\tSCORE");
        assert_eq!(lines.next().unwrap(), "1\t100\trs1\tA\tT\t0\t1\t904");
    }
}
