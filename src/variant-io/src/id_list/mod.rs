use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use located_error::prelude::*;

mod error;
pub use error::IdListError;

/// Read a newline-delimited list of identifiers (outgroup samples, excluded samples, excluded
/// markers...). Blank lines are skipped; leading/trailing whitespace is trimmed.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn read_id_list(path: &Path) -> Result<HashSet<String>> {
    let loc_msg = || format!("While reading identifier list '{}'", path.display());
    let file = File::open(path).map_err(|_| IdListError::Open(path.to_path_buf())).with_loc(loc_msg)?;
    let mut ids = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_loc(loc_msg)?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            ids.insert(trimmed.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_ids_and_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "HG001\n\nHG002\n").unwrap();
        let ids = read_id_list(file.path()).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("HG001"));
        assert!(ids.contains("HG002"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_id_list(Path::new("/no/such/file")).is_err());
    }
}
