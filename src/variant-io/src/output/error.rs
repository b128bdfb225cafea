use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output file '{}'", .0.display())]
    Create(PathBuf),

    #[error("Failed to write to output file '{}'", .0.display())]
    Write(PathBuf),
}
