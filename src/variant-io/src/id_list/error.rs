use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdListError {
    #[error("Failed to open identifier list '{}'", .0.display())]
    Open(PathBuf),
}
