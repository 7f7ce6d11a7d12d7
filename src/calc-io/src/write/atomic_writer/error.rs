use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtomicWriterError {
    #[error("Failed to create a temporary file next to '{}'", path.display())]
    Create{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to write contents into the temporary file of '{}'", path.display())]
    Write{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to move the temporary file into its final location '{}'", path.display())]
    Persist{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to set the previous contents of '{}' aside", path.display())]
    Backup{path: PathBuf, #[source] source: std::io::Error},
}
