use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to create parent directory")]
    CreateParentDirectory(#[source] std::io::Error),

    #[error("'{}' already exists within the output directory. Use '--overwrite' to force, or specify a different output directory with '--output-dir'", path.display())]
    OverwriteDisallowed{path: PathBuf},

    #[error("'{}' exists but is not a regular file", path.display())]
    NotAFile{path: PathBuf},

    #[error("Output file '{}' would overwrite one of the input files. Please specify a different '--name' or '--output-dir'", path.display())]
    OutputShadowsInput{path: PathBuf},

    #[error("Failed to count the lines of '{}'", path.display())]
    CountLines{path: PathBuf, #[source] source: std::io::Error},
}
