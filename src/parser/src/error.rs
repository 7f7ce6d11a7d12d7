use std::path::PathBuf;

use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("Failed to create output directory {0}")]
    CreateOutputDir(String, #[source] std::io::Error),

    #[error("Failed to derive a calculator name from '{0}'. Use --name to provide one explicitly")]
    ParseCalcName(String),

    #[error("Failed to serialize command line arguments")]
    SerializeArgs(#[source] serde_yaml::Error),

    #[error("Unable to write command line arguments into '{}'", path.display())]
    WriteArgs{path: PathBuf, #[source] source: std::io::Error},

    #[error("Unable to open command line arguments file '{}'", path.display())]
    OpenArgs{path: PathBuf, #[source] source: std::io::Error},

    #[error("Unable to deserialize command line arguments from '{}'", path.display())]
    DeserializeArgs{path: PathBuf, #[source] source: serde_yaml::Error},
}
