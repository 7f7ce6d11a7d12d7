use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open calculator configuration file '{}'", path.display())]
    Open{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to deserialize calculator configuration file '{}'", path.display())]
    Deserialize{path: PathBuf, #[source] source: serde_yaml::Error},

    #[error("Invalid 'components' section")]
    InvalidComponents,

    #[error("'dataset' must not be empty")]
    EmptyDataset,
}
