use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreateCalcError {
    #[error("Failed to open pedigree file '{}'", path.display())]
    OpenFam{path: PathBuf, #[source] source: std::io::Error},

    #[error("None of the sampled individuals were found within '{}'", path.display())]
    EmptyProjection{path: PathBuf},

    #[error("Failed to index sampled individuals")]
    IndexSamples,

    #[error("Failed to sample reference individuals")]
    SampleIndividuals,
}
