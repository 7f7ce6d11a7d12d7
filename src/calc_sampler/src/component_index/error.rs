use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ComponentIndexError {
    #[error("Individual '{id}' was sampled twice: from population '{first}' and from population '{second}'. Is this id listed multiple times in the individual metadata file?")]
    DuplicateIndividual{id: String, first: String, second: String},

    #[error("Population '{population}' was sampled on behalf of both components '{first}' and '{second}'")]
    ConflictingComponent{population: String, first: String, second: String},
}
