use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SamplerError {
    #[error("Cannot sample {requested} individual(s) from population '{population}' (component '{component}'): only {available} available")]
    InsufficientPopulation{component: String, population: String, requested: usize, available: usize},

    #[error("Population '{population}' is assigned to both components '{first}' and '{second}'. A population may only contribute to a single component")]
    DuplicatePopulationAssignment{population: String, first: String, second: String},

    #[error("Invalid sample size for population '{population}' (component '{component}'): sample sizes must be strictly positive")]
    InvalidSampleSize{component: String, population: String},

    #[error("Component '{0}' does not define any source population")]
    EmptyComponent(String),
}
