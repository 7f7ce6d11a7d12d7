//! Sampling and mapping core of an admixture calculator.
//!
//! Individuals are parsed from an EIGENSTRAT-like metadata file ([`RecordStore`]), sampled
//! per population ([`StratifiedSampler`]), aggregated into an individual→component mapping
//! ([`ComponentIndex`]), and finally used to filter a per-individual file in a single pass
//! ([`FilterProjector`]).

pub mod individual;
pub use individual::{Individual, Sex};

pub mod record_store;
pub use record_store::{RecordStore, RecordStoreError};

pub mod sampler;
pub use sampler::{ComponentSpec, PopulationSample, StratifiedSampler, SamplerError};

pub mod component_index;
pub use component_index::{ComponentIndex, ComponentIndexError};

pub mod projector;
pub use projector::{ComponentLookup, FilterProjector, FilteredRecord, ProjectionSummary, ProjectorError};
