mod ind_reader;
pub use ind_reader::read_individuals;

mod config;
pub use config::{CalcConfig, AdmixtureParams, DataManagement, ConfigError, IND_EXT, FAM_EXT};

mod allele_table;
pub use allele_table::{AlleleRow, AlleleTableError, merge_allele_frequencies, read_allele_table};
