use std::{fs::File, io::BufReader, path::Path};

use calc_sampler::RecordStore;
use located_error::LocatedError;

use anyhow::Result;
use log::info;

/// Open and parse an EIGENSTRAT `.ind` individual metadata file.
///
/// # Errors
/// - if `path` cannot be opened.
/// - `RecordStoreError::MalformedRecord` if any line carries less than three fields.
pub fn read_individuals(path: &Path) -> Result<RecordStore> {
    let loc_msg = || format!("While reading individuals from '{}'", path.display());
    let source = BufReader::new(File::open(path).with_loc(loc_msg)?);
    let store = RecordStore::parse(source).with_loc(loc_msg)?;
    info!("Found {} individual(s) spread across {} population(s) in {}", store.len(), store.populations().len(), path.display());
    Ok(store)
}
