use std::{collections::BTreeMap, fs::File, io::Read, path::{Path, PathBuf}};

use calc_sampler::ComponentSpec;
use located_error::LocatedError;

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

mod error;
pub use error::ConfigError;

/// File extension of EIGENSTRAT individual metadata files.
pub const IND_EXT: &str = "ind";
/// File extension of PLINK pedigree files.
pub const FAM_EXT: &str = "fam";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmixtureParams {
    #[serde(default)]
    pub supervised: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataManagement {
    #[serde(default)]
    pub convert_eigenstrat_to_packedped: bool,
}

/// Calculator configuration file (`<calc>.conf`, YAML).
/// ### Example:
/// ```yaml
/// components:
///   West: {Pop1: 10, Pop3: 5}
///   East: {Pop2: 12}
/// number_of_components: 2
/// dataset: reference
/// admixture_params: {supervised: false}
/// data_management: {convert_eigenstrat_to_packedped: false}
/// snp_file: null
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcConfig {
    pub components          : BTreeMap<String, BTreeMap<String, usize>>,
    pub number_of_components: usize,
    pub dataset             : String,
    #[serde(default)]
    pub admixture_params    : AdmixtureParams,
    #[serde(default)]
    pub data_management     : DataManagement,
    #[serde(default)]
    pub snp_file            : Option<PathBuf>,
}

impl CalcConfig {
    /// Read and deserialize a calculator configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let loc_msg = || format!("While reading calculator configuration '{}'", path.display());
        let mut yaml = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut yaml))
            .map_err(|source| ConfigError::Open{path: path.to_path_buf(), source})
            .with_loc(loc_msg)?;

        let config: Self = serde_yaml::from_str(&yaml)
            .map_err(|source| ConfigError::Deserialize{path: path.to_path_buf(), source})
            .with_loc(loc_msg)?;
        config.validate().with_loc(loc_msg)?;
        debug!("Calculator configuration: {config:#?}");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dataset.trim().is_empty() {
            return Err(ConfigError::EmptyDataset).loc("While validating 'dataset'")
        }
        if self.number_of_components != self.components.len() {
            warn!(
                "'number_of_components' is set to {}, but {} component(s) are defined.",
                self.number_of_components, self.components.len()
            );
        }
        Ok(())
    }

    /// Build the validated sampling plan of this calculator.
    pub fn component_spec(&self) -> Result<ComponentSpec> {
        ComponentSpec::new(self.components.clone())
            .loc(ConfigError::InvalidComponents)
    }

    /// `{data_dir}/{dataset}.{ext}`
    pub fn dataset_file(&self, data_dir: &Path, ext: &str) -> PathBuf {
        data_dir.join(format!("{}.{ext}", self.dataset))
    }

    /// Path of the `.ind` individual metadata file.
    pub fn ind_path(&self, data_dir: &Path) -> PathBuf {
        self.dataset_file(data_dir, IND_EXT)
    }

    /// Path of the `.fam` pedigree file.
    pub fn fam_path(&self, data_dir: &Path) -> PathBuf {
        self.dataset_file(data_dir, FAM_EXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_sampler::SamplerError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CONF: &str = "\
components:
  West:
    Pop1: 10
    Pop3: 5
  East:
    Pop2: 12
number_of_components: 2
dataset: reference
admixture_params:
  supervised: true
data_management:
  convert_eigenstrat_to_packedped: false
snp_file: snps.txt
";

    fn write_conf(contents: &str) -> anyhow::Result<(tempfile::TempDir, PathBuf)> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("calc.conf");
        File::create(&path)?.write_all(contents.as_bytes())?;
        Ok((tmpdir, path))
    }

    #[test]
    fn deserialize() -> anyhow::Result<()> {
        let (_tmpdir, path) = write_conf(CONF)?;
        let config = CalcConfig::from_path(&path)?;
        assert_eq!(config.number_of_components, 2);
        assert_eq!(config.dataset, "reference");
        assert!(config.admixture_params.supervised);
        assert!(!config.data_management.convert_eigenstrat_to_packedped);
        assert_eq!(config.snp_file, Some(PathBuf::from("snps.txt")));

        let spec = config.component_spec()?;
        assert_eq!(spec.iter().collect::<Vec<_>>(), [("East", "Pop2", 12), ("West", "Pop1", 10), ("West", "Pop3", 5)]);

        assert_eq!(config.ind_path(Path::new("data")), Path::new("data/reference.ind"));
        assert_eq!(config.fam_path(Path::new("data")), Path::new("data/reference.fam"));
        Ok(())
    }

    #[test]
    fn optional_sections() -> anyhow::Result<()> {
        let (_tmpdir, path) = write_conf("components: {A: {Pop1: 1}}\nnumber_of_components: 1\ndataset: ref\n")?;
        let config = CalcConfig::from_path(&path)?;
        assert_eq!(config.admixture_params, AdmixtureParams::default());
        assert_eq!(config.data_management, DataManagement::default());
        assert_eq!(config.snp_file, None);
        Ok(())
    }

    #[test]
    fn duplicate_population() -> anyhow::Result<()> {
        let (_tmpdir, path) = write_conf("components: {A: {Pop1: 1}, B: {Pop1: 2}}\nnumber_of_components: 2\ndataset: ref\n")?;
        let err = CalcConfig::from_path(&path)?.component_spec().expect_err("Pop1 is claimed twice");
        assert!(matches!(err.downcast_ref::<SamplerError>(), Some(SamplerError::DuplicatePopulationAssignment{..})));
        Ok(())
    }

    #[test]
    fn missing_required_field() -> anyhow::Result<()> {
        let (_tmpdir, path) = write_conf("components: {A: {Pop1: 1}}\nnumber_of_components: 1\n")?;
        let err = CalcConfig::from_path(&path).expect_err("'dataset' is required");
        assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::Deserialize{..})));
        Ok(())
    }

    #[test]
    fn negative_sample_size() -> anyhow::Result<()> {
        let (_tmpdir, path) = write_conf("components: {A: {Pop1: -1}}\nnumber_of_components: 1\ndataset: ref\n")?;
        assert!(CalcConfig::from_path(&path).is_err());
        Ok(())
    }

    #[test]
    fn missing_file() {
        let err = CalcConfig::from_path(Path::new("/does/not/exist.conf")).unwrap_err();
        assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::Open{..})));
    }
}
