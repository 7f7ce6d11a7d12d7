use std::{
    fs::File,
    path::{Path, PathBuf},
    fmt::{self, Display, Formatter}, ffi::OsStr
};

use located_error::*;

use clap::{Parser, Subcommand, Args};
use serde::{Serialize, Deserialize};
use log::debug;
use anyhow::Result;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="admixcalc-rs", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// admixcalc-rs: Prepare the input files of a DIY admixture calculator from a reference dataset.
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    /// 
    /// Set the verbosity level of this program. Multiple levels allowed {n} 
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    /// 
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    /// 
    /// By default, warnings are emitted and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli{
    /// Serialize command line arguments within a `.yaml` file.
    /// 
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder.
    /// 
    /// # Errors
    /// - if `serde_yaml` fails to parse `Self` to a string.
    /// - if the output file cannot be written.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let (common, module) = match &self.commands {
            Commands::Create{common, ..}      => (common, "create"),
            Commands::ConvertfPar{common, ..} => (common, "convertf-par"),
            Commands::CalcPar{common, ..}     => (common, "calc-par"),
            Commands::CalcFiles{common, ..}   => (common, "calc-files"),
            Commands::FromYaml{..}            => return Ok(None),
        };

        // Parse arguments to yaml and print to console.
        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::SerializeArgs)
            .loc("While serializing command line arguments")?;
        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file = common.output_dir.join(format!("{current_time}-{module}.yaml"));

        std::fs::write(&output_file, serialized)
            .map_err(|source| ParserError::WriteArgs{path: output_file.clone(), source})
            .loc("While serializing command line arguments")?;
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    /// 
    /// # Errors
    /// - if the provided `.yaml` does not exist, or does not carry read permissions.
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let loc_msg = || format!("While deserializing command line arguments from '{}'", yaml.display());
        let file = File::open(yaml)
            .map_err(|source| ParserError::OpenArgs{path: yaml.to_path_buf(), source})
            .with_loc(loc_msg)?;
        serde_yaml::from_reader(file)
            .map_err(|source| ParserError::DeserializeArgs{path: yaml.to_path_buf(), source})
            .with_loc(loc_msg)
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Sample reference individuals and write the calculator's `.fam`, `.pop`, `.txt` and sample report files.
    Create {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        create: Create,
    },

    /// Write a `convertf` parameter file, converting the EIGENSTRAT dataset into PACKEDPED.
    ConvertfPar {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        convertf: ConvertfPar,
    },

    /// Write the parameter file of the resulting calculator.
    CalcPar {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        par: CalcPar,
    },

    /// Merge the reference panel's allele frequencies with the result of a supervised ADMIXTURE run, and
    /// write the calculator's `.alleles` and `.F` files.
    CalcFiles {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        files: CalcFiles,
    },

    /// Run admixcalc-rs using a previously generated .yaml configuration file.
    /// 
    /// This allows users to easily re-apply a command using the exact same parameters
    /// and arguments (including the seed).
    FromYaml {
        yaml: PathBuf,
    },
}

#[derive(Parser, Debug, Default, Serialize, Deserialize)]
pub struct Common {
    /// Calculator configuration file (YAML).
    ///
    /// Defines the calculator's components, each one composed of populations with a requested sample size:{n}
    ///   components: {West: {Pop1: 10, Pop3: 5}, East: {Pop2: 12}}{n}
    ///   number_of_components: 2{n}
    ///   dataset: reference
    #[clap(short='c', long, parse(try_from_os_str=valid_input_file))]
    pub config: PathBuf,

    /// Output directory where results will be written.
    #[clap(short='o', long, default_value("admixcalc-output"), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: PathBuf,

    /// Overwrite existing output files.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

impl Common {
    /// Name of the calculator: `name` if provided, the file stem of `--config` otherwise.
    /// 
    /// # Errors
    /// - if no name was provided and `--config` carries no valid UTF-8 file stem.
    pub fn calc_name(&self, name: Option<&str>) -> Result<String> {
        if let Some(name) = name {
            return Ok(name.to_string())
        }
        self.config.file_stem()
            .and_then(OsStr::to_str)
            .map(str::to_string)
            .ok_or_else(|| ParserError::ParseCalcName(self.config.display().to_string()))
            .loc("While parsing the calculator name")
    }

    /// Default location of the reference dataset: the directory of `--config`
    pub fn default_data_dir(&self) -> PathBuf {
        match self.config.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Resolve `data_dir`, falling back to [`Common::default_data_dir`]
    pub fn data_dir(&self, data_dir: Option<&Path>) -> PathBuf {
        data_dir.map_or_else(|| self.default_data_dir(), Path::to_path_buf)
    }
}

#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Create {
    /// Name of the calculator. Defaults to the file stem of --config
    #[clap(short='n', long)]
    pub name: Option<String>,

    /// Directory containing the reference dataset files (`<dataset>.ind`, `<dataset>.fam`).
    /// 
    /// Defaults to the directory of --config
    #[clap(short='d', long, parse(try_from_os_str=valid_input_directory))]
    pub data_dir: Option<PathBuf>,

    /// Override the path of the EIGENSTRAT individual metadata file. Defaults to `<data-dir>/<dataset>.ind`
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub ind: Option<PathBuf>,

    /// Override the path of the PLINK pedigree file. Defaults to `<data-dir>/<dataset>.fam`
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub fam: Option<PathBuf>,

    /// Provide the RNG with a set seed.
    #[clap(long, required(false), default_value_t=fastrand::u64(u64::MIN..=u64::MAX))]
    pub seed: u64,
}

#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct ConvertfPar {
    /// Directory containing the EIGENSTRAT dataset (`.geno`, `.snp`, `.ind`).
    /// 
    /// When provided, file paths of the parameter file are prefixed with this directory.
    #[clap(short='d', long, parse(try_from_os_str=valid_input_directory))]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct CalcPar {
    /// Name of the calculator. Defaults to the file stem of --config
    #[clap(short='n', long)]
    pub name: Option<String>,

    /// Calculator alleles file (`<calc>.alleles`). Its number of lines is written into the parameter file.
    #[clap(short='a', long, parse(try_from_os_str=valid_input_file))]
    pub alleles: PathBuf,
}

#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct CalcFiles {
    /// Name of the calculator. Defaults to the file stem of --config
    #[clap(short='n', long)]
    pub name: Option<String>,

    /// PLINK allele frequency file of the reference panel (`plink --freq`). Its first line is a header.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub frq: PathBuf,

    /// ADMIXTURE allele frequency file (`<calc>.<K>.P`): one row per variant, in the order of --frq.
    #[clap(short='p', long, parse(try_from_os_str=valid_input_file))]
    pub pfile: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(&self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(*self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: &FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(*entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_directory(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    let path = Path::new(s);
    if ! path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| ParserError::CreateOutputDir(path.display().to_string(), e))
            .loc("While creating output directory")?;
    }
    assert_filesystem_entity_is_valid(s, &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}
