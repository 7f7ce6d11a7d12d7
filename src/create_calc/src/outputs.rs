use std::path::{Path, PathBuf};

use calc_io::parse::{self, output_file};
use anyhow::Result;

pub const FAM_EXT    : &str = "fam";
pub const POP_EXT    : &str = "pop";
pub const LEGEND_EXT : &str = "txt";
pub const REPORT_EXT : &str = "samples.tsv";

/// Output files of `create`, all located within `--output-dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcOutputs {
    pub fam   : PathBuf,
    pub pop   : PathBuf,
    pub legend: PathBuf,
    pub report: PathBuf,
}

impl CalcOutputs {
    pub fn new(output_dir: &Path, calc_name: &str) -> Self {
        Self {
            fam   : output_file(output_dir, calc_name, FAM_EXT),
            pop   : output_file(output_dir, calc_name, POP_EXT),
            legend: output_file(output_dir, calc_name, LEGEND_EXT),
            report: output_file(output_dir, calc_name, REPORT_EXT),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [&self.fam, &self.pop, &self.legend, &self.report].into_iter().map(PathBuf::as_path)
    }

    /// Ensure every output may be written, and that none of them points to one of `inputs`.
    /// Targets that exist but are not regular files are rejected, even with `overwrite`.
    pub fn check(&self, overwrite: bool, inputs: &[&Path]) -> Result<()> {
        for output in self.iter() {
            parse::ensure_distinct_from_inputs(output, inputs)?;
            parse::can_write_file(overwrite, output)?;
            parse::create_parent_directory(output)?;
        }
        Ok(())
    }
}
