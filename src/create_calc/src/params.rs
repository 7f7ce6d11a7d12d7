use std::path::PathBuf;

use calc_io::{
    parse::{can_write_file, count_lines, ensure_distinct_from_inputs, output_file},
    read::{CalcConfig, read_allele_table},
    write::{AtomicWriter, CalcParams, ConvertfParams},
};
use parser::{CalcFiles, CalcPar, Common, ConvertfPar};
use located_error::LocatedError;

use anyhow::Result;
use log::info;

const PAR_EXT     : &str = "par";
const ALLELES_EXT : &str = "alleles";
const FREQS_EXT   : &str = "F";

/// Write `<dataset>.par`, the `convertf` parameter file converting the reference dataset from
/// EIGENSTRAT to PACKEDPED. Returns `None` when the conversion is disabled within the configuration.
pub fn write_convertf_par(common: &Common, convertf: &ConvertfPar) -> Result<Option<PathBuf>> {
    let config = CalcConfig::from_path(&common.config)?;
    if !config.data_management.convert_eigenstrat_to_packedped {
        info!("Skipping conversion from EIGENSTRAT to PACKEDPED for dataset '{}'", config.dataset);
        return Ok(None)
    }

    let prefix = match &convertf.data_dir {
        Some(dir) => dir.join(&config.dataset).display().to_string(),
        None      => config.dataset.clone(),
    };

    let path = output_file(&common.output_dir, &config.dataset, PAR_EXT);
    can_write_file(common.overwrite, &path)?;
    ensure_distinct_from_inputs(&path, &[common.config.as_path()])?;

    let mut writer = AtomicWriter::new(&path)?;
    writer.write_iter(ConvertfParams::new(prefix).lines())
        .with_loc(|| format!("While writing '{}'", path.display()))?;
    let path = writer.commit()?;
    info!("convertf parameter file written to {}", path.display());
    Ok(Some(path))
}

/// Write `<calc>.par`, the parameter file of the calculator.
pub fn write_calc_par(common: &Common, par: &CalcPar) -> Result<PathBuf> {
    let config    = CalcConfig::from_path(&common.config)?;
    let calc_name = common.calc_name(par.name.as_deref())?;
    let n_alleles = count_lines(&par.alleles)
        .with_loc(|| format!("While counting alleles of '{}'", par.alleles.display()))?;

    let path = output_file(&common.output_dir, &calc_name, PAR_EXT);
    can_write_file(common.overwrite, &path)?;
    ensure_distinct_from_inputs(&path, &[common.config.as_path(), par.alleles.as_path()])?;

    let params = CalcParams::new(calc_name, config.number_of_components, n_alleles);
    let mut writer = AtomicWriter::new(&path)?;
    writer.write_iter(params.lines())
        .with_loc(|| format!("While writing '{}'", path.display()))?;
    let path = writer.commit()?;
    info!("Calculator parameter file written to {} (K={}, {n_alleles} alleles)", path.display(), config.number_of_components);
    Ok(path)
}

/// Merge the PLINK `.frq` file of the reference panel with the ADMIXTURE `.P` file of a supervised run,
/// and write the calculator's `<calc>.alleles` and `<calc>.F` files. Both files are sorted by variant, and
/// are committed together. Returns their paths.
pub fn write_calc_files(common: &Common, files: &CalcFiles) -> Result<(PathBuf, PathBuf)> {
    let calc_name = common.calc_name(files.name.as_deref())?;
    let alleles_path = output_file(&common.output_dir, &calc_name, ALLELES_EXT);
    let freqs_path   = output_file(&common.output_dir, &calc_name, FREQS_EXT);
    let inputs = [common.config.as_path(), files.frq.as_path(), files.pfile.as_path()];
    for path in [&alleles_path, &freqs_path] {
        ensure_distinct_from_inputs(path, &inputs)?;
        can_write_file(common.overwrite, path)?;
    }

    let rows = read_allele_table(&files.frq, &files.pfile)?;

    let mut alleles_writer = AtomicWriter::new(&alleles_path)?;
    let mut freqs_writer   = AtomicWriter::new(&freqs_path)?;
    for row in &rows {
        alleles_writer.write_line(row.alleles())?;
        freqs_writer.write_line(row.frequencies())?;
    }
    let committed = AtomicWriter::commit_all([alleles_writer, freqs_writer])?;
    for path in &committed {
        info!("Wrote {}", path.display());
    }
    info!("Calculator '{calc_name}': {} allele(s)", rows.len());
    Ok((alleles_path, freqs_path))
}
