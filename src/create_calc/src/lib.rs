//! Build the sample-level input files of an admixture calculator from a reference dataset.

use std::{fs::File, io::BufReader, path::Path};

use calc_sampler::{ComponentIndex, FilterProjector, ProjectionSummary, StratifiedSampler};
use calc_io::{read::{read_individuals, CalcConfig}, write::AtomicWriter};
use parser::{Common, Create};
use logger::Logger;
use located_error::LocatedError;

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info, warn};

mod error;
pub use error::CreateCalcError;

mod outputs;
pub use outputs::CalcOutputs;

pub mod params;

/// Header of the `<calc>.samples.tsv` report.
pub const REPORT_HEADER: &str = "id\tsex\tpopulation\tcomponent";

/// Outcome of a successful `create` run.
#[derive(Debug, Clone)]
pub struct CalcSummary {
    pub calc_name : String,
    pub sampled   : usize,
    pub components: Vec<String>,
    pub projection: ProjectionSummary,
    pub outputs   : CalcOutputs,
}

/// Sample reference individuals according to the calculator configuration, then write:
/// - `<calc>.fam`: kept lines of the dataset's `.fam`, in their original order.
/// - `<calc>.pop`: component label of each kept line.
/// - `<calc>.txt`: distinct labels of `<calc>.pop`, in order of first appearance.
/// - `<calc>.samples.tsv`: every sampled individual and its component, sorted by id.
///
/// Outputs are committed together, once every step succeeded. A failed run leaves no new file behind, and
/// previous outputs (when running with `--overwrite`) are left untouched.
pub fn run(common: &Common, create: &Create) -> Result<CalcSummary> {
    // ----------------------------- Load configuration and resolve paths.
    let config    = CalcConfig::from_path(&common.config)?;
    let calc_name = common.calc_name(create.name.as_deref())?;
    let data_dir  = common.data_dir(create.data_dir.as_deref());
    let ind_path  = create.ind.clone().unwrap_or_else(|| config.ind_path(&data_dir));
    let fam_path  = create.fam.clone().unwrap_or_else(|| config.fam_path(&data_dir));
    debug!("Individuals: {} | Pedigree: {}", ind_path.display(), fam_path.display());

    let outputs = CalcOutputs::new(&common.output_dir, &calc_name);
    outputs.check(common.overwrite, &[ind_path.as_path(), fam_path.as_path(), common.config.as_path()])?;

    // ----------------------------- Sample reference individuals.
    let spec  = config.component_spec()?;
    let store = read_individuals(&ind_path)?;
    info!("Sampling {} individual(s) across {} component(s) (seed: {})", spec.total_requested(), spec.len(), create.seed);
    let samples = StratifiedSampler::with_seed(create.seed)
        .sample_spec(store.individuals(), &spec)
        .loc(CreateCalcError::SampleIndividuals)?;

    let index = ComponentIndex::build(samples).loc(CreateCalcError::IndexSamples)?;
    info!("Sampled individuals per component: {}",
        index.count_by_component().iter().map(|(component, n)| format!("{component}={n}")).join(", ")
    );

    // ----------------------------- Filter the pedigree file.
    let Projected{fam_writer, pop_writer, legend, summary: projection, missing} = project_fam(&fam_path, &index, &outputs)?;
    if !missing.is_empty() {
        warn!("{} sampled individual(s) were not found within {}: {}", missing.len(), fam_path.display(), missing.join(" "));
    }

    // ----------------------------- Legend and sample report
    let mut legend_writer = AtomicWriter::new(&outputs.legend)?;
    legend_writer.write_iter(&legend)?;

    let mut report_writer = AtomicWriter::new(&outputs.report)?;
    report_writer.write_line(REPORT_HEADER)?;
    report_writer.write_iter(index.iter_sorted().map(|(individual, component)| {
        format!("{}\t{}\t{}\t{component}", individual.id(), individual.sex().code(), individual.ethnicity())
    }))?;

    // ----------------------------- Commit every output at once.
    for path in AtomicWriter::commit_all([fam_writer, pop_writer, legend_writer, report_writer])? {
        info!("Wrote {}", path.display());
    }

    if config.admixture_params.supervised {
        info!("Supervised mode: {} carries the training labels of {}", outputs.pop.display(), outputs.fam.display());
    }
    if let Some(snp_file) = &config.snp_file {
        info!("SNP subset for this calculator: {}", snp_file.display());
    }

    Ok(CalcSummary{calc_name, sampled: index.len(), components: legend, projection, outputs})
}

/// Pending outputs of a pedigree file projection.
struct Projected {
    fam_writer: AtomicWriter,
    pop_writer: AtomicWriter,
    legend    : Vec<String>,
    summary   : ProjectionSummary,
    missing   : Vec<String>,
}

/// Stream `fam_path` through a [`FilterProjector`], writing each kept line and its label in lockstep.
fn project_fam(fam_path: &Path, index: &ComponentIndex, outputs: &CalcOutputs) -> Result<Projected> {
    let loc_msg = || format!("While filtering '{}'", fam_path.display());
    let source = File::open(fam_path)
        .map_err(|source| CreateCalcError::OpenFam{path: fam_path.to_path_buf(), source})
        .with_loc(loc_msg)?;

    let mut fam_writer = AtomicWriter::new(&outputs.fam)?;
    let mut pop_writer = AtomicWriter::new(&outputs.pop)?;
    let mut legend: Vec<String> = Vec::new();

    let spinner = Logger::spinner(format!("Filtering {}", fam_path.display()));
    let mut projector = FilterProjector::new(BufReader::new(source), index);
    for record in projector.by_ref() {
        let record = record.with_loc(loc_msg)?;
        fam_writer.write_raw(record.raw())?;
        pop_writer.write_line(record.component())?;
        if !legend.iter().any(|label| label == record.component()) {
            legend.push(record.component().to_string());
        }
        spinner.inc(1);
    }
    spinner.finish_and_clear();

    let summary = projector.summary();
    info!("{}: {} line(s) scanned, {} kept, {} dropped, {} blank", fam_path.display(), summary.scanned, summary.kept, summary.dropped, summary.blank);
    if summary.kept == 0 {
        return Err(CreateCalcError::EmptyProjection{path: fam_path.to_path_buf()}).with_loc(loc_msg)
    }

    let missing = index.iter_sorted()
        .map(|(individual, _)| individual.id())
        .filter(|id| !projector.has_kept(id))
        .map(str::to_string)
        .collect();
    Ok(Projected{fam_writer, pop_writer, legend, summary, missing})
}
