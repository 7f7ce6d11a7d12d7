use std::fs;

use calc_sampler::SamplerError;
use calc_io::{parse::ParseError, read::AlleleTableError};
use create_calc::CreateCalcError;

#[cfg(test)]
mod common;
use common::{CalcRunner, fam_id};

use anyhow::Result;
use itertools::Itertools;
use pretty_assertions::assert_eq;

const OUTPUTS: [&str; 4] = ["fam", "pop", "txt", "samples.tsv"];

#[test]
fn worked_example() -> Result<()> {
    let runner = CalcRunner::new("worked-example");
    runner.create("K2.conf", 42, "")?;

    let fam = runner.lines("K2.fam");
    let pop = runner.lines("K2.pop");
    assert_eq!(fam.len(), 2);
    assert_eq!(pop.len(), 2);

    // One of A1/A2 (Pop1 -> West) followed by A3 (Pop2 -> East), in file order.
    assert!(["F1 A1 0 0 1 -9", "F2 A2 0 0 2 -9"].contains(&fam[0].as_str()), "{fam:?}");
    assert_eq!(fam[1], "F3 A3 0 0 1 -9");
    assert_eq!(pop, ["West", "East"]);
    assert_eq!(runner.lines("K2.txt"), ["West", "East"]);

    let report = runner.lines("K2.samples.tsv");
    assert_eq!(report[0], "id\tsex\tpopulation\tcomponent");
    assert_eq!(report.len(), 3);
    assert!(report[1].ends_with("\tPop1\tWest"));
    assert_eq!(report[2], "A3\tM\tPop2\tEast");
    Ok(())
}

#[test]
fn projection_is_aligned_and_ordered() -> Result<()> {
    let runner = CalcRunner::new("panel");
    let populations = runner.populations("reference.ind");
    let components = [("CEU", "Europe"), ("GBR", "Europe"), ("YRI", "Africa"), ("CHB", "Asia")];

    for seed in 0..10 {
        runner.create("K3.conf", seed, "--overwrite")?;
        let fam = runner.lines("K3.fam");
        let pop = runner.lines("K3.pop");
        assert_eq!(fam.len(), pop.len());

        // Each label matches the component of the line's individual.
        for (line, label) in fam.iter().zip(&pop) {
            let population = &populations[fam_id(line)];
            let (_, component) = components.iter().find(|(p, _)| *p == population.as_str()).expect("Unexpected population");
            assert_eq!(label, component);
        }

        // Kept lines are a subsequence of the original file.
        let reference = fs::read_to_string(runner.data.join("reference.fam"))?;
        let mut remaining = reference.lines();
        assert!(fam.iter().all(|line| remaining.any(|original| original == line.as_str())));

        // GBR002 is sampled but absent from the pedigree file.
        let per_component = pop.iter().map(String::as_str).counts();
        assert_eq!(per_component["Europe"], 3 + 2);
        assert_eq!(per_component["Africa"], 4);
        assert_eq!(per_component["Asia"], 2);
        assert_eq!(runner.lines("K3.samples.tsv").len(), 1 + 12);

        // Legend follows the order of first appearance within the .pop file.
        assert_eq!(runner.lines("K3.txt"), pop.iter().unique().cloned().collect::<Vec<_>>());
    }
    Ok(())
}

#[test]
fn same_seed_same_outputs() -> Result<()> {
    let first  = CalcRunner::new("panel");
    let second = CalcRunner::new("panel");
    first.create("K3.conf", 2024, "")?;
    second.create("K3.conf", 2024, "")?;
    for ext in OUTPUTS {
        let file = format!("K3.{ext}");
        assert_eq!(fs::read(first.output_file(&file))?, fs::read(second.output_file(&file))?, "{file}");
    }
    Ok(())
}

#[test]
fn insufficient_population() {
    let runner = CalcRunner::new("worked-example");
    let err = runner.create("insufficient.conf", 42, "").expect_err("3 out of 2 individuals should fail");
    assert_eq!(err.downcast_ref::<SamplerError>(), Some(&SamplerError::InsufficientPopulation{
        component : "West".to_string(),
        population: "Pop1".to_string(),
        requested : 3,
        available : 2,
    }));
    assert!(runner.output_files().is_empty(), "{:?}", runner.output_files());
}

#[test]
fn duplicate_population_assignment() {
    let runner = CalcRunner::new("worked-example");
    let err = runner.create("duplicate.conf", 42, "").expect_err("Pop1 is claimed twice");
    assert!(matches!(
        err.downcast_ref::<SamplerError>(),
        Some(SamplerError::DuplicatePopulationAssignment{population, ..}) if population == "Pop1"
    ));
    assert!(runner.output_files().is_empty());
}

#[test]
fn empty_projection_leaves_no_output() {
    let runner = CalcRunner::new("worked-example");
    let err = runner.create("orphans.conf", 42, "").expect_err("A4 is missing from example.fam");
    assert!(matches!(err.downcast_ref::<CreateCalcError>(), Some(CreateCalcError::EmptyProjection{..})));
    assert!(runner.output_files().is_empty(), "{:?}", runner.output_files());
}

#[test]
fn outputs_are_protected() -> Result<()> {
    let runner = CalcRunner::new("worked-example");
    runner.create("K2.conf", 1, "")?;
    let previous = runner.lines("K2.fam");

    let err = runner.create("K2.conf", 2, "").expect_err("Outputs exist and --overwrite is missing");
    assert!(matches!(err.downcast_ref::<ParseError>(), Some(ParseError::OverwriteDisallowed{..})));
    assert_eq!(runner.lines("K2.fam"), previous);

    runner.create("K2.conf", 2, "--overwrite")?;
    assert_eq!(runner.lines("K2.pop"), ["West", "East"]);
    Ok(())
}

#[test]
fn directory_output_leaves_no_partial_outputs() -> Result<()> {
    let runner = CalcRunner::new("worked-example");
    let legend = runner.output_file("K2.txt");
    fs::create_dir_all(&legend)?;
    fs::write(legend.join("notes"), "keep\n")?;

    let err = runner.create("K2.conf", 42, "--overwrite").expect_err("K2.txt is a directory");
    assert!(matches!(err.downcast_ref::<ParseError>(), Some(ParseError::NotAFile{..})));
    assert!(!runner.output_file("K2.fam").exists());
    assert!(!runner.output_file("K2.pop").exists());
    assert_eq!(runner.output_files(), ["K2.txt"]);
    assert_eq!(fs::read_to_string(legend.join("notes"))?, "keep\n");
    Ok(())
}

#[test]
fn directory_output_keeps_previous_outputs() -> Result<()> {
    let runner = CalcRunner::new("worked-example");
    runner.create("K2.conf", 1, "")?;
    let previous = OUTPUTS.map(|ext| (ext != "txt").then(|| runner.lines(&format!("K2.{ext}"))));

    let legend = runner.output_file("K2.txt");
    fs::remove_file(&legend)?;
    fs::create_dir(&legend)?;
    fs::write(legend.join("notes"), "keep\n")?;

    runner.create("K2.conf", 2, "--overwrite").expect_err("K2.txt is a directory");
    let current = OUTPUTS.map(|ext| (ext != "txt").then(|| runner.lines(&format!("K2.{ext}"))));
    assert_eq!(previous, current);
    assert!(legend.is_dir());
    Ok(())
}

#[test]
fn explicit_name_and_inputs() -> Result<()> {
    let runner = CalcRunner::new("worked-example");
    let ind = runner.data.join("example.ind");
    let fam = runner.data.join("example.fam");
    runner.create("K2.conf", 3, &format!("--name diy --ind {} --fam {}", ind.display(), fam.display()))?;
    assert_eq!(runner.output_files(), ["diy.fam", "diy.pop", "diy.samples.tsv", "diy.txt"]);
    Ok(())
}

#[test]
fn convertf_par() -> Result<()> {
    let runner = CalcRunner::new("panel");
    admixcalc_rs::run(runner.cli("convertf-par", "K3.conf", ""))?;
    validate_file!("test-data/expected/reference.par", runner.output_file("reference.par"));
    Ok(())
}

#[test]
fn convertf_par_disabled() -> Result<()> {
    let runner = CalcRunner::new("panel");
    admixcalc_rs::run(runner.cli("convertf-par", "K3-noconvert.conf", ""))?;
    assert!(runner.output_files().is_empty());
    Ok(())
}

#[test]
fn calc_par() -> Result<()> {
    let runner = CalcRunner::new("panel");
    let alleles = runner.data.join("K3.alleles");
    admixcalc_rs::run(runner.cli("calc-par", "K3.conf", &format!("--alleles {}", alleles.display())))?;
    validate_file!("test-data/expected/K3.par", runner.output_file("K3.par"));
    Ok(())
}

fn calc_files_args(runner: &CalcRunner, pfile: &str) -> String {
    format!("--frq {} --pfile {}", runner.data.join("K3.frq").display(), runner.data.join(pfile).display())
}

#[test]
fn calc_files() -> Result<()> {
    let runner = CalcRunner::new("panel");
    admixcalc_rs::run(runner.cli("calc-files", "K3.conf", &calc_files_args(&runner, "K3.3.P")))?;
    validate_file!("test-data/expected/K3.alleles", runner.output_file("K3.alleles"));
    validate_file!("test-data/expected/K3.F", runner.output_file("K3.F"));

    // The produced alleles file feeds 'calc-par'.
    let alleles = runner.output_file("K3.alleles");
    admixcalc_rs::run(runner.cli("calc-par", "K3.conf", &format!("--alleles {}", alleles.display())))?;
    validate_file!("test-data/expected/K3.par", runner.output_file("K3.par"));
    Ok(())
}

#[test]
fn calc_files_row_count_mismatch() -> Result<()> {
    let runner = CalcRunner::new("panel");
    let pfile = runner.data.join("K3.3.P");
    let truncated = runner.data.join("truncated.P");
    fs::write(&truncated, fs::read_to_string(&pfile)?.lines().take(3).map(|line| format!("{line}\n")).collect::<String>())?;

    let err = admixcalc_rs::run(runner.cli("calc-files", "K3.conf", &calc_files_args(&runner, "truncated.P")))
        .expect_err("5 variants, 3 rows");
    assert!(matches!(err.downcast_ref::<AlleleTableError>(), Some(AlleleTableError::RowCountMismatch{frq: 5, pfile: 3})));
    assert!(runner.output_files().is_empty(), "{:?}", runner.output_files());
    Ok(())
}

#[test]
fn rerun_from_yaml() -> Result<()> {
    let runner = CalcRunner::new("panel");
    let cli = runner.cli("create", "K3.conf", "--seed 99 --overwrite");
    let yaml = cli.serialize()?.expect("'create' arguments should be serialized");
    admixcalc_rs::run(cli)?;
    let first = OUTPUTS.map(|ext| runner.lines(&format!("K3.{ext}")));

    for ext in OUTPUTS {
        fs::remove_file(runner.output_file(&format!("K3.{ext}")))?;
    }
    let args = format!("admixcalc-rs from-yaml {}", yaml.display());
    admixcalc_rs::run(<parser::Cli as clap::Parser>::parse_from(args.split_whitespace()))?;
    let second = OUTPUTS.map(|ext| runner.lines(&format!("K3.{ext}")));
    assert_eq!(first, second);
    Ok(())
}
