use std::{collections::HashMap, fs, path::{Path, PathBuf}};
use clap::Parser;

use super::Fixture;

/// Runs `admixcalc-rs` subcommands over a copy of a `tests/test-data` dataset directory.
pub struct CalcRunner {
    pub data  : Fixture,
    pub output: Fixture,
}

impl CalcRunner {
    pub fn new(dataset: &str) -> Self {
        Self { data: Fixture::copy(dataset), output: Fixture::blank("admixcalc-output") }
    }

    pub fn config(&self, conf: &str) -> PathBuf {
        self.data.join(conf)
    }

    pub fn cli(&self, subcommand: &str, conf: &str, extra: &str) -> parser::Cli {
        let args = format!("admixcalc-rs {subcommand}
            --config {}
            --output-dir {}
            {extra}
        ", self.config(conf).display(), self.output);
        eprintln!("{args}");
        parser::Cli::parse_from(args.split_whitespace())
    }

    /// Run `create` over `conf`, with a fixed seed.
    pub fn create(&self, conf: &str, seed: u64, extra: &str) -> anyhow::Result<()> {
        admixcalc_rs::run(self.cli("create", conf, &format!("--seed {seed} {extra}")))
    }

    pub fn output_file(&self, filename: &str) -> PathBuf {
        self.output.join(filename)
    }

    /// Lines of an output file, stripped of their terminator.
    pub fn lines(&self, filename: &str) -> Vec<String> {
        read_lines(&self.output_file(filename))
    }

    /// Files found within the output directory (if it exists)
    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&*self.output) else { return Vec::new() };
        let mut files = entries.map(|entry| entry.expect("Invalid entry").file_name().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    /// `id -> population` mapping of a dataset's `.ind` file.
    pub fn populations(&self, ind: &str) -> HashMap<String, String> {
        read_lines(&self.data.join(ind)).into_iter()
            .filter_map(|line| {
                let fields = line.split_whitespace().collect::<Vec<_>>();
                Some((fields.first()?.to_string(), fields.get(2)?.to_string()))
            })
            .collect()
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to open {}", path.display()))
        .lines()
        .map(str::to_string)
        .collect()
}

/// Second whitespace-separated field of a `.fam` line.
pub fn fam_id(line: &str) -> &str {
    line.split_whitespace().nth(1).expect("Missing individual id")
}
