use std::{fs::File, io::{BufRead, BufReader}, path::Path, fmt::{self, Display, Formatter}};

use located_error::LocatedError;

use anyhow::Result;
use log::info;

mod error;
pub use error::AlleleTableError;

/// A variant of the calculator: its id and alleles (taken from a PLINK `.frq` file), along with the
/// per-component allele frequencies of the matching row of an ADMIXTURE `.P` file.
///
/// Rows are ordered by id, then alleles, then frequencies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AlleleRow {
    snp: String,
    a1 : String,
    a2 : String,
    frequencies: String,
}

impl AlleleRow {
    pub fn snp(&self) -> &str {
        &self.snp
    }

    /// `<snp> <a1> <a2>`: one line of `<calc>.alleles`
    pub fn alleles(&self) -> String {
        format!("{} {} {}", self.snp, self.a1, self.a2)
    }

    /// Space-separated frequencies: one line of `<calc>.F`
    pub fn frequencies(&self) -> &str {
        &self.frequencies
    }
}

impl Display for AlleleRow {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {}", self.alleles(), self.frequencies)
    }
}

/// Pair every variant of a PLINK `.frq` file with the corresponding row of an ADMIXTURE `.P` file, and
/// sort the result.
///
/// - The first line of `frq` is a header, and is skipped. Columns 2 to 4 (SNP, A1, A2) of the remaining
///   lines are kept.
/// - Rows are paired by position: the n-th variant of `frq` goes with the n-th line of `pfile`.
/// - Blank lines are ignored within both files.
///
/// # Errors
/// - `MalformedFrq` if a variant line carries less than 4 fields.
/// - `RowCountMismatch` if both files do not hold the same number of rows.
pub fn merge_allele_frequencies<F: BufRead, P: BufRead>(frq: F, pfile: P) -> Result<Vec<AlleleRow>, AlleleTableError> {
    let mut variants = Vec::new();
    for (i, line) in frq.lines().enumerate().skip(1) {
        let line = line.map_err(|source| AlleleTableError::Read{file: "frequency", line: i + 1, source})?;
        let mut fields = line.split_whitespace();
        if fields.next().is_none() {
            continue
        }
        let (Some(snp), Some(a1), Some(a2)) = (fields.next(), fields.next(), fields.next()) else {
            return Err(AlleleTableError::MalformedFrq{line: i + 1, content: line.trim().to_string()})
        };
        variants.push((snp.to_string(), a1.to_string(), a2.to_string()));
    }

    let mut frequencies = Vec::with_capacity(variants.len());
    for (i, line) in pfile.lines().enumerate() {
        let line = line.map_err(|source| AlleleTableError::Read{file: "P", line: i + 1, source})?;
        let row = line.trim();
        if !row.is_empty() {
            frequencies.push(row.to_string());
        }
    }

    if variants.len() != frequencies.len() {
        return Err(AlleleTableError::RowCountMismatch{frq: variants.len(), pfile: frequencies.len()})
    }

    let mut rows = variants.into_iter().zip(frequencies)
        .map(|((snp, a1, a2), frequencies)| AlleleRow{snp, a1, a2, frequencies})
        .collect::<Vec<_>>();
    rows.sort_unstable();
    Ok(rows)
}

/// Open a PLINK `.frq` file and an ADMIXTURE `.P` file, and merge them through [`merge_allele_frequencies`].
pub fn read_allele_table(frq: &Path, pfile: &Path) -> Result<Vec<AlleleRow>> {
    let loc_msg = || format!("While merging '{}' with '{}'", frq.display(), pfile.display());
    let frq_reader   = BufReader::new(File::open(frq).with_loc(loc_msg)?);
    let pfile_reader = BufReader::new(File::open(pfile).with_loc(loc_msg)?);
    let rows = merge_allele_frequencies(frq_reader, pfile_reader).with_loc(loc_msg)?;
    info!("Merged {} variant(s) of {} with {}", rows.len(), frq.display(), pfile.display());
    Ok(rows)
}
