use std::{collections::BTreeMap, io::BufRead, str::FromStr};

use crate::individual::{Individual, Sex};

mod error;
pub use error::RecordStoreError;

/// In-memory set of reference individuals, parsed from an EIGENSTRAT `.ind` stream.
/// ### File characteristics:
/// - Whitespace-separated fields
/// - Columns: <Sample-id>  <sex>  <population>
/// - Additional columns are ignored. Blank lines are skipped.
///
/// Individuals are kept in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    individuals: Vec<Individual>,
}

impl RecordStore {
    /// Parse every line of `source`.
    ///
    /// # Errors
    /// - `RecordStoreError::ReadLine` if the underlying reader fails.
    /// - `RecordStoreError::MalformedRecord` on the first line carrying less than three fields.
    pub fn parse<R: BufRead>(source: R) -> Result<Self, RecordStoreError> {
        let mut individuals = Vec::new();
        for (i, line) in source.lines().enumerate() {
            let line = line.map_err(|source| RecordStoreError::ReadLine{line: i + 1, source})?;
            if let Some(individual) = Self::parse_line(&line, i + 1)? {
                individuals.push(individual);
            }
        }
        Ok(Self{individuals})
    }

    /// Same as [`RecordStore::parse`], from an in-memory sequence of lines.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, RecordStoreError>
    where   I: IntoIterator<Item = S>,
            S: AsRef<str>,
    {
        let mut individuals = Vec::new();
        for (i, line) in lines.into_iter().enumerate() {
            if let Some(individual) = Self::parse_line(line.as_ref(), i + 1)? {
                individuals.push(individual);
            }
        }
        Ok(Self{individuals})
    }

    /// Parse a single `.ind` record. Returns `None` for blank lines.
    /// `line_number` is 1-based, and only used for error reporting.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Individual>, RecordStoreError> {
        let mut fields = line.split_whitespace();
        let Some(id) = fields.next() else {
            return Ok(None)
        };

        let malformed = || RecordStoreError::MalformedRecord{line: line_number, content: line.trim().to_string()};
        let sex       = fields.next().ok_or_else(malformed)?;
        let ethnicity = fields.next().ok_or_else(malformed)?;

        let sex = Sex::from_str(sex).unwrap_or(Sex::Unknown);
        Ok(Some(Individual::new(id, sex, ethnicity)))
    }

    #[inline]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Head count of every population found within the store.
    pub fn populations(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for individual in &self.individuals {
            *counts.entry(individual.ethnicity()).or_insert(0) += 1;
        }
        counts
    }
}
