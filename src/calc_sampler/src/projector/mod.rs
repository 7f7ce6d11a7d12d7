use std::io::BufRead;

use ahash::AHashSet;

#[cfg(test)]
use mockall::automock;

mod error;
pub use error::ProjectorError;

/// Resolve which records should be kept, and which label they should carry.
#[cfg_attr(test, automock)]
pub trait ComponentLookup {
    /// Return the population of a sampled individual, or `None` if `id` was not sampled.
    fn population_of(&self, id: &str) -> Option<String>;

    /// Return the component a population was assigned to.
    fn component_of(&self, population: &str) -> Option<String>;
}

/// A kept record: the raw line, untouched, and its component label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredRecord {
    raw      : String,
    key      : String,
    component: String,
}

impl FilteredRecord {
    /// Raw line, including its original line terminator (if any).
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Raw line, stripped of its line terminator.
    pub fn line(&self) -> &str {
        self.raw.trim_end_matches(['\n', '\r'])
    }

    /// Individual id of this record.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn component(&self) -> &str {
        &self.component
    }
}

/// Record counters of a projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionSummary {
    pub scanned: usize,
    pub kept   : usize,
    pub dropped: usize,
    pub blank  : usize,
}

/// Single-pass filter over a per-individual record stream (e.g. a PLINK `.fam` file).
///
/// Each line's key is its second whitespace-separated field. A line is kept if and only if
/// `lookup` knows the key, and is then yielded along with the component label of the
/// individual's population. Kept records are yielded in stream order, and each carries both
/// output channels (raw line + label) so the two can never drift apart.
///
/// The iterator fuses after the first error.
pub struct FilterProjector<'l, R, L: ?Sized> {
    source : R,
    lookup : &'l L,
    buffer : String,
    line_no: usize,
    summary: ProjectionSummary,
    seen   : AHashSet<String>,
    done   : bool,
}

impl<'l, R: BufRead, L: ComponentLookup + ?Sized> FilterProjector<'l, R, L> {
    pub fn new(source: R, lookup: &'l L) -> Self {
        Self {
            source,
            lookup,
            buffer : String::new(),
            line_no: 0,
            summary: ProjectionSummary::default(),
            seen   : AHashSet::new(),
            done   : false,
        }
    }

    /// Counters of the records consumed so far.
    #[inline]
    pub fn summary(&self) -> ProjectionSummary {
        self.summary
    }

    /// Whether a record keyed by `id` has been kept so far.
    #[inline]
    pub fn has_kept(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    fn project_line(&mut self) -> Result<Option<FilteredRecord>, ProjectorError> {
        let line = self.buffer.as_str();
        let mut fields = line.split_whitespace();
        if fields.next().is_none() {
            self.summary.blank += 1;
            return Ok(None)
        }

        let Some(key) = fields.next() else {
            return Err(ProjectorError::MalformedRecord{line: self.line_no, content: line.trim().to_string()})
        };

        let Some(population) = self.lookup.population_of(key) else {
            self.summary.dropped += 1;
            return Ok(None)
        };

        let component = self.lookup.component_of(&population)
            .ok_or_else(|| ProjectorError::UnresolvedLabel{id: key.to_string(), population})?;

        let key = key.to_string();
        self.seen.insert(key.clone());
        self.summary.kept += 1;
        Ok(Some(FilteredRecord{raw: line.to_string(), key, component}))
    }
}

impl<'l, R: BufRead, L: ComponentLookup + ?Sized> Iterator for FilterProjector<'l, R, L> {
    type Item = Result<FilteredRecord, ProjectorError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            match self.source.read_line(&mut self.buffer) {
                Ok(0) => {
                    self.done = true;
                    return None
                },
                Ok(_) => {
                    self.line_no += 1;
                    self.summary.scanned += 1;
                },
                Err(source) => {
                    self.done = true;
                    return Some(Err(ProjectorError::ReadLine{line: self.line_no + 1, source}))
                }
            }

            match self.project_line() {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None)         => continue,
                Err(e)           => {
                    self.done = true;
                    return Some(Err(e))
                }
            }
        }
        None
    }
}
