use std::{fmt::Display, fs, io::{BufWriter, Write}, path::{Path, PathBuf}};

use located_error::LocatedError;

use anyhow::Result;
use log::{debug, warn};
use tempfile::{NamedTempFile, TempPath};

mod error;
pub use error::AtomicWriterError;

/// Line-oriented file writer, backed by a temporary file living next to its target.
///
/// Nothing appears at the target location until [`AtomicWriter::commit`] is called. Dropping the
/// writer without committing removes the temporary file, and leaves any pre-existing target untouched.
/// Use [`AtomicWriter::commit_all`] when several files must appear together or not at all.
pub struct AtomicWriter {
    target: PathBuf,
    source: BufWriter<NamedTempFile>,
}

impl AtomicWriter {
    /// # Errors
    /// if a temporary file cannot be created within the parent directory of `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let target = path.as_ref().to_path_buf();
        let tempfile = sibling_tempfile(&target, ".tmp")
            .map_err(|source| AtomicWriterError::Create{path: target.clone(), source})
            .loc("While creating output file")?;
        debug!("Writing {} through {}", target.display(), tempfile.path().display());
        Ok(Self{target, source: BufWriter::new(tempfile)})
    }

    /// Final location of this writer's contents.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Write `line`, followed by a newline.
    pub fn write_line(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.source, "{line}").map_err(|source| self.write_err(source))
            .loc("While writing line")
    }

    /// Write a raw line verbatim. A newline is appended if `raw` does not already end with one.
    pub fn write_raw(&mut self, raw: &str) -> Result<()> {
        let result = match raw.ends_with('\n') {
            true  => self.source.write_all(raw.as_bytes()),
            false => writeln!(self.source, "{raw}"),
        };
        result.map_err(|source| self.write_err(source)).loc("While writing raw line")
    }

    /// Write the contents of a generic iterator. One item = one line.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: Display,
    {
        for item in iter {
            self.write_line(item)?;
        }
        Ok(())
    }

    fn write_err(&self, source: std::io::Error) -> AtomicWriterError {
        AtomicWriterError::Write{path: self.target.clone(), source}
    }

    /// Flush all contents and atomically move them to the target location.
    /// Returns the path of the written file.
    pub fn commit(self) -> Result<PathBuf> {
        let (target, tempfile) = self.stage()?;
        tempfile.persist(&target)
            .map_err(|e| AtomicWriterError::Persist{path: target.clone(), source: e.error})
            .with_loc(|| format!("While committing '{}'", target.display()))?;
        debug!("Committed {}", target.display());
        Ok(target)
    }

    /// Commit a set of writers as a whole: either every target receives its new contents, or every
    /// target is left as it was before the call. Returns the paths of the written files, in order.
    ///
    /// Pre-existing targets are first moved aside, within their own directory. Should any step fail,
    /// freshly committed files are removed and the previous contents are moved back in place.
    pub fn commit_all(writers: impl IntoIterator<Item = Self>) -> Result<Vec<PathBuf>> {
        let staged = writers.into_iter().map(Self::stage).collect::<Result<Vec<_>>>()?;

        let mut backups: Vec<(PathBuf, TempPath)> = Vec::new();
        for (target, _) in &staged {
            if !target.exists() {
                continue
            }
            match set_aside(target) {
                Ok(backup) => backups.push((target.clone(), backup)),
                Err(e) => {
                    rollback(&[], backups);
                    return Err(e)
                }
            }
        }

        let mut committed = Vec::with_capacity(staged.len());
        for (target, tempfile) in staged {
            if let Err(e) = tempfile.persist(&target) {
                rollback(&committed, backups);
                return Err(AtomicWriterError::Persist{path: target.clone(), source: e.error})
                    .with_loc(|| format!("While committing '{}'", target.display()))
            }
            debug!("Committed {}", target.display());
            committed.push(target);
        }
        // Dropping `backups` discards the previous contents.
        Ok(committed)
    }

    /// Flush all contents into the temporary file, and hand it back along with its target.
    fn stage(self) -> Result<(PathBuf, NamedTempFile)> {
        let Self{target, source} = self;
        let tempfile = source.into_inner()
            .map_err(|e| AtomicWriterError::Write{path: target.clone(), source: e.into_error()})
            .with_loc(|| format!("While flushing '{}'", target.display()))?;
        Ok((target, tempfile))
    }
}

/// Create a temporary file within the directory of `target`: `.{name}.XXXXXX{suffix}`
fn sibling_tempfile(target: &Path, suffix: &str) -> std::io::Result<NamedTempFile> {
    let parent = target.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = format!(".{}.", target.file_name().map(|name| name.to_string_lossy()).unwrap_or_default());
    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(suffix)
        .tempfile_in(parent)
}

/// Move an existing `target` to a temporary location next to it. The returned path is removed on drop.
fn set_aside(target: &Path) -> Result<TempPath> {
    let backup_err = |source| AtomicWriterError::Backup{path: target.to_path_buf(), source};
    let loc_msg = || format!("While moving '{}' aside", target.display());
    let backup = sibling_tempfile(target, ".bak").map_err(backup_err).with_loc(loc_msg)?.into_temp_path();
    fs::rename(target, &backup).map_err(backup_err).with_loc(loc_msg)?;
    Ok(backup)
}

/// Undo a partial [`AtomicWriter::commit_all`]. Best effort: failures are logged, not returned.
fn rollback(committed: &[PathBuf], backups: Vec<(PathBuf, TempPath)>) {
    for path in committed {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove partially committed file '{}': {e}", path.display());
        }
    }
    for (target, backup) in backups {
        match fs::rename(&backup, &target) {
            Ok(()) => debug!("Restored {}", target.display()),
            Err(e) => {
                warn!("Failed to restore '{}'. Previous contents were kept in '{}': {e}", target.display(), backup.display());
                // Leave the previous contents on disk.
                let _ = backup.keep();
            }
        }
    }
}
