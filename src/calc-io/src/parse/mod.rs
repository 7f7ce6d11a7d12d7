use std::{fs::{self, File}, io::{BufRead, BufReader}, path::{Path, PathBuf}};

use located_error::LocatedError;

use log::trace;
use anyhow::Result;

mod error;
pub use error::ParseError;

/// Attempt to create the parent directories of a path (if needed) and return an error if it failed.
pub fn create_parent_directory(path: &Path) -> Result<()> {
    use ParseError::CreateParentDirectory;
    let Some(parent_dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(())
    };
    let loc_msg = || format!("While attempting to create output directory '{}'", parent_dir.display());
    fs::create_dir_all(parent_dir).map_err(CreateParentDirectory).with_loc(loc_msg)?;
    Ok(())
}

/// Format the path of an output file: `{output_dir}/{stem}.{ext}`
/// Note that `stem` may already contain dots (e.g. `calc.samples` + `tsv`).
pub fn output_file(output_dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let file = output_dir.join(format!("{stem}.{ext}"));
    trace!("Output file: {}", file.display());
    file
}

/// Check if a given file already exists ; raise an error if such is the case, and the user did not explicitly
/// allow file overwriting.
/// # Errors
/// - If the provided `path` already exists and the user did not specifically allow for file
///   overwrite using the `--overwrite` argument
/// - If the provided `path` exists but is not a regular file (e.g. a directory), regardless of `overwrite`.
pub fn can_write_file(overwrite: bool, path: &Path) -> Result<bool> {
    let loc_msg = "While ensuring that file permissions were appropriate";
    if path.exists() && !path.is_file() {
        return Err(ParseError::NotAFile{path: path.to_path_buf()}).loc(loc_msg)
    }
    if !overwrite && path.exists() {
        return Err(ParseError::OverwriteDisallowed{path: path.to_path_buf()}).loc(loc_msg)
    }
    Ok(true)
}

/// Ensure that writing `output` will not clobber any of `inputs`, even when `--overwrite` is set.
pub fn ensure_distinct_from_inputs(output: &Path, inputs: &[&Path]) -> Result<()> {
    // Canonicalization only succeeds on existing files: a missing output cannot shadow anything.
    let Ok(output_canon) = output.canonicalize() else {
        return Ok(())
    };
    for input in inputs {
        if input.canonicalize().is_ok_and(|input| input == output_canon) {
            return Err(ParseError::OutputShadowsInput{path: output.to_path_buf()})
                .loc("While checking output file paths")
        }
    }
    Ok(())
}

/// Count the number of lines of a file.
pub fn count_lines(path: &Path) -> Result<usize> {
    let count_err = |source| ParseError::CountLines{path: path.to_path_buf(), source};
    let reader = BufReader::new(File::open(path).map_err(count_err).loc("While opening file")?);
    let mut n = 0;
    for line in reader.lines() {
        line.map_err(count_err).loc("While reading file")?;
        n += 1;
    }
    Ok(n)
}
