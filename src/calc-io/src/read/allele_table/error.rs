use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlleleTableError {
    #[error("Failed to read line {line} of the {file} file")]
    Read{file: &'static str, line: usize, #[source] source: std::io::Error},

    #[error("Line {line} of the frequency file carries less than 4 fields: '{content}'")]
    MalformedFrq{line: usize, content: String},

    #[error("The frequency file holds {frq} variant(s), while the P file holds {pfile} row(s)")]
    RowCountMismatch{frq: usize, pfile: usize},
}
