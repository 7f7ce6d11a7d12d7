use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectorError {
    #[error("Malformed record at line {line}: expected at least 2 whitespace-separated fields, with the individual id in second position. Got '{content}'")]
    MalformedRecord{line: usize, content: String},

    #[error("Sampled individual '{id}' belongs to population '{population}', which is not assigned to any component")]
    UnresolvedLabel{id: String, population: String},

    #[error("Failed to read line {line} of the record stream")]
    ReadLine{line: usize, #[source] source: std::io::Error},
}
