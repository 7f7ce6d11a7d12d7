use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordStoreError {
    #[error("Malformed individual record at line {line}: expected at least 3 whitespace-separated fields <id> <sex> <population>, got '{content}'")]
    MalformedRecord{line: usize, content: String},

    #[error("Failed to read line {line} of the individual metadata stream")]
    ReadLine{line: usize, #[source] source: std::io::Error},
}
