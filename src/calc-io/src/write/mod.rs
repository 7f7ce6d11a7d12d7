mod atomic_writer;
pub use atomic_writer::{AtomicWriter, AtomicWriterError};

mod params;
pub use params::{ConvertfParams, CalcParams};
