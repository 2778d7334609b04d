use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Data file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Required column '{}' is missing from {}", .0, .1.display())]
    MissingColumn(String, PathBuf),

    #[error("I/O error on {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("CSV error on {}: {}", .0.display(), .1)]
    Csv(PathBuf, #[source] csv::Error),
}
