//! Error types for NetCDF parsing operations.

use std::path::PathBuf;

use plot_common::PlotError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Input path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Error reported by the netcdf library
    #[error("NetCDF library error: {0}")]
    Library(#[from] netcdf::Error),

    /// Variable missing from the dataset
    #[error("Variable '{name}' not found in {}", .file.display())]
    MissingVariable { name: String, file: PathBuf },

    /// Dimension missing from the dataset
    #[error("Missing dimension: {0}")]
    MissingDimension(String),

    /// Variable shape does not match what the reader expects
    #[error("Unexpected shape for '{name}': expected {expected}, found {found:?}")]
    ShapeMismatch {
        name: String,
        expected: String,
        found: Vec<usize>,
    },

    /// Time or level index outside the variable
    #[error("Index {index} out of range for {axis} of '{name}' (length {len})")]
    IndexOutOfRange {
        name: String,
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<NetCdfError> for PlotError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => PlotError::Io(e),
            NetCdfError::FileNotFound(path) => PlotError::FileNotFound(path),
            NetCdfError::MissingVariable { name, file } => PlotError::VariableNotFound {
                variable: name,
                file,
            },
            NetCdfError::MissingDimension(name) => PlotError::MissingDimension(name),
            NetCdfError::ShapeMismatch {
                name,
                expected,
                found,
            } => PlotError::ShapeMismatch {
                name,
                expected,
                found: format!("{:?}", found),
            },
            NetCdfError::IndexOutOfRange {
                name,
                axis,
                index,
                len,
            } => PlotError::InvalidIndex {
                name: format!("{}:{}", name, axis),
                index,
                len,
            },
            other => PlotError::Render(other.to_string()),
        }
    }
}
