//! Error types shared across the plotting pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PlotError.
pub type PlotResult<T> = Result<T, PlotError>;

/// Primary error type for plotting operations.
#[derive(Debug, Error)]
pub enum PlotError {
    // === Input Errors ===
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Variable '{variable}' not found in {}", .file.display())]
    VariableNotFound { variable: String, file: PathBuf },

    #[error("Missing dimension: {0}")]
    MissingDimension(String),

    #[error("Shape mismatch for '{name}': expected {expected}, found {found}")]
    ShapeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Index out of range for '{name}': {index} >= {len}")]
    InvalidIndex {
        name: String,
        index: usize,
        len: usize,
    },

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlotError {
    /// Whether the error comes from the inputs the user pointed us at,
    /// as opposed to a failure while drawing or writing.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PlotError::FileNotFound(_)
                | PlotError::VariableNotFound { .. }
                | PlotError::MissingDimension(_)
                | PlotError::ShapeMismatch { .. }
                | PlotError::InvalidIndex { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlotError::VariableNotFound {
            variable: "theta".to_string(),
            file: PathBuf::from("mesh.nc"),
        };
        assert_eq!(err.to_string(), "Variable 'theta' not found in mesh.nc");

        let err = PlotError::InvalidIndex {
            name: "level".to_string(),
            index: 7,
            len: 5,
        };
        assert_eq!(err.to_string(), "Index out of range for 'level': 7 >= 5");
    }

    #[test]
    fn test_is_input_error() {
        assert!(PlotError::FileNotFound(PathBuf::from("x.nc")).is_input_error());
        assert!(PlotError::MissingDimension("Time".into()).is_input_error());
        assert!(!PlotError::Render("boom".into()).is_input_error());
    }
}
