//! Error types for rendering.

use plot_common::PlotError;
use projection::ProjectionError;
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Embedded font could not be loaded")]
    Font,

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Contour levels must be at least two increasing values, got {0:?}")]
    InvalidLevels(Vec<f64>),

    #[error("Field has {found} values but the grid is {width}x{height}")]
    DataShape {
        width: usize,
        height: usize,
        found: usize,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl From<RenderError> for PlotError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Io(e) => PlotError::Io(e),
            other => PlotError::Render(other.to_string()),
        }
    }
}
