//! Static map rendering for meteorological fields.
//!
//! Implements the plot elements:
//! - Filled contours on lat/lon grids
//! - Contour lines (marching squares)
//! - Wind barbs
//! - Mesh cell patches
//! - Colorbars, graticule labels and titles
//!
//! `Figure` ties them together and writes PNG files.

pub mod barbs;
pub mod colorbar;
pub mod colormap;
pub mod contour;
pub mod error;
pub mod figure;
pub mod filled;
pub mod patches;
pub mod png;
pub mod text;

pub use barbs::{barb_elements, barbs_from_grid, BarbConfig, BarbElements, Pivot, WindBarb};
pub use colorbar::{nice_ticks, Colorbar};
pub use colormap::{Color, Colormap, Normalize};
pub use contour::{ContourConfig, SpecialLevelConfig};
pub use error::{RenderError, RenderResult};
pub use figure::{Figure, FigureLayout, GraticuleStyle};
pub use filled::{Extend, FilledContourConfig};
