//! Common types shared by the mpas-plot crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod levels;
pub mod polygon;

pub use bbox::BoundingBox;
pub use error::{PlotError, PlotResult};
pub use grid::{downsample_indices, Field2D, LatLonGrid};
pub use levels::{arange, linspace, BarbIncrements};
pub use polygon::GeoPolygon;
