//! Map projections for static plots.
//!
//! Only the plate carrée ("cyl") projection is needed: longitude and
//! latitude map linearly onto pixel columns and rows.

pub mod cylindrical;
pub mod graticule;

pub use cylindrical::{normalize_lon, CylindricalEquidistant, PlotRect, ProjectionError};
pub use graticule::{
    default_meridians, default_parallels, format_lat, format_lon, meridian_lines, parallel_lines,
    GraticuleLine, LineKind,
};
