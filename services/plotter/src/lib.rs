//! MPAS plotting pipelines.
//!
//! Two programs share this crate:
//!
//! - `plot-ll`: surface pressure with wind barbs on a regular lat/lon grid
//! - `plot-mpas`: a cell field drawn as mesh polygons
//!
//! Each writes one PNG per plotted time (and level).

pub mod config;
pub mod latlon;
pub mod logging;
pub mod mesh;

use std::path::Path;

use anyhow::Context;
use netcdf_parser::{Dataset, NetCdfError};

/// Printed when the input path is not a file.
pub const FILE_NOT_FOUND_MSG: &str = "That file was not found :(";

/// Printed when `plot-mpas` is asked for a variable the file lacks.
pub const VARIABLE_NOT_FOUND_MSG: &str = "That variable was not found in this mpas mesh!";

/// Exit status for unusable input (`exit(-1)` as seen by the shell).
pub const EXIT_INPUT_ERROR: i32 = 255;

/// Open `path` if it names an existing file.
///
/// Returns `None` when the file is missing so callers can print
/// [`FILE_NOT_FOUND_MSG`] and exit.
pub fn open_input(path: &Path) -> anyhow::Result<Option<Dataset>> {
    match Dataset::open(path) {
        Ok(ds) => Ok(Some(ds)),
        Err(NetCdfError::FileNotFound(_)) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to open {}", path.display())),
    }
}
