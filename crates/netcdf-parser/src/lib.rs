//! NetCDF readers for MPAS model output.
//!
//! Two layouts are supported:
//!
//! - **Lat/lon files**: MPAS fields interpolated to a regular grid with
//!   `latitude`/`longitude` coordinates (see [`latlon`]).
//! - **Mesh files**: native MPAS output on the unstructured Voronoi mesh,
//!   with cell and vertex geometry (see [`mpas`]).
//!
//! Both are read through the native netcdf library (libnetcdf/HDF5).

pub mod error;
pub mod latlon;
pub mod mpas;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use latlon::{GridVariable, LatLonDataset};
pub use mpas::{CellField, MpasMesh};
pub use native::{silence_hdf5_errors, Dataset, VariableData};
