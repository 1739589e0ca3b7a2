//! Regular latitude/longitude datasets.
//!
//! The files hold MPAS output interpolated to a regular grid:
//!
//! ```text
//! dimensions: Time, latitude, longitude, nVertLevels
//! latitude(latitude), longitude(longitude)
//! pressure(Time, latitude, longitude, nVertLevels)
//! uReconstructZonal(Time, latitude, longitude, nVertLevels)
//! uReconstructMeridional(Time, latitude, longitude, nVertLevels)
//! ```

use plot_common::{Field2D, LatLonGrid};
use tracing::info;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{Dataset, VariableData};

pub const TIME_DIM: &str = "Time";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const PRESSURE: &str = "pressure";
pub const ZONAL_WIND: &str = "uReconstructZonal";
pub const MERIDIONAL_WIND: &str = "uReconstructMeridional";

/// A 4-D `[time, lat, lon, level]` variable held in memory.
#[derive(Debug, Clone)]
pub struct GridVariable {
    pub name: String,
    pub units: Option<String>,
    data: Vec<f32>,
    shape: [usize; 4],
}

impl GridVariable {
    fn from_data(var: VariableData, n_lat: usize, n_lon: usize) -> NetCdfResult<Self> {
        let shape: [usize; 4] = match *var.shape.as_slice() {
            [t, y, x, l] if y == n_lat && x == n_lon => [t, y, x, l],
            _ => {
                return Err(NetCdfError::ShapeMismatch {
                    name: var.name.clone(),
                    expected: format!("[Time, {}, {}, nVertLevels]", n_lat, n_lon),
                    found: var.shape.clone(),
                })
            }
        };

        Ok(Self {
            name: var.name,
            units: var.units,
            data: var.data,
            shape,
        })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn n_levels(&self) -> usize {
        self.shape[3]
    }

    /// The horizontal field at one time and vertical level.
    pub fn slice(&self, time: usize, level: usize) -> NetCdfResult<Field2D> {
        let [nt, ny, nx, nl] = self.shape;
        self.check_index("Time", time, nt)?;
        self.check_index("level", level, nl)?;

        let mut data = Vec::with_capacity(ny * nx);
        let base = time * ny * nx * nl;
        for row in 0..ny {
            for col in 0..nx {
                data.push(self.data[base + (row * nx + col) * nl + level]);
            }
        }

        Ok(Field2D::new(data, nx, ny))
    }

    fn check_index(&self, axis: &'static str, index: usize, len: usize) -> NetCdfResult<()> {
        if index >= len {
            return Err(NetCdfError::IndexOutOfRange {
                name: self.name.clone(),
                axis,
                index,
                len,
            });
        }
        Ok(())
    }
}

/// Pressure and wind on a regular lat/lon grid.
#[derive(Debug, Clone)]
pub struct LatLonDataset {
    pub grid: LatLonGrid,
    pub n_times: usize,
    pub pressure: GridVariable,
    pub zonal_wind: GridVariable,
    pub meridional_wind: GridVariable,
}

impl LatLonDataset {
    /// Read coordinates and the three plotted variables.
    pub fn from_dataset(ds: &Dataset) -> NetCdfResult<Self> {
        let n_times = ds.dimension_len(TIME_DIM)?;

        let lats = ds.read_coordinate(LATITUDE)?;
        let lons = ds.read_coordinate(LONGITUDE)?;
        let grid = LatLonGrid::new(lats, lons);

        let read = |name: &str| -> NetCdfResult<GridVariable> {
            GridVariable::from_data(ds.read_variable(name)?, grid.height(), grid.width())
        };

        let pressure = read(PRESSURE)?;
        let zonal_wind = read(ZONAL_WIND)?;
        let meridional_wind = read(MERIDIONAL_WIND)?;

        for var in [&pressure, &zonal_wind, &meridional_wind] {
            if var.shape()[0] != n_times {
                return Err(NetCdfError::ShapeMismatch {
                    name: var.name.clone(),
                    expected: format!("{} times", n_times),
                    found: var.shape().to_vec(),
                });
            }
        }

        info!(
            lats = grid.height(),
            lons = grid.width(),
            times = n_times,
            pressure = ?pressure.shape(),
            zonal = ?zonal_wind.shape(),
            meridional = ?meridional_wind.shape(),
            "Loaded lat/lon dataset"
        );

        Ok(Self {
            grid,
            n_times,
            pressure,
            zonal_wind,
            meridional_wind,
        })
    }
}
