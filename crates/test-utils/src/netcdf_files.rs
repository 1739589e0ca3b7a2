//! Writers for synthetic NetCDF inputs.
//!
//! Files are written with the `netcdf` crate in the same layout the
//! plotting programs read, so tests can run without external data.

use std::f64::consts::PI;
use std::path::Path;

use crate::fixtures::{LatLonFixture, MeshFixture};
use crate::generators::{
    coordinate_axis, meridional_wind_ms, surface_pressure_pa, zonal_wind_ms,
};

/// Pressure drop per vertical level (fraction of the surface value).
const LEVEL_DECAY: f32 = 0.1;

/// Write a lat/lon file with `pressure`, `uReconstructZonal` and
/// `uReconstructMeridional` on `[Time, latitude, longitude, nVertLevels]`.
pub fn write_latlon_file(path: &Path, fx: &LatLonFixture) -> Result<(), netcdf::Error> {
    write_latlon_file_inner(path, fx, None)
}

/// Same as [`write_latlon_file`] but leaves out one variable.
pub fn write_latlon_file_without(
    path: &Path,
    fx: &LatLonFixture,
    missing: &str,
) -> Result<(), netcdf::Error> {
    write_latlon_file_inner(path, fx, Some(missing))
}

fn write_latlon_file_inner(
    path: &Path,
    fx: &LatLonFixture,
    missing: Option<&str>,
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("Time", fx.n_times)?;
    file.add_dimension("latitude", fx.n_lats)?;
    file.add_dimension("longitude", fx.n_lons)?;
    file.add_dimension("nVertLevels", fx.n_levels)?;

    let lats = coordinate_axis(-90.0, 90.0, fx.n_lats);
    let lons = coordinate_axis(-180.0, 180.0 - 360.0 / fx.n_lons as f64, fx.n_lons);

    {
        let mut var = file.add_variable::<f64>("latitude", &["latitude"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(&lats, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("longitude", &["longitude"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_values(&lons, ..)?;
    }

    let dims = ["Time", "latitude", "longitude", "nVertLevels"];
    let fields: [(&str, &str, fn(f64, f64) -> f32); 3] = [
        ("pressure", "Pa", surface_pressure_pa),
        ("uReconstructZonal", "m s^-1", zonal_wind_ms),
        ("uReconstructMeridional", "m s^-1", meridional_wind_ms),
    ];

    for (name, units, f) in fields {
        if missing == Some(name) {
            continue;
        }

        let mut data = Vec::with_capacity(fx.values_per_var());
        for t in 0..fx.n_times {
            for &lat in &lats {
                for &lon in &lons {
                    let surface = f(lat, lon) + t as f32;
                    for level in 0..fx.n_levels {
                        data.push(surface * (1.0 - LEVEL_DECAY * level as f32));
                    }
                }
            }
        }

        let mut var = file.add_variable::<f32>(name, &dims)?;
        var.put_attribute("units", units)?;
        var.put_values(&data, ..)?;
    }

    Ok(())
}

/// Write an MPAS-style mesh with `pressure(Time, nCells, nVertLevels)`
/// and `theta(Time, nCells)`.
///
/// Geometry is in radians with longitudes in `[0, 2π)`, connectivity is
/// 1-based and padded with zeros to `maxEdges = 6`.
pub fn write_mesh_file(path: &Path, fx: &MeshFixture) -> Result<(), netcdf::Error> {
    const MAX_EDGES: usize = 6;

    let n_cells = fx.n_cells();
    let n_vertices = fx.n_vertices();
    let dlon = 2.0 * PI / fx.n_lon as f64;
    let dlat = PI / fx.n_lat as f64;

    let mut lat_vertex = Vec::with_capacity(n_vertices);
    let mut lon_vertex = Vec::with_capacity(n_vertices);
    for j in 0..=fx.n_lat {
        for i in 0..fx.n_lon {
            lat_vertex.push(-PI / 2.0 + j as f64 * dlat);
            lon_vertex.push(i as f64 * dlon);
        }
    }

    let vertex = |j: usize, i: usize| (j * fx.n_lon + (i % fx.n_lon) + 1) as i32;

    let mut lat_cell = Vec::with_capacity(n_cells);
    let mut lon_cell = Vec::with_capacity(n_cells);
    let mut vertices_on_cell = Vec::with_capacity(n_cells * MAX_EDGES);
    for j in 0..fx.n_lat {
        for i in 0..fx.n_lon {
            lat_cell.push(-PI / 2.0 + (j as f64 + 0.5) * dlat);
            lon_cell.push((i as f64 + 0.5) * dlon);
            vertices_on_cell.extend_from_slice(&[
                vertex(j, i),
                vertex(j, i + 1),
                vertex(j + 1, i + 1),
                vertex(j + 1, i),
                0,
                0,
            ]);
        }
    }
    let n_edges_on_cell = vec![4i32; n_cells];

    let mut file = netcdf::create(path)?;
    file.add_dimension("Time", fx.n_times)?;
    file.add_dimension("nCells", n_cells)?;
    file.add_dimension("nVertices", n_vertices)?;
    file.add_dimension("maxEdges", MAX_EDGES)?;
    file.add_dimension("nVertLevels", fx.n_levels)?;

    for (name, dim, values) in [
        ("latCell", "nCells", &lat_cell),
        ("lonCell", "nCells", &lon_cell),
        ("latVertex", "nVertices", &lat_vertex),
        ("lonVertex", "nVertices", &lon_vertex),
    ] {
        let mut var = file.add_variable::<f64>(name, &[dim])?;
        var.put_attribute("units", "radians")?;
        var.put_values(values, ..)?;
    }

    {
        let mut var = file.add_variable::<i32>("nEdgesOnCell", &["nCells"])?;
        var.put_values(&n_edges_on_cell, ..)?;
    }
    {
        let mut var = file.add_variable::<i32>("verticesOnCell", &["nCells", "maxEdges"])?;
        var.put_values(&vertices_on_cell, ..)?;
    }

    let mut pressure = Vec::with_capacity(fx.n_times * n_cells * fx.n_levels);
    for t in 0..fx.n_times {
        for c in 0..n_cells {
            let surface = surface_pressure_pa(lat_cell[c].to_degrees(), lon_cell[c].to_degrees());
            for level in 0..fx.n_levels {
                pressure.push((surface + t as f32) * (1.0 - LEVEL_DECAY * level as f32));
            }
        }
    }
    {
        let mut var = file.add_variable::<f32>("pressure", &["Time", "nCells", "nVertLevels"])?;
        var.put_attribute("units", "Pa")?;
        var.put_values(&pressure, ..)?;
    }

    let theta: Vec<f32> = (0..fx.n_times)
        .flat_map(|_| lat_cell.iter().map(|lat| 300.0 - 40.0 * lat.sin().abs() as f32))
        .collect();
    {
        let mut var = file.add_variable::<f32>("theta", &["Time", "nCells"])?;
        var.put_attribute("units", "K")?;
        var.put_values(&theta, ..)?;
    }

    Ok(())
}
