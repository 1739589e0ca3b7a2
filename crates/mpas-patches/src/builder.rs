//! Cell polygon construction.

use netcdf_parser::MpasMesh;
use plot_common::GeoPolygon;
use projection::normalize_lon;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{MeshFingerprint, PatchCollection};

/// Cells wider than this in longitude are assumed to wrap the dateline.
const WRAP_SPAN_DEG: f64 = 180.0;

/// Build one polygon per mesh cell.
///
/// Cells with fewer than three usable vertices produce no polygon.
pub fn build_patches(mesh: &MpasMesh) -> PatchCollection {
    let patches: Vec<GeoPolygon> = (0..mesh.n_cells)
        .into_par_iter()
        .flat_map_iter(|cell| {
            let ring: Vec<(f64, f64)> = mesh
                .cell_vertices(cell)
                .into_iter()
                .map(|v| mesh.vertex_position(v))
                .collect();
            cell_polygons(cell, &ring)
        })
        .collect();

    let wrapped = patches.len().saturating_sub(mesh.n_cells);
    info!(
        cells = mesh.n_cells,
        patches = patches.len(),
        "Built MPAS patch collection"
    );
    if wrapped > 0 {
        debug!(duplicates = wrapped, "Dateline cells drawn on both map edges");
    }

    PatchCollection::new(patches, MeshFingerprint::of(mesh))
}

/// Polygons for one cell given its vertex ring as (lon, lat) degrees.
///
/// Longitudes are wrapped into `[-180, 180)`. A ring spanning more than
/// 180° either winds around a pole or crosses the dateline:
///
/// - a pole cell becomes a cap closed along the pole and extended one
///   vertex past each map edge
/// - a dateline cell has its western longitudes moved east by 360° to make
///   the ring contiguous, and a copy shifted by -360° covers the western
///   map edge
pub fn cell_polygons(cell: usize, ring: &[(f64, f64)]) -> Vec<GeoPolygon> {
    if ring.len() < 3 {
        return Vec::new();
    }

    let poly = GeoPolygon::new(
        cell,
        ring.iter()
            .map(|&(lon, lat)| (normalize_lon(lon), lat))
            .collect(),
    );
    if poly.lon_span() <= WRAP_SPAN_DEG {
        return vec![poly];
    }
    if let Some(pole) = enclosed_pole(&poly.vertices) {
        return vec![polar_cap(cell, &poly.vertices, pole)];
    }

    let unwrapped = GeoPolygon::new(
        cell,
        poly.vertices
            .iter()
            .map(|&(lon, lat)| if lon < 0.0 { (lon + 360.0, lat) } else { (lon, lat) })
            .collect(),
    );
    let west = unwrapped.shifted(-360.0);
    vec![unwrapped, west]
}

/// Latitude of the pole a ring winds around, if any.
///
/// Summing the wrapped longitude steps around the ring gives ±360° for a
/// ring enclosing a pole and 0° otherwise.
fn enclosed_pole(ring: &[(f64, f64)]) -> Option<f64> {
    let n = ring.len();
    let winding: f64 = (0..n)
        .map(|i| normalize_lon(ring[(i + 1) % n].0 - ring[i].0))
        .sum();
    if winding.abs() < 180.0 {
        return None;
    }
    let mean_lat = ring.iter().map(|v| v.1).sum::<f64>() / n as f64;
    Some(if mean_lat >= 0.0 { 90.0 } else { -90.0 })
}

/// Ring around a pole unrolled into a band from `pole` to the cell edge.
fn polar_cap(cell: usize, ring: &[(f64, f64)], pole: f64) -> GeoPolygon {
    let mut sorted = ring.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    let mut vertices = Vec::with_capacity(sorted.len() + 4);
    vertices.push((last.0 - 360.0, last.1));
    vertices.extend(sorted);
    vertices.push((first.0 + 360.0, first.1));
    vertices.push((first.0 + 360.0, pole));
    vertices.push((last.0 - 360.0, pole));
    GeoPolygon::new(cell, vertices)
}
