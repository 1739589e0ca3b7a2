//! Polygon patches for drawing MPAS cells on a lat/lon map.
//!
//! Every Voronoi cell of the mesh becomes one [`GeoPolygon`] built from its
//! vertex ring. Building the collection touches every cell, so for large
//! meshes it is cached on disk (see [`PatchCache`]) and reused across runs
//! as long as the mesh geometry has not changed.

pub mod builder;
pub mod cache;
pub mod error;

use std::fmt;

use netcdf_parser::MpasMesh;
use plot_common::GeoPolygon;
use serde::{Deserialize, Serialize};

pub use builder::{build_patches, cell_polygons};
pub use cache::{default_cache_name, CacheOutcome, PatchCache};
pub use error::{PatchError, PatchResult};

/// Identity of a mesh's geometry, used to validate cached patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshFingerprint {
    pub n_cells: usize,
    pub n_vertices: usize,
    /// CRC32 over the little-endian bytes of every vertex (lat, lon),
    /// followed by each cell's vertex count and 0-based vertex indices
    pub vertex_crc: u32,
}

impl MeshFingerprint {
    pub fn of(mesh: &MpasMesh) -> Self {
        let mut hasher = crc32fast::Hasher::new();
        for (lat, lon) in mesh.lat_vertex.iter().zip(&mesh.lon_vertex) {
            hasher.update(&lat.to_le_bytes());
            hasher.update(&lon.to_le_bytes());
        }
        for cell in 0..mesh.n_cells {
            let vertices = mesh.cell_vertices(cell);
            hasher.update(&(vertices.len() as u64).to_le_bytes());
            for v in vertices {
                hasher.update(&(v as u64).to_le_bytes());
            }
        }
        Self {
            n_cells: mesh.n_cells,
            n_vertices: mesh.n_vertices,
            vertex_crc: hasher.finalize(),
        }
    }
}

impl fmt::Display for MeshFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nCells={} nVertices={} crc={:08x}",
            self.n_cells, self.n_vertices, self.vertex_crc
        )
    }
}

/// All patches for one mesh.
///
/// `patches` can hold more entries than `n_cells`: cells crossing the
/// dateline are emitted twice, once for each map edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchCollection {
    pub patches: Vec<GeoPolygon>,
    pub n_cells: usize,
    fingerprint: MeshFingerprint,
}

impl PatchCollection {
    pub fn new(patches: Vec<GeoPolygon>, fingerprint: MeshFingerprint) -> Self {
        Self {
            patches,
            n_cells: fingerprint.n_cells,
            fingerprint,
        }
    }

    /// Number of polygons (not cells).
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn fingerprint(&self) -> MeshFingerprint {
        self.fingerprint
    }

    /// Whether this collection was built from `mesh`.
    pub fn matches(&self, mesh: &MpasMesh) -> bool {
        self.fingerprint == MeshFingerprint::of(mesh)
    }
}
