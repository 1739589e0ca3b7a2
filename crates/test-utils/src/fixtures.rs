//! Common test fixtures for mpas-plot tests.

/// Shapes of the synthetic lat/lon file.
#[derive(Debug, Clone, Copy)]
pub struct LatLonFixture {
    pub n_times: usize,
    pub n_lats: usize,
    pub n_lons: usize,
    pub n_levels: usize,
}

impl LatLonFixture {
    /// Small 2-time, 2-level global grid (~5° resolution).
    pub const SMALL: LatLonFixture = LatLonFixture {
        n_times: 2,
        n_lats: 37,
        n_lons: 72,
        n_levels: 2,
    };

    pub fn values_per_var(&self) -> usize {
        self.n_times * self.n_lats * self.n_lons * self.n_levels
    }
}

/// Shape of the synthetic MPAS-style mesh.
///
/// Cells are lat/lon quads stored with MPAS topology; the easternmost
/// column wraps through 0°/360° so it exercises dateline handling.
#[derive(Debug, Clone, Copy)]
pub struct MeshFixture {
    pub n_lon: usize,
    pub n_lat: usize,
    pub n_times: usize,
    pub n_levels: usize,
}

impl MeshFixture {
    /// 24 x 12 cells (15° cells), one time, five levels.
    pub const SMALL: MeshFixture = MeshFixture {
        n_lon: 24,
        n_lat: 12,
        n_times: 1,
        n_levels: 5,
    };

    pub fn n_cells(&self) -> usize {
        self.n_lon * self.n_lat
    }

    pub fn n_vertices(&self) -> usize {
        self.n_lon * (self.n_lat + 1)
    }
}
