//! MPAS unstructured mesh files.
//!
//! Mesh geometry uses radians and 1-based connectivity:
//!
//! ```text
//! latCell(nCells), lonCell(nCells)
//! latVertex(nVertices), lonVertex(nVertices)
//! nEdgesOnCell(nCells)
//! verticesOnCell(nCells, maxEdges)   -- 0 marks unused slots
//! <field>(Time, nCells, nVertLevels)
//! ```

use tracing::info;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::Dataset;

/// Cell/vertex geometry of an MPAS mesh, in degrees.
#[derive(Debug, Clone)]
pub struct MpasMesh {
    pub n_cells: usize,
    pub n_vertices: usize,
    pub max_edges: usize,
    pub lat_cell: Vec<f64>,
    pub lon_cell: Vec<f64>,
    pub lat_vertex: Vec<f64>,
    pub lon_vertex: Vec<f64>,
    pub n_edges_on_cell: Vec<usize>,
    /// Row-major `[nCells, maxEdges]`, 1-based, 0 = unused
    vertices_on_cell: Vec<i32>,
}

impl MpasMesh {
    pub fn from_dataset(ds: &Dataset) -> NetCdfResult<Self> {
        let n_cells = ds.dimension_len("nCells")?;
        let n_vertices = ds.dimension_len("nVertices")?;
        let max_edges = ds.dimension_len("maxEdges")?;

        let degrees = |name: &str, len: usize| -> NetCdfResult<Vec<f64>> {
            let values = ds.read_coordinate(name)?;
            if values.len() != len {
                return Err(NetCdfError::ShapeMismatch {
                    name: name.to_string(),
                    expected: format!("[{}]", len),
                    found: vec![values.len()],
                });
            }
            Ok(values.into_iter().map(f64::to_degrees).collect())
        };

        let lat_cell = degrees("latCell", n_cells)?;
        let lon_cell = degrees("lonCell", n_cells)?;
        let lat_vertex = degrees("latVertex", n_vertices)?;
        let lon_vertex = degrees("lonVertex", n_vertices)?;

        let (n_edges, shape) = ds.read_i32("nEdgesOnCell")?;
        if shape != [n_cells] {
            return Err(NetCdfError::ShapeMismatch {
                name: "nEdgesOnCell".to_string(),
                expected: format!("[{}]", n_cells),
                found: shape,
            });
        }
        let n_edges_on_cell: Vec<usize> = n_edges
            .into_iter()
            .map(|n| (n.max(0) as usize).min(max_edges))
            .collect();

        let (vertices_on_cell, shape) = ds.read_i32("verticesOnCell")?;
        if shape != [n_cells, max_edges] {
            return Err(NetCdfError::ShapeMismatch {
                name: "verticesOnCell".to_string(),
                expected: format!("[{}, {}]", n_cells, max_edges),
                found: shape,
            });
        }

        info!(
            cells = n_cells,
            vertices = n_vertices,
            max_edges = max_edges,
            "Loaded MPAS mesh"
        );

        Ok(Self {
            n_cells,
            n_vertices,
            max_edges,
            lat_cell,
            lon_cell,
            lat_vertex,
            lon_vertex,
            n_edges_on_cell,
            vertices_on_cell,
        })
    }

    /// 0-based vertex indices around `cell`, in mesh order.
    ///
    /// Slots that are unused or point outside the vertex arrays are dropped.
    pub fn cell_vertices(&self, cell: usize) -> Vec<usize> {
        let n = self.n_edges_on_cell[cell];
        let row = &self.vertices_on_cell[cell * self.max_edges..cell * self.max_edges + n];
        row.iter()
            .filter(|&&v| v >= 1 && (v as usize) <= self.n_vertices)
            .map(|&v| v as usize - 1)
            .collect()
    }

    /// (lon, lat) in degrees of a vertex.
    pub fn vertex_position(&self, vertex: usize) -> (f64, f64) {
        (self.lon_vertex[vertex], self.lat_vertex[vertex])
    }
}

/// A cell-centred field `[Time, nCells, nVertLevels]` held in memory.
#[derive(Debug, Clone)]
pub struct CellField {
    pub name: String,
    pub units: Option<String>,
    pub n_times: usize,
    pub n_cells: usize,
    pub n_levels: usize,
    data: Vec<f32>,
}

impl CellField {
    /// Read a cell field. Rank-2 `[Time, nCells]` variables are treated as
    /// having a single level.
    pub fn read(ds: &Dataset, name: &str) -> NetCdfResult<Self> {
        let var = ds.read_variable(name)?;
        let (n_times, n_cells, n_levels) = match *var.shape.as_slice() {
            [t, c, l] => (t, c, l),
            [t, c] => (t, c, 1),
            _ => {
                return Err(NetCdfError::ShapeMismatch {
                    name: name.to_string(),
                    expected: "[Time, nCells, nVertLevels]".to_string(),
                    found: var.shape.clone(),
                })
            }
        };

        Ok(Self {
            name: var.name,
            units: var.units,
            n_times,
            n_cells,
            n_levels,
            data: var.data,
        })
    }

    /// Values of every cell at one time and level (`var[t, :, l]`).
    pub fn slice(&self, time: usize, level: usize) -> NetCdfResult<Vec<f32>> {
        if time >= self.n_times {
            return Err(self.out_of_range("Time", time, self.n_times));
        }
        if level >= self.n_levels {
            return Err(self.out_of_range("level", level, self.n_levels));
        }

        let base = time * self.n_cells * self.n_levels;
        Ok((0..self.n_cells)
            .map(|cell| self.data[base + cell * self.n_levels + level])
            .collect())
    }

    fn out_of_range(&self, axis: &'static str, index: usize, len: usize) -> NetCdfError {
        NetCdfError::IndexOutOfRange {
            name: self.name.clone(),
            axis,
            index,
            len,
        }
    }
}
