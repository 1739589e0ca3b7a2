//! Geographic polygons tied to mesh cells.

use serde::{Deserialize, Serialize};

/// A closed polygon in (lon, lat) degrees belonging to one mesh cell.
///
/// Several polygons may share a `cell` when a cell straddles the map
/// edge and is drawn on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPolygon {
    pub cell: usize,
    pub vertices: Vec<(f64, f64)>,
}

impl GeoPolygon {
    pub fn new(cell: usize, vertices: Vec<(f64, f64)>) -> Self {
        Self { cell, vertices }
    }

    /// Longitude span of the vertex ring.
    pub fn lon_span(&self) -> f64 {
        let (lo, hi) = self
            .vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(lon, _)| {
                (lo.min(lon), hi.max(lon))
            });
        if lo.is_finite() {
            hi - lo
        } else {
            0.0
        }
    }

    /// Same polygon moved by `dlon` degrees of longitude.
    pub fn shifted(&self, dlon: f64) -> Self {
        Self {
            cell: self.cell,
            vertices: self.vertices.iter().map(|&(lon, lat)| (lon + dlon, lat)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lon_span_and_shift() {
        let poly = GeoPolygon::new(3, vec![(170.0, 0.0), (179.0, 1.0), (175.0, 5.0)]);
        assert_eq!(poly.lon_span(), 9.0);

        let moved = poly.shifted(-360.0);
        assert_eq!(moved.cell, 3);
        assert_eq!(moved.vertices[0], (-190.0, 0.0));
    }

    #[test]
    fn test_empty_polygon_span() {
        assert_eq!(GeoPolygon::new(0, vec![]).lon_span(), 0.0);
    }
}
