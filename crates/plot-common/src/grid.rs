//! Regular latitude/longitude grids and 2-D fields on them.

use serde::{Deserialize, Serialize};

/// Coordinates of a regular lat/lon grid.
///
/// Rows follow `lats`, columns follow `lons`, matching the
/// `[latitude, longitude]` ordering of the source variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLonGrid {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl LatLonGrid {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Self {
        Self { lats, lons }
    }

    /// Number of columns (longitudes).
    pub fn width(&self) -> usize {
        self.lons.len()
    }

    /// Number of rows (latitudes).
    pub fn height(&self) -> usize {
        self.lats.len()
    }

    /// Broadcast the 1-D coordinates into row-major 2-D coordinate arrays.
    ///
    /// Returns `(x, y)` where `x[r * nx + c] = lons[c]` and
    /// `y[r * nx + c] = lats[r]`.
    pub fn meshgrid(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.width() * self.height();
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for &lat in &self.lats {
            for &lon in &self.lons {
                x.push(lon);
                y.push(lat);
            }
        }
        (x, y)
    }

    /// Keep every `stride`th latitude and longitude.
    pub fn downsampled(&self, stride: usize) -> Self {
        Self {
            lats: downsample_indices(self.lats.len(), stride)
                .map(|i| self.lats[i])
                .collect(),
            lons: downsample_indices(self.lons.len(), stride)
                .map(|i| self.lons[i])
                .collect(),
        }
    }
}

/// Indices `0, stride, 2 * stride, ...` below `len`.
///
/// A stride of zero is treated as one.
pub fn downsample_indices(len: usize, stride: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by(stride.max(1))
}

/// A scalar field on a regular grid, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Field2D {
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Value at (row, col), or None when outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Minimum and maximum, ignoring NaN. None when every value is NaN.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        min_max(&self.data)
    }

    /// Multiply every value by `factor` (e.g. 1/1000 for Pa to kPa).
    pub fn scaled(mut self, factor: f32) -> Self {
        for v in &mut self.data {
            *v *= factor;
        }
        self
    }

    /// Keep every `stride`th row and column, starting at the first.
    pub fn downsample(&self, stride: usize) -> Self {
        let rows: Vec<usize> = downsample_indices(self.height, stride).collect();
        let cols: Vec<usize> = downsample_indices(self.width, stride).collect();

        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &r in &rows {
            let row = &self.data[r * self.width..(r + 1) * self.width];
            data.extend(cols.iter().map(|&c| row[c]));
        }

        Self {
            data,
            width: cols.len(),
            height: rows.len(),
        }
    }
}

/// Minimum and maximum of a slice, ignoring NaN.
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meshgrid_layout() {
        let grid = LatLonGrid::new(vec![-10.0, 0.0, 10.0], vec![100.0, 110.0]);
        let (x, y) = grid.meshgrid();
        assert_eq!(x, vec![100.0, 110.0, 100.0, 110.0, 100.0, 110.0]);
        assert_eq!(y, vec![-10.0, -10.0, 0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_downsample_like_slice_step() {
        // 5x4 grid, values = row * 10 + col
        let data: Vec<f32> = (0..4)
            .flat_map(|r| (0..5).map(move |c| (r * 10 + c) as f32))
            .collect();
        let field = Field2D::new(data, 5, 4);

        let ds = field.downsample(2);
        assert_eq!(ds.width, 3);
        assert_eq!(ds.height, 2);
        assert_eq!(ds.data, vec![0.0, 2.0, 4.0, 20.0, 22.0, 24.0]);
    }

    #[test]
    fn test_downsample_zero_stride_is_identity() {
        let field = Field2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(field.downsample(0), field);
    }

    #[test]
    fn test_min_max_skips_nan() {
        assert_eq!(min_max(&[f32::NAN, 3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[f32::NAN]), None);
    }
}
