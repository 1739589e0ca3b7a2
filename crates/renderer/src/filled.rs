//! Filled contours on a regular lat/lon grid.
//!
//! Every pixel of the map area is projected back to (lon, lat), the field
//! is bilinearly interpolated there and the value is classified into the
//! band between two consecutive levels. Pixels outside the grid, on NaN
//! data, or outside a non-extended level range are left untouched.

use std::str::FromStr;

use image::RgbaImage;
use plot_common::{Field2D, LatLonGrid};
use projection::CylindricalEquidistant;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::colormap::{Color, Colormap, Normalize};
use crate::error::{RenderError, RenderResult};

/// Which sides of the level range get their own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    #[default]
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub fn extends_min(self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn extends_max(self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }
}

impl FromStr for Extend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neither" => Ok(Extend::Neither),
            "min" => Ok(Extend::Min),
            "max" => Ok(Extend::Max),
            "both" => Ok(Extend::Both),
            other => Err(format!("invalid extend '{}'", other)),
        }
    }
}

/// Levels and colors of a filled contour plot.
#[derive(Debug, Clone)]
pub struct FilledContourConfig {
    levels: Vec<f64>,
    pub extend: Extend,
    pub colormap: Colormap,
    band_colors: Vec<Color>,
}

impl FilledContourConfig {
    /// `levels` must hold at least two strictly increasing values.
    ///
    /// Band `i` covers `[levels[i], levels[i + 1]]` and takes the colormap
    /// color at its midpoint, normalized over the whole level range.
    pub fn new(levels: Vec<f64>, extend: Extend, colormap: Colormap) -> RenderResult<Self> {
        let increasing = levels.windows(2).all(|w| w[0] < w[1]);
        if levels.len() < 2 || !increasing || levels.iter().any(|l| !l.is_finite()) {
            return Err(RenderError::InvalidLevels(levels));
        }

        let norm = Normalize::new(levels[0], levels[levels.len() - 1]);
        let band_colors = levels
            .windows(2)
            .map(|w| colormap.sample(norm.apply(0.5 * (w[0] + w[1]))))
            .collect();

        Ok(Self {
            levels,
            extend,
            colormap,
            band_colors,
        })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// One color per band (`levels.len() - 1`).
    pub fn band_colors(&self) -> &[Color] {
        &self.band_colors
    }

    pub fn norm(&self) -> Normalize {
        Normalize::new(self.levels[0], self.levels[self.levels.len() - 1])
    }

    /// Color below the first level, if that side is extended.
    pub fn under_color(&self) -> Option<Color> {
        self.extend
            .extends_min()
            .then(|| self.colormap.under_color())
    }

    /// Color above the last level, if that side is extended.
    pub fn over_color(&self) -> Option<Color> {
        self.extend
            .extends_max()
            .then(|| self.colormap.over_color())
    }

    /// Color for a data value, or None when it is not drawn.
    pub fn classify(&self, value: f64) -> Option<Color> {
        if value.is_nan() {
            return None;
        }
        let first = self.levels[0];
        let last = self.levels[self.levels.len() - 1];
        if value < first {
            return self.under_color();
        }
        if value > last {
            return self.over_color();
        }

        let band = self
            .levels
            .partition_point(|&l| l <= value)
            .saturating_sub(1)
            .min(self.band_colors.len() - 1);
        Some(self.band_colors[band])
    }
}

/// Fractional index of `value` along a monotonic coordinate axis.
///
/// None when the value lies outside the axis.
pub fn axis_position(axis: &[f64], value: f64) -> Option<f64> {
    if axis.len() < 2 || value.is_nan() {
        return None;
    }
    let descending = axis[0] > axis[axis.len() - 1];
    let (lo, hi) = if descending {
        (axis[axis.len() - 1], axis[0])
    } else {
        (axis[0], axis[axis.len() - 1])
    };
    if value < lo || value > hi {
        return None;
    }

    let upper = if descending {
        axis.partition_point(|&a| a > value)
    } else {
        axis.partition_point(|&a| a < value)
    };
    if upper == 0 {
        return Some(0.0);
    }
    let i = upper.min(axis.len() - 1);
    let (a0, a1) = (axis[i - 1], axis[i]);
    let frac = if a1 == a0 { 0.0 } else { (value - a0) / (a1 - a0) };
    Some((i - 1) as f64 + frac)
}

/// Bilinear interpolation of a field at fractional (row, col).
///
/// NaN when any of the four surrounding values is NaN.
pub fn bilinear(field: &Field2D, row: f64, col: f64) -> f32 {
    let r0 = row.floor().max(0.0) as usize;
    let c0 = col.floor().max(0.0) as usize;
    let r1 = (r0 + 1).min(field.height - 1);
    let c1 = (c0 + 1).min(field.width - 1);
    let dr = (row - r0 as f64) as f32;
    let dc = (col - c0 as f64) as f32;

    let at = |r: usize, c: usize| field.data[r * field.width + c];
    let top = at(r0, c0) * (1.0 - dc) + at(r0, c1) * dc;
    let bottom = at(r1, c0) * (1.0 - dc) + at(r1, c1) * dc;
    top * (1.0 - dr) + bottom * dr
}

/// Paint filled contours of `field` into the map area of `canvas`.
///
/// Returns the number of pixels painted.
pub fn render_filled_contours(
    canvas: &mut RgbaImage,
    grid: &LatLonGrid,
    field: &Field2D,
    proj: &CylindricalEquidistant,
    config: &FilledContourConfig,
) -> RenderResult<usize> {
    if field.width != grid.width()
        || field.height != grid.height()
        || field.data.len() != field.width * field.height
    {
        return Err(RenderError::DataShape {
            width: grid.width(),
            height: grid.height(),
            found: field.data.len(),
        });
    }

    let width = canvas.width() as usize;
    let height = canvas.height() as usize;
    let rect = proj.rect;
    let x0 = rect.x.floor().max(0.0) as usize;
    let x1 = (rect.right().ceil() as usize).min(width);
    let y0 = rect.y.floor().max(0.0) as usize;
    let y1 = (rect.bottom().ceil() as usize).min(height);

    // Column lookups are shared by every row.
    let cols: Vec<Option<f64>> = (x0..x1)
        .map(|px| {
            let (lon, _) = proj.to_geographic(px as f64 + 0.5, rect.y);
            axis_position(&grid.lons, lon)
        })
        .collect();

    let buf: &mut [u8] = canvas;
    let painted: usize = buf
        .par_chunks_mut(width * 4)
        .enumerate()
        .filter(|(py, _)| *py >= y0 && *py < y1)
        .map(|(py, row_px)| {
            let (_, lat) = proj.to_geographic(rect.x, py as f64 + 0.5);
            let Some(row) = axis_position(&grid.lats, lat) else {
                return 0;
            };

            let mut count = 0;
            for (i, col) in cols.iter().enumerate() {
                let Some(col) = *col else { continue };
                let value = bilinear(field, row, col);
                if let Some(color) = config.classify(value as f64) {
                    let px = (x0 + i) * 4;
                    row_px[px..px + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
                    count += 1;
                }
            }
            count
        })
        .sum();

    tracing::debug!(
        levels = config.levels().len(),
        extend = ?config.extend,
        painted,
        "Rendered filled contours"
    );

    Ok(painted)
}
