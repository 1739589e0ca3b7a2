//! Cylindrical equidistant (plate carrée) projection.
//!
//! This is Basemap's `cyl` projection: x is longitude, y is latitude,
//! both in degrees. Mapping to the image is a scale and offset into the
//! pixel rectangle reserved for the map, with north at the top.

use plot_common::BoundingBox;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("Map extent has no area: {0:?}")]
    EmptyExtent(BoundingBox),

    #[error("Plot area has no size: {width}x{height}")]
    EmptyPlotArea { width: f64, height: f64 },
}

/// Pixel rectangle on the canvas that the map occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// Cylindrical equidistant projection onto a pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylindricalEquidistant {
    /// Lower-left / upper-right corners in degrees
    pub extent: BoundingBox,
    /// Target area on the canvas
    pub rect: PlotRect,
}

impl CylindricalEquidistant {
    pub fn new(extent: BoundingBox, rect: PlotRect) -> Result<Self, ProjectionError> {
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return Err(ProjectionError::EmptyExtent(extent));
        }
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(ProjectionError::EmptyPlotArea {
                width: rect.width,
                height: rect.height,
            });
        }
        Ok(Self { extent, rect })
    }

    /// The whole globe (llcrnrlon=-180, llcrnrlat=-90, urcrnrlon=180, urcrnrlat=90).
    pub fn global(rect: PlotRect) -> Result<Self, ProjectionError> {
        Self::new(BoundingBox::global(), rect)
    }

    /// Pixels per degree along x and y.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.rect.width / self.extent.width(),
            self.rect.height / self.extent.height(),
        )
    }

    /// Geographic (lon, lat) to canvas pixel (x, y).
    ///
    /// Longitudes are not wrapped, so points outside the extent land
    /// outside the plot rectangle.
    pub fn to_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (
            self.rect.x + (lon - self.extent.min_x) * sx,
            self.rect.y + (self.extent.max_y - lat) * sy,
        )
    }

    /// Canvas pixel (x, y) to geographic (lon, lat).
    pub fn to_geographic(&self, px: f64, py: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (
            self.extent.min_x + (px - self.rect.x) / sx,
            self.extent.max_y - (py - self.rect.y) / sy,
        )
    }

    /// Whether a geographic point falls inside the map extent.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.extent.contains_point(lon, lat)
    }
}

/// Wrap a longitude into `[-180, 180)`.
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
