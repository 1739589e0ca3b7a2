//! Parallels and meridians.
//!
//! Lines are produced in geographic coordinates and clipped to the map
//! extent, so they can be fed through any projection before stroking.

use plot_common::BoundingBox;

/// Which family a graticule line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Constant latitude
    Parallel,
    /// Constant longitude
    Meridian,
}

/// One graticule line as a polyline of (lon, lat) points.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleLine {
    pub kind: LineKind,
    /// Latitude of a parallel or longitude of a meridian
    pub value: f64,
    pub points: Vec<(f64, f64)>,
}

impl GraticuleLine {
    /// Label text in Basemap style ("30°N", "45°W", "0°").
    pub fn label(&self) -> String {
        match self.kind {
            LineKind::Parallel => format_lat(self.value),
            LineKind::Meridian => format_lon(self.value),
        }
    }
}

/// Parallels every 30° from -90 to 90 inclusive.
pub fn default_parallels() -> Vec<f64> {
    (-90..=90).step_by(30).map(f64::from).collect()
}

/// Meridians every 45° from -180 up to (not including) 180.
pub fn default_meridians() -> Vec<f64> {
    (-180..180).step_by(45).map(f64::from).collect()
}

/// Lines of constant latitude across the extent.
///
/// Latitudes outside the extent are skipped.
pub fn parallel_lines(lats: &[f64], extent: &BoundingBox, samples: usize) -> Vec<GraticuleLine> {
    let samples = samples.max(2);
    lats.iter()
        .filter(|&&lat| lat >= extent.min_y && lat <= extent.max_y)
        .map(|&lat| GraticuleLine {
            kind: LineKind::Parallel,
            value: lat,
            points: (0..samples)
                .map(|i| {
                    let t = i as f64 / (samples - 1) as f64;
                    (extent.min_x + t * extent.width(), lat)
                })
                .collect(),
        })
        .collect()
}

/// Lines of constant longitude across the extent.
///
/// Longitudes outside the extent are skipped.
pub fn meridian_lines(lons: &[f64], extent: &BoundingBox, samples: usize) -> Vec<GraticuleLine> {
    let samples = samples.max(2);
    lons.iter()
        .filter(|&&lon| lon >= extent.min_x && lon <= extent.max_x)
        .map(|&lon| GraticuleLine {
            kind: LineKind::Meridian,
            value: lon,
            points: (0..samples)
                .map(|i| {
                    let t = i as f64 / (samples - 1) as f64;
                    (lon, extent.min_y + t * extent.height())
                })
                .collect(),
        })
        .collect()
}

/// Format a latitude label.
pub fn format_lat(lat: f64) -> String {
    let hemi = if lat > 0.0 {
        "N"
    } else if lat < 0.0 {
        "S"
    } else {
        ""
    };
    format!("{}°{}", trim_number(lat.abs()), hemi)
}

/// Format a longitude label. ±180 has no hemisphere.
pub fn format_lon(lon: f64) -> String {
    let hemi = if lon.abs() >= 180.0 || lon == 0.0 {
        ""
    } else if lon > 0.0 {
        "E"
    } else {
        "W"
    };
    format!("{}°{}", trim_number(lon.abs()), hemi)
}

fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}
