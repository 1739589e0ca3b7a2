//! Wind barb rendering.
//!
//! Barbs are drawn procedurally with tiny-skia paths. A barb is a staff
//! pointing into the wind with flags, full barbs and an optional half
//! barb on its end; calm winds get an empty circle.

use std::f64::consts::PI;
use std::str::FromStr;

use plot_common::{BarbIncrements, Field2D, LatLonGrid};
use projection::CylindricalEquidistant;
use serde::{Deserialize, Serialize};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::colormap::Color;

/// Which point of the barb sits on the grid location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pivot {
    #[default]
    Tip,
    Middle,
}

impl FromStr for Pivot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tip" => Ok(Pivot::Tip),
            "middle" => Ok(Pivot::Middle),
            other => Err(format!("invalid pivot '{}'", other)),
        }
    }
}

/// Configuration for wind barb rendering
#[derive(Debug, Clone)]
pub struct BarbConfig {
    /// Staff length in pixels
    pub length: f32,
    pub increments: BarbIncrements,
    pub pivot: Pivot,
    pub color: Color,
    /// Stroke width in pixels
    pub line_width: f32,
    /// Round speeds to the nearest half increment before counting
    pub rounding: bool,
}

impl Default for BarbConfig {
    fn default() -> Self {
        Self {
            length: 28.0,
            increments: BarbIncrements::default(),
            pivot: Pivot::Tip,
            color: Color::BLACK,
            line_width: 1.0,
            rounding: true,
        }
    }
}

/// Convert U and V wind components (m/s) to speed (m/s) and direction (radians FROM)
///
/// Returns (speed_ms, direction_rad) where:
/// - speed_ms: Wind speed in meters per second
/// - direction_rad: Direction the wind blows from, in math convention
///   (0 = from the east, π/2 = from the north), normalized to [0, 2π)
pub fn uv_to_speed_direction(u: f32, v: f32) -> (f64, f64) {
    let u = u as f64;
    let v = v as f64;

    let speed = (u * u + v * v).sqrt();

    let mut direction = (-v).atan2(-u);
    if direction < 0.0 {
        direction += 2.0 * PI;
    }

    (speed, direction)
}

/// Round to the nearest integer, ties to even.
pub fn round_half_even(x: f64) -> f64 {
    let r = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        r
    }
}

/// What a barb is made of for a given speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarbElements {
    pub flags: u32,
    pub fulls: u32,
    pub half: bool,
    /// Calm: nothing on the staff, drawn as a circle
    pub empty: bool,
}

/// Split a speed into flags, full barbs and a half barb.
///
/// With `rounding`, the speed is first rounded to the nearest multiple of
/// the half increment.
pub fn barb_elements(speed: f64, increments: &BarbIncrements, rounding: bool) -> BarbElements {
    let half = increments.half as f64;
    let full = increments.full as f64;
    let flag = increments.flag as f64;

    let mut mag = speed.abs();
    if rounding && half > 0.0 {
        mag = half * round_half_even(mag / half);
    }

    let flags = if flag > 0.0 { (mag / flag).floor() } else { 0.0 };
    mag -= flags * flag;

    let fulls = if full > 0.0 { (mag / full).floor() } else { 0.0 };
    mag -= fulls * full;

    let half = mag >= half;
    let flags = flags as u32;
    let fulls = fulls as u32;

    BarbElements {
        flags,
        fulls,
        half,
        empty: !(half || flags > 0 || fulls > 0),
    }
}

/// Barb outline in local coordinates: the staff points along +y, barbs
/// extend to +x, and the grid point is the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum BarbShape {
    Calm {
        radius: f32,
    },
    Barb {
        /// Staff from its foot to its end
        staff: [(f32, f32); 2],
        /// Full and half barbs as line segments
        ticks: Vec<[(f32, f32); 2]>,
        /// Filled triangles
        flags: Vec<[(f32, f32); 3]>,
    },
}

/// Lay out the barb for `elements` with a staff of `length`.
pub fn barb_shape(elements: &BarbElements, length: f32, pivot: Pivot) -> BarbShape {
    if elements.empty {
        return BarbShape::Calm {
            radius: length * 0.15,
        };
    }

    let spacing = length * 0.125;
    let full_height = length * 0.4;
    let full_width = length * 0.25;
    let end_y = match pivot {
        Pivot::Tip => 0.0,
        Pivot::Middle => -length / 2.0,
    };

    let mut offset = length;
    let mut flags = Vec::with_capacity(elements.flags as usize);
    let mut ticks = Vec::with_capacity(elements.fulls as usize + 1);

    for i in 0..elements.flags {
        if i > 0 {
            offset += spacing / 2.0;
        }
        flags.push([
            (0.0, end_y + offset),
            (full_height, end_y - full_width / 2.0 + offset),
            (0.0, end_y - full_width + offset),
        ]);
        offset -= full_width + spacing;
    }

    for _ in 0..elements.fulls {
        ticks.push([
            (0.0, end_y + offset),
            (full_height, end_y + offset + full_width / 2.0),
        ]);
        offset -= spacing;
    }

    if elements.half {
        // A lone half barb is set in from the end of the staff
        if elements.flags == 0 && elements.fulls == 0 {
            offset -= 1.5 * spacing;
        }
        ticks.push([
            (0.0, end_y + offset),
            (full_height / 2.0, end_y + offset + full_width / 4.0),
        ]);
    }

    BarbShape::Barb {
        staff: [(0.0, end_y), (0.0, end_y + length)],
        ticks,
        flags,
    }
}

/// A barb to draw at a canvas position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindBarb {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

/// Barbs at every grid point that falls inside the map extent.
///
/// `u` and `v` must share the grid's shape.
pub fn barbs_from_grid(
    grid: &LatLonGrid,
    u: &Field2D,
    v: &Field2D,
    proj: &CylindricalEquidistant,
) -> Vec<WindBarb> {
    let mut barbs = Vec::with_capacity(grid.width() * grid.height());
    for (row, &lat) in grid.lats.iter().enumerate() {
        for (col, &lon) in grid.lons.iter().enumerate() {
            if !proj.contains(lon, lat) {
                continue;
            }
            let (Some(u), Some(v)) = (u.get(row, col), v.get(row, col)) else {
                continue;
            };
            let (x, y) = proj.to_pixel(lon, lat);
            barbs.push(WindBarb {
                x: x as f32,
                y: y as f32,
                u,
                v,
            });
        }
    }
    barbs
}

/// Rotate a local point so +y points into the wind, then place it on the
/// canvas (screen y grows downward).
fn place(point: (f32, f32), cx: f32, cy: f32, sin: f32, cos: f32) -> (f32, f32) {
    let (x, y) = point;
    let rx = x * cos - y * sin;
    let ry = x * sin + y * cos;
    (cx + rx, cy - ry)
}

fn shape_paths(shape: &BarbShape, cx: f32, cy: f32, angle: f64) -> (Option<Path>, Option<Path>) {
    let (sin, cos) = (angle.sin() as f32, angle.cos() as f32);
    match shape {
        BarbShape::Calm { radius } => (PathBuilder::from_circle(cx, cy, *radius), None),
        BarbShape::Barb {
            staff,
            ticks,
            flags,
        } => {
            let mut lines = PathBuilder::new();
            for segment in std::iter::once(staff).chain(ticks.iter()) {
                let (x0, y0) = place(segment[0], cx, cy, sin, cos);
                let (x1, y1) = place(segment[1], cx, cy, sin, cos);
                lines.move_to(x0, y0);
                lines.line_to(x1, y1);
            }

            let mut fills = PathBuilder::new();
            for triangle in flags {
                let (x0, y0) = place(triangle[0], cx, cy, sin, cos);
                fills.move_to(x0, y0);
                for &p in &triangle[1..] {
                    let (x, y) = place(p, cx, cy, sin, cos);
                    fills.line_to(x, y);
                }
                fills.close();
            }

            (lines.finish(), fills.finish())
        }
    }
}

/// Draw wind barbs onto `pixmap`.
///
/// Barbs with NaN components are skipped. Returns the number drawn.
pub fn render_barbs(
    pixmap: &mut Pixmap,
    barbs: &[WindBarb],
    config: &BarbConfig,
    clip: Option<&Mask>,
) -> usize {
    let mut paint = Paint::default();
    paint.set_color(config.color.to_skia());
    paint.anti_alias = true;

    let stroke = Stroke {
        width: config.line_width,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Miter,
        ..Stroke::default()
    };

    let mut drawn = 0;
    let mut calm = 0;
    for barb in barbs {
        if barb.u.is_nan() || barb.v.is_nan() {
            continue;
        }

        let (speed, direction) = uv_to_speed_direction(barb.u, barb.v);
        let elements = barb_elements(speed, &config.increments, config.rounding);
        let shape = barb_shape(&elements, config.length, config.pivot);

        // Local +y is rotated onto the direction the wind comes from
        let (lines, fills) = shape_paths(&shape, barb.x, barb.y, direction - PI / 2.0);
        if let Some(path) = lines {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), clip);
        }
        if let Some(path) = fills {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), clip);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), clip);
        }

        if elements.empty {
            calm += 1;
        }
        drawn += 1;
    }

    tracing::debug!(drawn, calm, skipped = barbs.len() - drawn, "Rendered wind barbs");
    drawn
}
