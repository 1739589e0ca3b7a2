//! Contour line (isoline) rendering using marching squares algorithm.
//!
//! Contours are traced in grid index space, smoothed, and then mapped
//! through the grid coordinates and map projection onto the canvas.

use plot_common::{Field2D, LatLonGrid};
use projection::CylindricalEquidistant;
use tiny_skia::{LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::colormap::Color;

/// A point in 2D space (grid index or pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Configuration for contour rendering
#[derive(Debug, Clone)]
pub struct ContourConfig {
    /// Contour levels to draw
    pub levels: Vec<f32>,
    /// Line width in pixels
    pub line_width: f32,
    pub line_color: Color,
    /// Number of smoothing passes (0 = no smoothing)
    pub smoothing_passes: u32,
    /// Whether to place labels along contour lines
    pub labels_enabled: bool,
    /// Font size for labels
    pub label_font_size: f32,
    /// Minimum spacing between labels (in pixels)
    pub label_spacing: f32,
    /// Special level styling overrides
    pub special_levels: Vec<SpecialLevelConfig>,
}

/// Special styling for a specific contour level
#[derive(Debug, Clone)]
pub struct SpecialLevelConfig {
    /// The level value (in data units)
    pub level: f32,
    pub line_color: Option<Color>,
    pub line_width: Option<f32>,
    /// Custom label text (overrides numeric value)
    pub label: Option<String>,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![],
            line_width: 1.0,
            line_color: Color::BLACK,
            smoothing_passes: 1,
            labels_enabled: false,
            label_font_size: 10.0,
            label_spacing: 150.0,
            special_levels: vec![],
        }
    }
}

impl ContourConfig {
    fn special(&self, level: f32) -> Option<&SpecialLevelConfig> {
        self.special_levels
            .iter()
            .find(|s| (s.level - level).abs() < 0.01)
    }

    /// Get the color for a specific level, checking special levels first
    pub fn get_level_color(&self, level: f32) -> Color {
        self.special(level)
            .and_then(|s| s.line_color)
            .unwrap_or(self.line_color)
    }

    /// Get the line width for a specific level, checking special levels first
    pub fn get_level_width(&self, level: f32) -> f32 {
        self.special(level)
            .and_then(|s| s.line_width)
            .unwrap_or(self.line_width)
    }

    /// Get the label text for a level
    pub fn get_level_label(&self, level: f32) -> String {
        if let Some(label) = self.special(level).and_then(|s| s.label.clone()) {
            return label;
        }
        if level.fract().abs() < 0.01 {
            format!("{:.0}", level)
        } else {
            format!("{:.1}", level)
        }
    }
}

/// Generate contour levels automatically based on data range and interval
pub fn generate_contour_levels(min_value: f32, max_value: f32, interval: f32) -> Vec<f32> {
    if interval <= 0.0 || max_value <= min_value {
        return vec![];
    }

    // Start from first multiple of interval above min_value
    let start = (min_value / interval).ceil() * interval;
    let count = ((max_value - start) / interval).floor() as i64;
    (0..=count.max(-1))
        .map(|i| start + i as f32 * interval)
        .filter(|&l| l <= max_value)
        .collect()
}

/// Marching squares algorithm to generate contour lines
///
/// Returns segments in grid index coordinates (x = column, y = row).
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            segments.extend(get_cell_segments(
                cell_index, x as f32, y as f32, tl, tr, br, bl, level,
            ));
        }
    }

    segments
}

/// Get line segments for a marching squares cell
#[allow(clippy::too_many_arguments)]
fn get_cell_segments(
    cell_index: u8,
    x: f32,
    y: f32,
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
    level: f32,
) -> Vec<Segment> {
    let top = interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, tl, bl, level);

    let seg = |start, end| Segment { start, end };
    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left, top)],
        2 | 13 => vec![seg(top, right)],
        3 | 12 => vec![seg(left, right)],
        4 | 11 => vec![seg(right, bottom)],
        5 => vec![seg(left, top), seg(right, bottom)],
        6 | 9 => vec![seg(top, bottom)],
        7 | 8 => vec![seg(left, bottom)],
        10 => vec![seg(top, right), seg(left, bottom)],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(x1: f32, y1: f32, x2: f32, y2: f32, val1: f32, val2: f32, level: f32) -> Point {
    if (val2 - val1).abs() < 1e-6 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Connect line segments into continuous polylines
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];
    let epsilon = 0.001;

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }

        let mut points = vec![segments[start_idx].start, segments[start_idx].end];
        used[start_idx] = true;

        let mut changed = true;
        while changed {
            changed = false;
            let current_end = points[points.len() - 1];

            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }
                if distance(seg.start, current_end) < epsilon {
                    points.push(seg.end);
                } else if distance(seg.end, current_end) < epsilon {
                    points.push(seg.start);
                } else {
                    continue;
                }
                used[i] = true;
                changed = true;
                break;
            }
        }

        let closed = distance(points[0], points[points.len() - 1]) < epsilon;
        contours.push(Contour {
            level: 0.0, // set by caller
            points,
            closed,
        });
    }

    contours
}

/// Apply Chaikin's corner cutting algorithm for smoothing
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let mut new_points = Vec::with_capacity(points.len() * 2 + 2);
        if !contour.closed {
            new_points.push(points[0]);
        }

        let pairs = if contour.closed {
            points.len()
        } else {
            points.len() - 1
        };
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % points.len()];
            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }

        if !contour.closed {
            new_points.push(points[points.len() - 1]);
        }
        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Generate all contours for multiple levels
pub fn generate_all_contours(
    data: &[f32],
    width: usize,
    height: usize,
    config: &ContourConfig,
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for &level in &config.levels {
        let mut contours = connect_segments(march_squares(data, width, height, level));
        for contour in &mut contours {
            contour.level = level;
            if config.smoothing_passes > 0 {
                *contour = smooth_contour(contour, config.smoothing_passes);
            }
        }
        all_contours.extend(contours);
    }

    all_contours
}

/// Map a grid-index contour onto canvas pixels.
pub fn project_contour(
    contour: &Contour,
    grid: &LatLonGrid,
    proj: &CylindricalEquidistant,
) -> Contour {
    let points = contour
        .points
        .iter()
        .map(|p| {
            let lon = interpolate_axis(&grid.lons, p.x as f64);
            let lat = interpolate_axis(&grid.lats, p.y as f64);
            let (px, py) = proj.to_pixel(lon, lat);
            Point::new(px as f32, py as f32)
        })
        .collect();

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Coordinate value at a fractional index.
fn interpolate_axis(axis: &[f64], index: f64) -> f64 {
    if axis.is_empty() {
        return f64::NAN;
    }
    let last = axis.len() - 1;
    let i0 = (index.floor().max(0.0) as usize).min(last);
    let i1 = (i0 + 1).min(last);
    let frac = index - i0 as f64;
    axis[i0] + (axis[i1] - axis[i0]) * frac
}

/// Position and text of a contour label, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLabel {
    pub x: f32,
    pub y: f32,
    /// Rotation in degrees, counter-clockwise, kept upright
    pub angle: f32,
    pub text: String,
    pub color: Color,
}

/// Calculate the total length of a contour
fn contour_length(contour: &Contour) -> f32 {
    contour
        .points
        .windows(2)
        .map(|w| distance(w[0], w[1]))
        .sum()
}

/// Collect label positions along a pixel-space contour line
fn collect_label_positions(
    contour: &Contour,
    config: &ContourConfig,
    labels: &mut Vec<ContourLabel>,
    width: f32,
    height: f32,
) {
    let total_length = contour_length(contour);
    if total_length < config.label_spacing * 0.5 {
        return;
    }

    let text = config.get_level_label(contour.level);
    let margin = config.label_font_size * 2.0;
    let num_labels = ((total_length / config.label_spacing).floor() as usize).max(1);
    let spacing = total_length / (num_labels as f32 + 1.0);
    let min_distance = config.label_font_size * 4.0;

    let mut accumulated = 0.0;
    let mut next_label_at = spacing;
    let mut placed = 0;

    for w in contour.points.windows(2) {
        let (p1, p2) = (w[0], w[1]);
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let segment_length = (dx * dx + dy * dy).sqrt();

        while accumulated + segment_length >= next_label_at && placed < num_labels {
            let t = (next_label_at - accumulated) / segment_length.max(f32::EPSILON);
            let x = p1.x + t * dx;
            let y = p1.y + t * dy;

            let inside = x > margin && x < width - margin && y > margin && y < height - margin;
            let crowded = labels
                .iter()
                .any(|l| (l.x - x).powi(2) + (l.y - y).powi(2) < min_distance * min_distance);

            if inside && !crowded {
                // Screen y grows downward, so negate for a counter-clockwise angle
                let mut angle = (-dy).atan2(dx).to_degrees();
                if angle > 90.0 {
                    angle -= 180.0;
                } else if angle < -90.0 {
                    angle += 180.0;
                }
                labels.push(ContourLabel {
                    x,
                    y,
                    angle,
                    text: text.clone(),
                    color: config.get_level_color(contour.level),
                });
            }

            next_label_at += spacing;
            placed += 1;
        }

        accumulated += segment_length;
    }
}

/// Stroke contour lines of `field` onto `pixmap`.
///
/// Returns the label placements; the caller draws the text.
pub fn render_contour_lines(
    pixmap: &mut Pixmap,
    grid: &LatLonGrid,
    field: &Field2D,
    proj: &CylindricalEquidistant,
    config: &ContourConfig,
    clip: Option<&Mask>,
) -> Vec<ContourLabel> {
    let contours = generate_all_contours(&field.data, field.width, field.height, config);

    tracing::debug!(
        num_contours = contours.len(),
        total_points = contours.iter().map(|c| c.points.len()).sum::<usize>(),
        "Generated contours"
    );

    let (width, height) = (pixmap.width() as f32, pixmap.height() as f32);
    let mut labels = Vec::new();

    for contour in &contours {
        if contour.points.len() < 2 {
            continue;
        }
        let projected = project_contour(contour, grid, proj);

        let color = config.get_level_color(contour.level);
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: config.get_level_width(contour.level),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let mut pb = PathBuilder::new();
        pb.move_to(projected.points[0].x, projected.points[0].y);
        for point in &projected.points[1..] {
            pb.line_to(point.x, point.y);
        }
        if projected.closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), clip);
        }

        if config.labels_enabled {
            collect_label_positions(&projected, config, &mut labels, width, height);
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_contour_levels() {
        let levels = generate_contour_levels(0.0, 20.0, 5.0);
        assert_eq!(levels, vec![0.0, 5.0, 10.0, 15.0, 20.0]);

        let levels = generate_contour_levels(2.0, 18.0, 5.0);
        assert_eq!(levels, vec![5.0, 10.0, 15.0]);

        assert!(generate_contour_levels(5.0, 5.0, 1.0).is_empty());
    }

    #[test]
    fn test_interpolate_edge() {
        let p = interpolate_edge(0.0, 0.0, 1.0, 0.0, 0.0, 10.0, 5.0);
        assert!((p.x - 0.5).abs() < 0.01);
        assert!((p.y - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_march_squares_flat() {
        let data = vec![5.0; 9];
        // Every corner is >= level, so no cell is crossed
        assert!(march_squares(&data, 3, 3, 5.0).is_empty());
    }

    #[test]
    fn test_peak_gives_closed_ring() {
        #[rustfmt::skip]
        let data = vec![
            0.0, 0.0, 0.0,
            0.0, 10.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let segments = march_squares(&data, 3, 3, 5.0);
        assert_eq!(segments.len(), 4);

        let contours = connect_segments(segments);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
    }

    #[test]
    fn test_smoothing_keeps_open_endpoints() {
        let contour = Contour {
            level: 1.0,
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
            closed: false,
        };
        let smooth = smooth_contour(&contour, 2);
        assert_eq!(smooth.points[0], Point::new(0.0, 0.0));
        assert_eq!(*smooth.points.last().unwrap(), Point::new(2.0, 0.0));
        assert!(smooth.points.len() > contour.points.len());
    }

    #[test]
    fn test_interpolate_axis() {
        let lons = [-180.0, -175.0, -170.0];
        assert_eq!(interpolate_axis(&lons, 0.5), -177.5);
        assert_eq!(interpolate_axis(&lons, 2.0), -170.0);
    }

    #[test]
    fn test_level_overrides() {
        let config = ContourConfig {
            special_levels: vec![SpecialLevelConfig {
                level: 100.0,
                line_color: Some(Color::rgb(255, 0, 0)),
                line_width: Some(3.0),
                label: Some("1000 hPa".to_string()),
            }],
            ..ContourConfig::default()
        };
        assert_eq!(config.get_level_color(100.0), Color::rgb(255, 0, 0));
        assert_eq!(config.get_level_width(100.0), 3.0);
        assert_eq!(config.get_level_label(100.0), "1000 hPa");
        assert_eq!(config.get_level_color(98.0), Color::BLACK);
        assert_eq!(config.get_level_label(97.5), "97.5");
    }
}
