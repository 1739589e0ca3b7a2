//! Tests for contour line generation and rendering.

use plot_common::{Field2D, LatLonGrid};
use projection::{CylindricalEquidistant, PlotRect};
use renderer::contour::{
    connect_segments, generate_all_contours, generate_contour_levels, march_squares,
    project_contour, render_contour_lines, Contour, ContourConfig, Point,
};
use test_utils::create_constant_grid;
use tiny_skia::Pixmap;

/// Radial bowl: low in the middle, rising outward.
fn bowl(size: usize) -> Vec<f32> {
    let c = (size - 1) as f32 / 2.0;
    let mut data = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - c;
            let dy = y as f32 - c;
            data.push((dx * dx + dy * dy).sqrt());
        }
    }
    data
}

#[test]
fn test_constant_field_has_no_contours() {
    let data = create_constant_grid(10, 10, 3.0);
    assert!(march_squares(&data, 10, 10, 5.0).is_empty());
    assert!(march_squares(&data, 10, 10, 1.0).is_empty());
}

#[test]
fn test_wrong_shape_is_ignored() {
    assert!(march_squares(&[1.0, 2.0, 3.0], 2, 2, 1.5).is_empty());
    assert!(march_squares(&[1.0, 2.0], 2, 1, 1.5).is_empty());
}

#[test]
fn test_nan_cells_are_skipped() {
    let data = vec![0.0, 10.0, f32::NAN, 10.0];
    assert!(march_squares(&data, 2, 2, 5.0).is_empty());
}

#[test]
fn test_vertical_front() {
    // Left half 0, right half 10: the 5 contour is a vertical line at x = 1.5
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&[0.0, 0.0, 10.0, 10.0]);
    }
    let segments = march_squares(&data, 4, 4, 5.0);
    assert_eq!(segments.len(), 3);
    for seg in &segments {
        assert!((seg.start.x - 1.5).abs() < 1e-6);
        assert!((seg.end.x - 1.5).abs() < 1e-6);
    }

    let contours = connect_segments(segments);
    assert_eq!(contours.len(), 1);
    assert!(!contours[0].closed);
    assert_eq!(contours[0].points.len(), 4);
}

#[test]
fn test_bowl_contours_are_closed_rings() {
    let data = bowl(21);
    let config = ContourConfig {
        levels: vec![3.3, 6.2],
        smoothing_passes: 0,
        ..ContourConfig::default()
    };
    let contours = generate_all_contours(&data, 21, 21, &config);
    assert_eq!(contours.len(), 2);
    for contour in &contours {
        assert!(contour.closed, "level {} should close", contour.level);
        let c = 10.0;
        for p in &contour.points {
            let r = ((p.x - c).powi(2) + (p.y - c).powi(2)).sqrt();
            assert!((r - contour.level).abs() < 0.5, "radius {r} for level {}", contour.level);
        }
    }
}

#[test]
fn test_levels_from_pressure_range() {
    let levels = generate_contour_levels(71.3, 99.8, 4.0);
    assert_eq!(levels.first(), Some(&72.0));
    assert_eq!(levels.last(), Some(&96.0));
    assert_eq!(levels.len(), 7);
}

#[test]
fn test_project_contour_uses_grid_coordinates() {
    let grid = LatLonGrid::new(vec![-90.0, 0.0, 90.0], vec![-180.0, 0.0, 180.0]);
    let proj = CylindricalEquidistant::global(PlotRect::new(0.0, 0.0, 360.0, 180.0)).unwrap();
    let contour = Contour {
        level: 1.0,
        points: vec![Point::new(0.0, 0.0), Point::new(1.5, 1.0)],
        closed: false,
    };
    let projected = project_contour(&contour, &grid, &proj);
    assert_eq!(projected.points[0], Point::new(0.0, 180.0));
    // Column 1.5 is 90°E, row 1 is the equator
    assert_eq!(projected.points[1], Point::new(270.0, 90.0));
}

#[test]
fn test_render_contour_lines_with_labels() {
    let size = 41;
    let lats: Vec<f64> = (0..size).map(|i| -60.0 + 3.0 * i as f64).collect();
    let lons: Vec<f64> = (0..size).map(|i| -60.0 + 3.0 * i as f64).collect();
    let grid = LatLonGrid::new(lats, lons);
    let field = Field2D::new(bowl(size), size, size);
    let proj = CylindricalEquidistant::global(PlotRect::new(0.0, 0.0, 720.0, 360.0)).unwrap();

    let config = ContourConfig {
        levels: vec![15.5],
        labels_enabled: true,
        label_spacing: 100.0,
        ..ContourConfig::default()
    };
    let mut pixmap = Pixmap::new(720, 360).unwrap();
    let labels = render_contour_lines(&mut pixmap, &grid, &field, &proj, &config, None);

    assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    assert!(!labels.is_empty());
    for label in &labels {
        assert_eq!(label.text, "15.5");
        assert!((-90.0..=90.0).contains(&label.angle));
    }
}
