//! Projection behaviour on a figure-sized canvas.

use plot_common::BoundingBox;
use projection::{
    default_meridians, default_parallels, meridian_lines, parallel_lines, CylindricalEquidistant,
    PlotRect,
};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};

fn figure_map() -> CylindricalEquidistant {
    // Map area inside a 1000x560 figure with axis margins
    CylindricalEquidistant::global(PlotRect::new(70.0, 60.0, 760.0, 380.0)).unwrap()
}

#[test]
fn test_grid_points_round_trip() {
    let proj = figure_map();
    for lat in [-90.0, -45.5, 0.0, 12.25, 89.0] {
        for lon in [-180.0, -97.5, 0.0, 45.0, 179.5] {
            let (px, py) = proj.to_pixel(lon, lat);
            let (glon, glat) = proj.to_geographic(px, py);
            assert_coords_approx_eq!((glon, glat), (lon, lat), 1e-9);
        }
    }
}

#[test]
fn test_uniform_scale_for_global_extent() {
    let (sx, sy) = figure_map().scale();
    assert_approx_eq!(sx, 760.0 / 360.0, 1e-12);
    assert_approx_eq!(sy, 380.0 / 180.0, 1e-12);
    assert_approx_eq!(sx, sy, 1e-12);
}

#[test]
fn test_north_is_up() {
    let proj = figure_map();
    let (_, north) = proj.to_pixel(0.0, 60.0);
    let (_, south) = proj.to_pixel(0.0, -60.0);
    assert!(north < south);
}

#[test]
fn test_graticule_projects_inside_rect() {
    let proj = figure_map();
    let extent = BoundingBox::global();
    let lines = parallel_lines(&default_parallels(), &extent, 10)
        .into_iter()
        .chain(meridian_lines(&default_meridians(), &extent, 10));

    let mut count = 0;
    for line in lines {
        count += 1;
        for &(lon, lat) in &line.points {
            let (px, py) = proj.to_pixel(lon, lat);
            let r = proj.rect;
            let inside = px >= r.x - 1e-6
                && px <= r.right() + 1e-6
                && py >= r.y - 1e-6
                && py <= r.bottom() + 1e-6;
            assert!(inside, "{:?} outside plot", (lon, lat));
        }
    }
    assert_eq!(count, 7 + 8);
}
