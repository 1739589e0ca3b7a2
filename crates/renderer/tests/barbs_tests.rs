//! Tests for wind barb rendering module.

use plot_common::{BarbIncrements, Field2D, LatLonGrid};
use projection::{CylindricalEquidistant, PlotRect};
use renderer::barbs::{
    barb_elements, barb_shape, barbs_from_grid, render_barbs, uv_to_speed_direction, BarbConfig,
    BarbElements, BarbShape, Pivot, WindBarb,
};
use std::f64::consts::PI;
use tiny_skia::Pixmap;

const PLOT_LL_INCREMENTS: BarbIncrements = BarbIncrements {
    half: 5.0,
    full: 10.0,
    flag: 20.0,
};

fn elements(flags: u32, fulls: u32, half: bool) -> BarbElements {
    BarbElements {
        flags,
        fulls,
        half,
        empty: !(half || flags > 0 || fulls > 0),
    }
}

// ============================================================================
// uv_to_speed_direction tests
// ============================================================================

#[test]
fn test_uv_speed_calculation_3_4_5() {
    for (u, v) in [(3.0, 4.0), (3.0, -4.0), (-3.0, 4.0), (-3.0, -4.0)] {
        let (speed, _) = uv_to_speed_direction(u, v);
        assert!((speed - 5.0).abs() < 0.01);
    }
}

#[test]
fn test_uv_direction_normalized() {
    for (u, v) in [(10.0, 0.0), (-10.0, 0.0), (0.0, 10.0), (0.0, -10.0), (7.0, -7.0)] {
        let (_, dir) = uv_to_speed_direction(u, v);
        assert!((0.0..2.0 * PI).contains(&dir), "direction {dir} for ({u}, {v})");
    }
}

#[test]
fn test_uv_south_wind_points_down() {
    // Wind from the south (V > 0) comes from -π/2, normalized to 3π/2
    let (_, dir) = uv_to_speed_direction(0.0, 10.0);
    assert!((dir - 1.5 * PI).abs() < 1e-9);
}

// ============================================================================
// barb_elements tests
// ============================================================================

#[test]
fn test_calm_is_empty() {
    assert_eq!(barb_elements(0.0, &PLOT_LL_INCREMENTS, true), elements(0, 0, false));
    assert!(barb_elements(2.4, &PLOT_LL_INCREMENTS, true).empty);
}

#[test]
fn test_rounding_ties_to_even() {
    // 2.5 / 5 = 0.5 rounds to 0, 7.5 / 5 = 1.5 rounds to 2
    assert!(barb_elements(2.5, &PLOT_LL_INCREMENTS, true).empty);
    assert_eq!(barb_elements(7.5, &PLOT_LL_INCREMENTS, true), elements(0, 1, false));
    assert_eq!(barb_elements(12.5, &PLOT_LL_INCREMENTS, true), elements(0, 1, false));
}

#[test]
fn test_half_barb() {
    assert_eq!(barb_elements(2.6, &PLOT_LL_INCREMENTS, true), elements(0, 0, true));
    assert_eq!(barb_elements(7.4, &PLOT_LL_INCREMENTS, true), elements(0, 0, true));
}

#[test]
fn test_flags_fulls_and_half() {
    // 47 rounds to 45 = 2 flags (40) + half (5)
    assert_eq!(barb_elements(47.0, &PLOT_LL_INCREMENTS, true), elements(2, 0, true));
    // 60 with default increments is one flag and one full barb
    assert_eq!(barb_elements(60.0, &BarbIncrements::default(), true), elements(1, 1, false));
}

#[test]
fn test_without_rounding() {
    assert_eq!(barb_elements(7.4, &PLOT_LL_INCREMENTS, false), elements(0, 0, true));
    assert_eq!(barb_elements(4.9, &PLOT_LL_INCREMENTS, false), elements(0, 0, false));
}

// ============================================================================
// barb_shape tests
// ============================================================================

#[test]
fn test_calm_shape_is_circle() {
    let shape = barb_shape(&elements(0, 0, false), 40.0, Pivot::Middle);
    let BarbShape::Calm { radius } = shape else {
        panic!("expected a calm circle");
    };
    assert!((radius - 6.0).abs() < 1e-5);
}

#[test]
fn test_tip_pivot_staff() {
    let BarbShape::Barb { staff, ticks, flags } = barb_shape(&elements(0, 2, false), 40.0, Pivot::Tip)
    else {
        panic!("expected a barb");
    };
    assert_eq!(staff, [(0.0, 0.0), (0.0, 40.0)]);
    assert!(flags.is_empty());
    // Full barbs step down the staff by one spacing (5 px)
    assert_eq!(ticks[0], [(0.0, 40.0), (16.0, 45.0)]);
    assert_eq!(ticks[1], [(0.0, 35.0), (16.0, 40.0)]);
}

#[test]
fn test_flags_are_spaced() {
    let BarbShape::Barb { flags, .. } = barb_shape(&elements(2, 0, false), 40.0, Pivot::Tip) else {
        panic!("expected a barb");
    };
    assert_eq!(flags.len(), 2);
    assert_eq!(flags[0], [(0.0, 40.0), (16.0, 35.0), (0.0, 30.0)]);
    assert_eq!(flags[1][0], (0.0, 27.5));
}

#[test]
fn test_lone_half_barb_is_inset() {
    let BarbShape::Barb { ticks, .. } = barb_shape(&elements(0, 0, true), 40.0, Pivot::Tip) else {
        panic!("expected a barb");
    };
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0][0], (0.0, 32.5));
    assert_eq!(ticks[0][1], (8.0, 35.0));
}

#[test]
fn test_half_after_full_is_not_inset() {
    let BarbShape::Barb { ticks, .. } = barb_shape(&elements(0, 1, true), 40.0, Pivot::Tip) else {
        panic!("expected a barb");
    };
    assert_eq!(ticks[1][0], (0.0, 35.0));
}

// ============================================================================
// rendering tests
// ============================================================================

#[test]
fn test_render_barb_points_into_wind() {
    let mut pixmap = Pixmap::new(100, 100).unwrap();
    let config = BarbConfig {
        length: 30.0,
        ..BarbConfig::default()
    };
    // Wind from the north: staff drawn upward from the grid point
    let barbs = [WindBarb {
        x: 50.5,
        y: 50.0,
        u: 0.0,
        v: -10.0,
    }];

    assert_eq!(render_barbs(&mut pixmap, &barbs, &config, None), 1);
    assert!(pixmap.pixel(50, 35).unwrap().alpha() > 0);
    assert_eq!(pixmap.pixel(50, 70).unwrap().alpha(), 0);
}

#[test]
fn test_render_skips_nan() {
    let mut pixmap = Pixmap::new(50, 50).unwrap();
    let barbs = [WindBarb {
        x: 25.0,
        y: 25.0,
        u: f32::NAN,
        v: 1.0,
    }];
    assert_eq!(render_barbs(&mut pixmap, &barbs, &BarbConfig::default(), None), 0);
    assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
}

#[test]
fn test_barbs_from_grid_projects_points() {
    let grid = LatLonGrid::new(vec![-90.0, 0.0, 90.0], vec![-180.0, 0.0, 180.0]);
    let u = Field2D::new((0..9).map(|i| i as f32).collect(), 3, 3);
    let v = Field2D::new(vec![0.0; 9], 3, 3);
    let proj = CylindricalEquidistant::global(PlotRect::new(0.0, 0.0, 360.0, 180.0)).unwrap();

    let barbs = barbs_from_grid(&grid, &u, &v, &proj);
    assert_eq!(barbs.len(), 9);
    // Row 1, column 1 is (0°, 0°) in the middle of the plot
    assert_eq!(barbs[4], WindBarb { x: 180.0, y: 90.0, u: 4.0, v: 0.0 });
    // First row is the southernmost latitude, at the bottom
    assert_eq!((barbs[0].x, barbs[0].y), (0.0, 180.0));
}
