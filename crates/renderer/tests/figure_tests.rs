//! End-to-end figure composition tests.

use image::Rgba;
use plot_common::{arange, linspace, BarbIncrements, BoundingBox, Field2D, GeoPolygon, LatLonGrid};
use renderer::{
    barbs_from_grid, BarbConfig, Color, Colorbar, Colormap, Extend, Figure, FigureLayout,
    FilledContourConfig, GraticuleStyle, Normalize, Pivot,
};
use test_utils::{
    coordinate_axis, meridional_wind_ms, sample_grid, surface_pressure_pa, temp_test_dir,
    zonal_wind_ms,
};

fn latlon_grid() -> LatLonGrid {
    let lats = coordinate_axis(-90.0, 90.0, 37);
    let lons: Vec<f64> = (0..72).map(|i| -180.0 + 5.0 * i as f64).collect();
    LatLonGrid::new(lats, lons)
}

fn field(grid: &LatLonGrid, f: impl Fn(f64, f64) -> f32) -> Field2D {
    Field2D::new(sample_grid(&grid.lats, &grid.lons, f), grid.width(), grid.height())
}

fn is_white(p: &Rgba<u8>) -> bool {
    p.0 == [255, 255, 255, 255]
}

#[test]
fn test_pressure_and_barbs_figure() {
    let grid = latlon_grid();
    let pressure = field(&grid, surface_pressure_pa).scaled(1.0 / 1000.0);
    let u = field(&grid, zonal_wind_ms);
    let v = field(&grid, meridional_wind_ms);

    let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
    let config =
        FilledContourConfig::new(linspace(70.0, 100.0, 150), Extend::Both, Colormap::plasma())
            .unwrap();
    let painted = fig.draw_filled_contours(&grid, &pressure, &config).unwrap();
    assert!(painted > 0);

    fig.draw_graticule(&GraticuleStyle::default()).unwrap();

    let coarse = grid.downsampled(6);
    let barbs = barbs_from_grid(&coarse, &u.downsample(6), &v.downsample(6), fig.projection());
    let barb_config = BarbConfig {
        length: 18.0,
        pivot: Pivot::Middle,
        increments: BarbIncrements {
            half: 5.0,
            full: 10.0,
            flag: 20.0,
        },
        ..BarbConfig::default()
    };
    assert_eq!(fig.draw_barbs(&barbs, &barb_config).unwrap(), barbs.len());

    fig.set_colorbar(
        Colorbar::from_filled(&config)
            .with_ticks(arange(70.0, 102.0, 2.0))
            .with_label("Pressure (KPa)"),
    );
    fig.set_title("Surface Winds and Surface Pressure at Time (0)");
    assert_eq!(fig.layer_count(), 3);

    let image = fig.render();
    let layout = fig.layout();
    assert_eq!(image.dimensions(), (layout.width, layout.height));

    // Map interior is colored, margins stay white
    let centre = image.get_pixel(440, 250);
    assert!(!is_white(centre));
    assert!(is_white(image.get_pixel(layout.width - 2, layout.height - 2)));

    // Title sits above the map
    let title_ink = (20..65).any(|y| (300..600).any(|x| !is_white(image.get_pixel(x, y))));
    assert!(title_ink);

    // Colorbar is filled
    let bar = image.get_pixel(860, 250);
    assert!(!is_white(bar));
}

#[test]
fn test_save_png_writes_decodable_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("plot_0.png");

    let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
    fig.draw_graticule(&GraticuleStyle::default()).unwrap();
    fig.set_title("empty");
    fig.save_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1000, 560));
    assert_eq!(decoded, fig.render());
}

#[test]
fn test_graticule_is_blue() {
    let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
    let style = GraticuleStyle {
        label_parallels: false,
        label_meridians: false,
        line_width: 2.0,
        ..GraticuleStyle::default()
    };
    fig.draw_graticule(&style).unwrap();
    let image = fig.render();

    // The equator runs through the middle row of the map
    let map = fig.layout().map;
    let (_, y) = fig.projection().to_pixel(10.0, 0.0);
    let p = image.get_pixel((map.x + 100.0) as u32, y as u32);
    assert!(p[2] > 200 && p[0] < 100, "expected blue, got {:?}", p);
}

#[test]
fn test_patch_figure() {
    let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
    let patches = vec![
        GeoPolygon::new(0, vec![(-180.0, -90.0), (0.0, -90.0), (0.0, 90.0), (-180.0, 90.0)]),
        GeoPolygon::new(1, vec![(0.0, -90.0), (180.0, -90.0), (180.0, 90.0), (0.0, 90.0)]),
    ];
    let values = [0.0, 1.0];
    let cmap = Colormap::gist_ncar();
    let norm = Normalize::autoscale(&values).unwrap();

    assert_eq!(fig.draw_patches(&patches, &values, &cmap, &norm).unwrap(), 2);
    fig.set_colorbar(Colorbar::continuous(cmap.clone(), norm).with_label("Pressure (Pa)"));
    let image = fig.render();

    let map = fig.layout().map;
    let west = image.get_pixel((map.x + map.width * 0.25) as u32, (map.y + 100.0) as u32);
    let east = image.get_pixel((map.x + map.width * 0.75) as u32, (map.y + 100.0) as u32);
    assert_eq!(*west, cmap.sample(0.0).to_rgba());
    assert_eq!(*east, cmap.sample(1.0).to_rgba());
    assert_ne!(*west, Color::WHITE.to_rgba());
}
