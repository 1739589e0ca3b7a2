//! Benchmarks for the renderer crate.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::RgbaImage;
use plot_common::{linspace, BoundingBox, Field2D, GeoPolygon, LatLonGrid};
use projection::{CylindricalEquidistant, PlotRect};
use renderer::barbs::{barbs_from_grid, render_barbs, BarbConfig};
use renderer::filled::{render_filled_contours, Extend, FilledContourConfig};
use renderer::patches::render_patches;
use renderer::{png, Colormap, Figure, FigureLayout, Normalize};
use test_utils::{
    coordinate_axis, meridional_wind_ms, sample_grid, surface_pressure_pa, zonal_wind_ms,
};
use tiny_skia::Pixmap;

fn global_grid(n_lats: usize, n_lons: usize) -> LatLonGrid {
    let lats = coordinate_axis(-90.0, 90.0, n_lats);
    let step = 360.0 / n_lons as f64;
    let lons = (0..n_lons).map(|i| -180.0 + step * i as f64).collect();
    LatLonGrid::new(lats, lons)
}

fn field(grid: &LatLonGrid, f: impl Fn(f64, f64) -> f32) -> Field2D {
    Field2D::new(sample_grid(&grid.lats, &grid.lons, f), grid.width(), grid.height())
}

fn projection() -> CylindricalEquidistant {
    CylindricalEquidistant::global(PlotRect::new(80.0, 70.0, 720.0, 360.0)).unwrap()
}

// =============================================================================
// FILLED CONTOUR BENCHMARKS
// =============================================================================

fn bench_filled_contours(c: &mut Criterion) {
    let mut group = c.benchmark_group("filled_contours");
    let config =
        FilledContourConfig::new(linspace(70.0, 100.0, 150), Extend::Both, Colormap::plasma())
            .unwrap();
    let proj = projection();

    for (n_lats, n_lons) in [(181, 360), (721, 1440)] {
        let grid = global_grid(n_lats, n_lons);
        let pressure = field(&grid, surface_pressure_pa).scaled(1.0 / 1000.0);
        group.throughput(Throughput::Elements((n_lats * n_lons) as u64));
        group.bench_with_input(
            BenchmarkId::new("grid", format!("{}x{}", n_lons, n_lats)),
            &(grid, pressure),
            |b, (grid, pressure)| {
                b.iter(|| {
                    let mut canvas = RgbaImage::new(1000, 560);
                    render_filled_contours(&mut canvas, grid, pressure, &proj, &config).unwrap();
                    black_box(canvas)
                });
            },
        );
    }
    group.finish();
}

// =============================================================================
// BARB BENCHMARKS
// =============================================================================

fn bench_barbs(c: &mut Criterion) {
    let grid = global_grid(181, 360).downsampled(10);
    let proj = projection();
    let barbs = barbs_from_grid(
        &grid,
        &field(&grid, zonal_wind_ms),
        &field(&grid, meridional_wind_ms),
        &proj,
    );
    let config = BarbConfig::default();

    c.bench_function("barbs/render_global_10x", |b| {
        b.iter(|| {
            let mut pixmap = Pixmap::new(1000, 560).unwrap();
            black_box(render_barbs(&mut pixmap, &barbs, &config, None))
        });
    });
}

// =============================================================================
// PATCH BENCHMARKS
// =============================================================================

fn bench_patches(c: &mut Criterion) {
    let proj = projection();
    let cmap = Colormap::gist_ncar();
    let mut patches = Vec::new();
    for j in 0..90 {
        for i in 0..180 {
            let lon = -180.0 + 2.0 * i as f64;
            let lat = -90.0 + 2.0 * j as f64;
            patches.push(GeoPolygon::new(
                patches.len(),
                vec![(lon, lat), (lon + 2.0, lat), (lon + 2.0, lat + 2.0), (lon, lat + 2.0)],
            ));
        }
    }
    let values: Vec<f32> = (0..patches.len()).map(|i| i as f32).collect();
    let norm = Normalize::autoscale(&values).unwrap();

    c.bench_function("patches/16200_quads", |b| {
        b.iter(|| {
            let mut pixmap = Pixmap::new(1000, 560).unwrap();
            black_box(render_patches(&mut pixmap, &patches, &values, &proj, &cmap, &norm, None))
        });
    });
}

// =============================================================================
// PNG ENCODING BENCHMARKS
// =============================================================================

fn bench_png_encoding(c: &mut Criterion) {
    let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
    let grid = global_grid(181, 360);
    let pressure = field(&grid, surface_pressure_pa).scaled(1.0 / 1000.0);
    let config =
        FilledContourConfig::new(linspace(70.0, 100.0, 150), Extend::Both, Colormap::plasma())
            .unwrap();
    fig.draw_filled_contours(&grid, &pressure, &config).unwrap();
    let image = fig.render();
    let (w, h) = (image.width() as usize, image.height() as usize);

    let mut group = c.benchmark_group("png_encoding");
    group.throughput(Throughput::Bytes(image.as_raw().len() as u64));
    group.bench_function("auto", |b| {
        b.iter(|| black_box(png::create_png_auto(image.as_raw(), w, h).unwrap()))
    });
    group.bench_function("rgba", |b| {
        b.iter(|| black_box(png::create_png(image.as_raw(), w, h).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_filled_contours,
    bench_barbs,
    bench_patches,
    bench_png_encoding,
);
criterion_main!(benches);
