//! Surface winds over surface pressure on a regular lat/lon grid.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use netcdf_parser::{Dataset, LatLonDataset};
use plot_common::{BoundingBox, Field2D};
use renderer::contour::generate_contour_levels;
use renderer::{
    barbs_from_grid, BarbConfig, Colorbar, Colormap, ContourConfig, Figure, FigureLayout,
    FilledContourConfig, GraticuleStyle,
};
use tracing::{debug, info, warn};

use crate::config::LatLonConfig;

const PA_PER_KPA: f32 = 1000.0;

pub const PRESSURE_LABEL: &str = "Pressure (KPa)";

/// Upper bound on isobars drawn in one figure.
pub const MAX_ISOBARS: usize = 200;

pub fn title(time: usize) -> String {
    format!("Surface Winds and Surface Pressure at Time ({})", time)
}

pub fn output_name(time: usize) -> String {
    format!("plot_{}.png", time)
}

/// Isobar levels every `interval` kPa across `lo..=hi`, or `None` when
/// that would exceed [`MAX_ISOBARS`].
pub fn isobar_levels(lo: f32, hi: f32, interval: f64) -> Option<Vec<f32>> {
    let count = (f64::from(hi) - f64::from(lo)) / interval;
    if !count.is_finite() || count > MAX_ISOBARS as f64 {
        return None;
    }
    Some(generate_contour_levels(lo, hi, interval as f32))
}

/// Barb components `(u, v)` for one slice: u is `uReconstructZonal` and
/// v is `uReconstructMeridional`. Reference plots pass the meridional
/// wind as u, so their barbs are rotated relative to these.
pub fn wind_components(
    data: &LatLonDataset,
    t: usize,
    level: usize,
) -> Result<(Field2D, Field2D)> {
    let u = data.zonal_wind.slice(t, level)?;
    let v = data.meridional_wind.slice(t, level)?;
    Ok((u, v))
}

/// Renders one figure per time step of a lat/lon file.
pub struct LatLonPlotter {
    cfg: LatLonConfig,
    fill: FilledContourConfig,
    barbs: BarbConfig,
    graticule: GraticuleStyle,
}

impl LatLonPlotter {
    pub fn new(cfg: LatLonConfig) -> Result<Self> {
        let colormap = Colormap::by_name(&cfg.pressure.colormap)?;
        let fill = FilledContourConfig::new(cfg.pressure.levels(), cfg.pressure.extend, colormap)?;
        let barbs = BarbConfig {
            length: cfg.barbs.length,
            increments: cfg.barbs.increments,
            pivot: cfg.barbs.pivot,
            line_width: cfg.barbs.line_width,
            ..BarbConfig::default()
        };
        Ok(Self {
            cfg,
            fill,
            barbs,
            graticule: GraticuleStyle::default(),
        })
    }

    pub fn config(&self) -> &LatLonConfig {
        &self.cfg
    }

    /// Plot every time in `ds`, returning the written files in time order.
    pub fn run(&self, ds: &Dataset) -> Result<Vec<PathBuf>> {
        let data = LatLonDataset::from_dataset(ds)
            .with_context(|| format!("Failed to read lat/lon fields from {}", ds.path().display()))?;

        let (ny, nx) = (data.grid.height(), data.grid.width());
        info!(x = ?[ny, nx], y = ?[ny, nx], "Coordinate grid shape");
        info!(
            meridional = ?data.meridional_wind.shape(),
            zonal = ?data.zonal_wind.shape(),
            pressure = ?data.pressure.shape(),
            "Variable shapes"
        );

        let n_levels = data.pressure.n_levels();
        if self.cfg.level >= n_levels {
            bail!(
                "level {} requested but the file has {} levels",
                self.cfg.level,
                n_levels
            );
        }

        fs::create_dir_all(&self.cfg.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.cfg.output_dir.display())
        })?;

        let mut written = Vec::with_capacity(data.n_times);
        for t in 0..data.n_times {
            let fig = self.render_time(&data, t)?;
            let path = self.cfg.output_dir.join(output_name(t));
            fig.save_png(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }

    /// Compose the figure for one time step.
    pub fn render_time(&self, data: &LatLonDataset, t: usize) -> Result<Figure> {
        let level = self.cfg.level;
        let pressure = data.pressure.slice(t, level)?.scaled(1.0 / PA_PER_KPA);
        let (u, v) = wind_components(data, t, level)?;

        let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global())?;

        let painted = fig.draw_filled_contours(&data.grid, &pressure, &self.fill)?;
        debug!(time = t, pixels = painted, "Filled pressure contours");

        if let Some(interval) = self.cfg.isobar_interval {
            if let Some((lo, hi)) = pressure.min_max() {
                match isobar_levels(lo, hi, interval) {
                    Some(levels) => {
                        let config = ContourConfig {
                            levels,
                            labels_enabled: true,
                            ..ContourConfig::default()
                        };
                        let labels = fig.draw_contour_lines(&data.grid, &pressure, &config)?;
                        debug!(time = t, isobars = config.levels.len(), labels, "Drew isobars");
                    }
                    None => warn!(time = t, interval, "Too many isobars, skipping overlay"),
                }
            }
        }

        fig.draw_graticule(&self.graticule)?;

        let stride = self.cfg.downsample;
        let barbs = barbs_from_grid(
            &data.grid.downsampled(stride),
            &u.downsample(stride),
            &v.downsample(stride),
            fig.projection(),
        );
        let drawn = fig.draw_barbs(&barbs, &self.barbs)?;
        debug!(time = t, barbs = drawn, "Drew wind barbs");

        fig.set_colorbar(
            Colorbar::from_filled(&self.fill)
                .with_ticks(self.cfg.pressure.ticks())
                .with_label(PRESSURE_LABEL),
        );
        fig.set_title(title(t));
        Ok(fig)
    }
}
