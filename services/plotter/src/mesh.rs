//! MPAS cell fields drawn as mesh polygons.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mpas_patches::{build_patches, CacheOutcome, PatchCache, PatchCollection};
use netcdf_parser::{CellField, Dataset, MpasMesh};
use plot_common::{arange, BoundingBox};
use renderer::{Colorbar, Colormap, Figure, FigureLayout, GraticuleStyle, Normalize};
use tracing::{debug, info, warn};

use crate::config::MeshConfig;

pub fn title(variable: &str, time: usize, level: usize) -> String {
    format!("{} at time {} and at level {}", variable, time, level)
}

pub fn output_name(variable: &str, time: usize, level: usize) -> String {
    format!("{}_{}_{}.png", variable, time, level)
}

/// Colorbar label from the variable name and its `units` attribute.
pub fn colorbar_label(variable: &str, units: Option<&str>) -> String {
    let mut chars = variable.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    match units {
        Some(units) if !units.is_empty() => format!("{} ({})", name, units),
        _ if variable == "pressure" => "Pressure (Pa)".to_string(),
        _ => name,
    }
}

/// Renders one figure per requested (level, time) of a mesh variable.
pub struct MeshPlotter {
    cfg: MeshConfig,
    colormap: Colormap,
    graticule: GraticuleStyle,
}

impl MeshPlotter {
    pub fn new(cfg: MeshConfig) -> Result<Self> {
        let colormap = Colormap::by_name(&cfg.colormap)?;
        let graticule = GraticuleStyle {
            parallels: arange(-90.0, 90.0, 30.0),
            ..GraticuleStyle::default()
        };
        Ok(Self {
            cfg,
            colormap,
            graticule,
        })
    }

    pub fn config(&self) -> &MeshConfig {
        &self.cfg
    }

    /// Cache location for a mesh with `n_cells` cells.
    pub fn cache_path(&self, n_cells: usize) -> PathBuf {
        match &self.cfg.patch_cache {
            Some(path) => path.clone(),
            None => PatchCache::in_dir(&self.cfg.output_dir, n_cells)
                .path()
                .to_path_buf(),
        }
    }

    /// Patches for `mesh`, from the cache unless caching is disabled.
    pub fn patches(&self, mesh: &MpasMesh) -> PatchCollection {
        if !self.cfg.use_patch_cache {
            return build_patches(mesh);
        }
        let cache = PatchCache::new(self.cache_path(mesh.n_cells));
        let (collection, outcome) = cache.load_or_build(mesh);
        if outcome != CacheOutcome::Hit {
            debug!(path = %cache.path().display(), ?outcome, "Patch cache refreshed");
        }
        collection
    }

    /// Plot every configured level and time. Levels or times the variable
    /// does not have are skipped with a warning.
    pub fn run(&self, ds: &Dataset) -> Result<Vec<PathBuf>> {
        let variable = &self.cfg.variable;
        let field = CellField::read(ds, variable)
            .with_context(|| format!("Failed to read '{}'", variable))?;
        let mesh = MpasMesh::from_dataset(ds)
            .with_context(|| format!("Failed to read mesh from {}", ds.path().display()))?;
        if field.n_cells != mesh.n_cells {
            bail!(
                "'{}' has {} cells but the mesh has {}",
                variable,
                field.n_cells,
                mesh.n_cells
            );
        }

        let patches = self.patches(&mesh);
        fs::create_dir_all(&self.cfg.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.cfg.output_dir.display())
        })?;

        let mut written = Vec::new();
        for &level in &self.cfg.levels {
            if level >= field.n_levels {
                warn!(level, available = field.n_levels, "Skipping level not in variable");
                continue;
            }
            for &time in &self.cfg.times {
                if time >= field.n_times {
                    warn!(time, available = field.n_times, "Skipping time not in variable");
                    continue;
                }
                info!(variable = %variable, level, time, "Creating plot");
                if let Some(path) = self.plot(&patches, &field, time, level, &self.cfg.output_dir)? {
                    written.push(path);
                }
            }
        }
        Ok(written)
    }

    fn plot(
        &self,
        patches: &PatchCollection,
        field: &CellField,
        time: usize,
        level: usize,
        dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(fig) = self.render_slice(patches, field, time, level)? else {
            return Ok(None);
        };
        let path = dir.join(output_name(&field.name, time, level));
        fig.save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Some(path))
    }

    /// Compose the figure for `field[time, :, level]`.
    ///
    /// Returns `None` when the slice has no finite values to scale colors by.
    pub fn render_slice(
        &self,
        patches: &PatchCollection,
        field: &CellField,
        time: usize,
        level: usize,
    ) -> Result<Option<Figure>> {
        let values = field.slice(time, level)?;
        let Some(norm) = Normalize::autoscale(&values) else {
            warn!(variable = %field.name, time, level, "Slice has no finite values, skipping");
            return Ok(None);
        };

        let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global())?;
        let filled = fig.draw_patches(&patches.patches, &values, &self.colormap, &norm)?;
        debug!(patches = filled, vmin = norm.vmin, vmax = norm.vmax, "Drew mesh patches");

        fig.draw_graticule(&self.graticule)?;
        fig.set_colorbar(
            Colorbar::continuous(self.colormap.clone(), norm)
                .with_label(colorbar_label(&field.name, field.units.as_deref())),
        );
        fig.set_title(title(&field.name, time, level));
        Ok(Some(fig))
    }
}
