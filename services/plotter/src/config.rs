//! Command-line arguments and plot configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file
//! (`--config`), then command-line flags. Flags that can also come from the
//! environment read a `.env` file first (see the binaries).
//!
//! ```yaml
//! latlon:
//!   output_dir: plots
//!   downsample: 30
//!   pressure:
//!     min_kpa: 70.0
//!     max_kpa: 100.0
//!     n_levels: 150
//!   barbs:
//!     length: 18.0
//!     pivot: middle
//! mesh:
//!   variable: pressure
//!   levels: [0, 1, 2, 3, 4]
//!   times: [0]
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use plot_common::{arange, linspace, BarbIncrements};
use renderer::{Extend, Pivot};
use serde::{Deserialize, Serialize};

/// Smallest accepted isobar spacing in kPa.
pub const MIN_ISOBAR_INTERVAL_KPA: f64 = 0.1;

/// Logging flags shared by both programs.
#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PLOT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "PLOT_JSON_LOGS")]
    pub json_logs: bool,
}

#[derive(Parser, Debug)]
#[command(name = "plot-ll")]
#[command(about = "Plot surface winds over surface pressure from a lat/lon MPAS file")]
pub struct LatLonArgs {
    /// File you want to plot from
    pub file: PathBuf,

    /// YAML configuration file
    #[arg(short, long, env = "PLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the PNG files are written to
    #[arg(short, long, env = "PLOT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Plot every Nth grid point as a barb
    #[arg(long)]
    pub downsample: Option<usize>,

    /// Vertical level to plot
    #[arg(long)]
    pub level: Option<usize>,

    /// Draw labelled isobars every INTERVAL kPa
    #[arg(long, value_name = "INTERVAL")]
    pub isobar_interval: Option<f64>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl LatLonArgs {
    /// Defaults, overlaid with the YAML file, overlaid with flags.
    pub fn resolve(&self) -> Result<LatLonConfig> {
        let mut cfg = PlotterConfig::load(self.config.as_deref())?.latlon;
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(n) = self.downsample {
            cfg.downsample = n;
        }
        if let Some(level) = self.level {
            cfg.level = level;
        }
        if self.isobar_interval.is_some() {
            cfg.isobar_interval = self.isobar_interval;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Parser, Debug)]
#[command(name = "plot-mpas")]
#[command(about = "Plot an MPAS cell field as mesh polygons")]
pub struct MeshArgs {
    /// File you want to plot from
    pub file: PathBuf,

    /// Variable you want to plot from that file
    #[arg(short, long)]
    pub var: Option<String>,

    /// Vertical levels to plot, comma separated
    #[arg(long, value_delimiter = ',')]
    pub levels: Option<Vec<usize>>,

    /// Times to plot, comma separated
    #[arg(long, value_delimiter = ',')]
    pub times: Option<Vec<usize>>,

    /// Where to read and write the patch cache
    #[arg(long, env = "PLOT_PATCH_CACHE")]
    pub patch_cache: Option<PathBuf>,

    /// Always rebuild patches and never touch the cache
    #[arg(long, conflicts_with = "patch_cache")]
    pub no_patch_cache: bool,

    /// YAML configuration file
    #[arg(short, long, env = "PLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the PNG files are written to
    #[arg(short, long, env = "PLOT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl MeshArgs {
    pub fn resolve(&self) -> Result<MeshConfig> {
        let mut cfg = PlotterConfig::load(self.config.as_deref())?.mesh;
        if let Some(var) = &self.var {
            cfg.variable = var.clone();
        }
        if let Some(levels) = &self.levels {
            cfg.levels = levels.clone();
        }
        if let Some(times) = &self.times {
            cfg.times = times.clone();
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(path) = &self.patch_cache {
            cfg.patch_cache = Some(path.clone());
        }
        if self.no_patch_cache {
            cfg.use_patch_cache = false;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Contents of a `--config` YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    pub latlon: LatLonConfig,
    pub mesh: MeshConfig,
}

impl PlotterConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// The YAML file when given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml(path),
            None => Ok(Self::default()),
        }
    }
}

/// Settings for `plot-ll`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatLonConfig {
    pub output_dir: PathBuf,
    /// Vertical level of the 4-D variables (0 = surface)
    pub level: usize,
    /// Barb thinning factor
    pub downsample: usize,
    pub pressure: PressureConfig,
    pub barbs: BarbSettings,
    /// Spacing of labelled isobars in kPa; none when unset
    pub isobar_interval: Option<f64>,
}

impl Default for LatLonConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            level: 0,
            downsample: 30,
            pressure: PressureConfig::default(),
            barbs: BarbSettings::default(),
            isobar_interval: None,
        }
    }
}

impl LatLonConfig {
    pub fn validate(&self) -> Result<()> {
        self.pressure.validate()?;
        if self.barbs.length <= 0.0 {
            bail!("barb length must be positive, got {}", self.barbs.length);
        }
        if let Some(interval) = self.isobar_interval {
            if !interval.is_finite() || interval < MIN_ISOBAR_INTERVAL_KPA {
                bail!(
                    "isobar interval must be at least {} kPa, got {}",
                    MIN_ISOBAR_INTERVAL_KPA,
                    interval
                );
            }
        }
        Ok(())
    }
}

/// Filled pressure contours, in kPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    pub min_kpa: f64,
    pub max_kpa: f64,
    /// Number of contour levels between min and max inclusive
    pub n_levels: usize,
    pub tick_step: f64,
    pub colormap: String,
    pub extend: Extend,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            min_kpa: 70.0,
            max_kpa: 100.0,
            n_levels: 150,
            tick_step: 2.0,
            colormap: "plasma".to_string(),
            extend: Extend::Both,
        }
    }
}

impl PressureConfig {
    pub fn levels(&self) -> Vec<f64> {
        linspace(self.min_kpa, self.max_kpa, self.n_levels)
    }

    /// Colorbar ticks from min to max, one step past max exclusive.
    pub fn ticks(&self) -> Vec<f64> {
        arange(self.min_kpa, self.max_kpa + self.tick_step, self.tick_step)
    }

    fn validate(&self) -> Result<()> {
        if self.min_kpa.partial_cmp(&self.max_kpa) != Some(Ordering::Less) {
            bail!(
                "pressure range is empty: {} .. {} kPa",
                self.min_kpa,
                self.max_kpa
            );
        }
        if self.n_levels < 2 {
            bail!("need at least 2 pressure levels, got {}", self.n_levels);
        }
        if self.tick_step <= 0.0 {
            bail!("tick step must be positive, got {}", self.tick_step);
        }
        Ok(())
    }
}

/// Wind barb appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarbSettings {
    /// Staff length in pixels
    pub length: f32,
    pub pivot: Pivot,
    pub increments: BarbIncrements,
    pub line_width: f32,
}

impl Default for BarbSettings {
    fn default() -> Self {
        Self {
            length: 18.0,
            pivot: Pivot::Middle,
            increments: BarbIncrements {
                half: 5.0,
                full: 10.0,
                flag: 20.0,
            },
            line_width: 1.0,
        }
    }
}

/// Settings for `plot-mpas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub output_dir: PathBuf,
    pub variable: String,
    pub levels: Vec<usize>,
    pub times: Vec<usize>,
    pub colormap: String,
    /// Cache file; defaults to `mpas_patches_{nCells}.json.gz` in the output directory
    pub patch_cache: Option<PathBuf>,
    pub use_patch_cache: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            variable: "pressure".to_string(),
            levels: (0..5).collect(),
            times: vec![0],
            colormap: "gist_ncar".to_string(),
            patch_cache: None,
            use_patch_cache: true,
        }
    }
}

impl MeshConfig {
    pub fn validate(&self) -> Result<()> {
        if self.variable.is_empty() {
            bail!("no variable given");
        }
        if self.levels.is_empty() || self.times.is_empty() {
            bail!("at least one level and one time are required");
        }
        Ok(())
    }
}
