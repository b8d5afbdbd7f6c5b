//! Run configuration
//!
//! Every path and tunable of a run lives in [`AnalysisConfig`]. Values come
//! from defaults, then an optional TOML file, then command-line overrides.

use serde::Deserialize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::heatmap::HeatmapRenderer;

/// Complete configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Gaze samples recorded with the AI advisor present
    pub ai_advisor_path: PathBuf,
    /// Gaze samples recorded without an advisor
    pub no_advisor_path: PathBuf,
    /// Screen backdrop; must exist, only drawn with `render.backdrop_overlay`
    pub backdrop_path: PathBuf,
    /// Directory receiving heatmaps and the report
    pub output_dir: PathBuf,
    pub screen: ScreenSize,
    pub trials: TrialRange,
    pub bins: BinCounts,
    pub render: RenderSettings,
    pub stats: StatsSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ai_advisor_path: PathBuf::from(DEFAULT_AI_ADVISOR_FILE),
            no_advisor_path: PathBuf::from(DEFAULT_NO_ADVISOR_FILE),
            backdrop_path: PathBuf::from(DEFAULT_BACKDROP_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            screen: ScreenSize::default(),
            trials: TrialRange::default(),
            bins: BinCounts::default(),
            render: RenderSettings::default(),
            stats: StatsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// Inclusive range of trial numbers kept after loading
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrialRange {
    pub first: i64,
    pub last: i64,
}

impl Default for TrialRange {
    fn default() -> Self {
        Self {
            first: FIRST_TRIAL,
            last: LAST_TRIAL,
        }
    }
}

impl TrialRange {
    pub fn contains(&self, trial: i64) -> bool {
        self.as_range().contains(&trial)
    }

    pub fn as_range(&self) -> RangeInclusive<i64> {
        self.first..=self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BinCounts {
    pub x: u32,
    pub y: u32,
}

impl Default for BinCounts {
    fn default() -> Self {
        Self {
            x: HEATMAP_BINS_X,
            y: HEATMAP_BINS_Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Pixels per histogram cell
    pub cell_size: u32,
    /// Counts at or above this percentile saturate the colour scale
    pub upper_percentile: f64,
    /// Opacity of the heatmap over the canvas
    pub alpha: f32,
    /// Draw the backdrop image under the heatmap instead of plain black
    pub backdrop_overlay: bool,
    /// Write a `_counts.txt` next to every heatmap
    pub export_counts: bool,
    /// Tile each condition's heatmaps into one contact sheet
    pub contact_sheet: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cell_size: HEATMAP_CELL_SIZE,
            upper_percentile: HEATMAP_UPPER_PERCENTILE,
            alpha: HEATMAP_ALPHA,
            backdrop_overlay: false,
            export_counts: false,
            contact_sheet: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Alpha for the "significant difference" flag
    pub significance: f64,
    /// Pooled-variance Student t-test when true, Welch when false
    pub equal_variance: bool,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            significance: SIGNIFICANCE_LEVEL,
            equal_variance: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the default config file if present, otherwise built-in defaults
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make binning or rendering meaningless
    pub fn validate(&self) -> Result<()> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(Error::InvalidConfig(
                "screen dimensions must be non-zero".to_string(),
            ));
        }
        if self.bins.x == 0 || self.bins.y == 0 {
            return Err(Error::InvalidConfig("bin counts must be non-zero".to_string()));
        }
        if self.trials.first > self.trials.last {
            return Err(Error::InvalidConfig(format!(
                "trial range {}..={} is empty",
                self.trials.first, self.trials.last
            )));
        }
        if self.render.cell_size == 0 {
            return Err(Error::InvalidConfig("cell_size must be non-zero".to_string()));
        }
        if self.bins.x.checked_mul(self.bins.y).is_none() {
            return Err(Error::InvalidConfig(format!(
                "{}x{} bins overflow the grid size",
                self.bins.x, self.bins.y
            )));
        }
        if HeatmapRenderer::image_size(self.bins, self.render.cell_size).is_none() {
            return Err(Error::InvalidConfig(format!(
                "{}x{} bins at cell_size {} overflow the image size",
                self.bins.x, self.bins.y, self.render.cell_size
            )));
        }
        if !(self.render.upper_percentile > 0.0 && self.render.upper_percentile <= 100.0) {
            return Err(Error::InvalidConfig(format!(
                "upper_percentile {} outside (0, 100]",
                self.render.upper_percentile
            )));
        }
        if !(0.0..=1.0).contains(&self.render.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha {} outside [0, 1]",
                self.render.alpha
            )));
        }
        if !(self.stats.significance > 0.0 && self.stats.significance < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "significance {} outside (0, 1)",
                self.stats.significance
            )));
        }
        Ok(())
    }

    /// Path of the text report for this run
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE)
    }
}
