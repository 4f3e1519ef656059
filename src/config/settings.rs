use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_completion_threshold() -> u32 {
    80
}
fn default_cell_spacing() -> f32 {
    1.0
}
fn default_horizontal_padding() -> f32 {
    4.0
}
fn default_vertical_padding() -> f32 {
    2.0
}
fn default_vertical_buffer() -> f32 {
    2.0
}
fn default_min_cell() -> f32 {
    3.0
}
fn default_cell_floor() -> f32 {
    1.0
}
fn default_canvas_width() -> u32 {
    1080
}
fn default_canvas_height() -> u32 {
    1350
}
fn default_capture_cell() -> u32 {
    96
}
fn default_capture_gap() -> u32 {
    12
}
fn default_settle_yields() -> u32 {
    3
}
fn default_settle_delay_ms() -> u64 {
    40
}
fn default_watermark() -> String {
    "made with stride".to_string()
}
fn default_share_title() -> String {
    "My training progress".to_string()
}

/// Tuning constants for the analytics and calendar engine.
///
/// These are injected into the pure functions rather than hardcoded, so the
/// streak/metrics policy stays auditable and testable in isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A day counts as completed at or above this percentage.
    #[serde(default = "default_completion_threshold")]
    pub completion_threshold: u32,
    /// Gap between calendar cells, in terminal cells.
    #[serde(default = "default_cell_spacing")]
    pub cell_spacing: f32,
    /// Total horizontal padding inside the grid container.
    #[serde(default = "default_horizontal_padding")]
    pub horizontal_padding: f32,
    /// Total vertical padding inside the grid container.
    #[serde(default = "default_vertical_padding")]
    pub vertical_padding: f32,
    /// Extra vertical slack reserved below the grid.
    #[serde(default = "default_vertical_buffer")]
    pub vertical_buffer: f32,
    /// Comfortable minimum cell size, used as the fallback candidate.
    #[serde(default = "default_min_cell")]
    pub min_cell: f32,
    /// Absolute floor below which cells never shrink.
    #[serde(default = "default_cell_floor")]
    pub cell_floor: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            completion_threshold: default_completion_threshold(),
            cell_spacing: default_cell_spacing(),
            horizontal_padding: default_horizontal_padding(),
            vertical_padding: default_vertical_padding(),
            vertical_buffer: default_vertical_buffer(),
            min_cell: default_min_cell(),
            cell_floor: default_cell_floor(),
        }
    }
}

/// Fixed-canvas geometry and timing for the shareable snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    /// Portrait canvas; exports keep identical proportions on every terminal.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Calendar cell edge on the fixed canvas, in pixels.
    #[serde(default = "default_capture_cell")]
    pub cell_size: u32,
    /// Gap between calendar cells on the fixed canvas, in pixels.
    #[serde(default = "default_capture_gap")]
    pub cell_gap: u32,
    /// Cooperative yields before rasterizing the off-screen composition.
    #[serde(default = "default_settle_yields")]
    pub settle_yields: u32,
    /// Fixed settle delay before rasterizing, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_watermark")]
    pub watermark: String,
    /// Dialog title handed to the share target.
    #[serde(default = "default_share_title")]
    pub share_title: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            cell_size: default_capture_cell(),
            cell_gap: default_capture_gap(),
            settle_yields: default_settle_yields(),
            settle_delay_ms: default_settle_delay_ms(),
            watermark: default_watermark(),
            share_title: default_share_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Path to the exported progress document. Overridable with --data.
    #[serde(default)]
    pub export_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "stride").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Default location of the aggregator export when --data is not given.
    pub fn default_export_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("progress.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
