use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    ACTIVITY_THRESHOLD, BLUR_KERNEL_SIZE, CANONICAL_HEIGHT, CANONICAL_WIDTH, DEFAULT_FPS,
    EVENT_LOG_PATH, HIGHLIGHT_COLOR, MIN_REGION_AREA, MOTION_OUTPUT_PATH, PIXEL_THRESHOLD,
    STROKE_WIDTH,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Where motion rectangles found at canonical resolution are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMapping {
    /// Draw canonical coordinates unchanged onto the native frame. Only
    /// exact when the native resolution equals the canonical one.
    #[default]
    Canonical,
    /// Rescale rectangles to the native resolution before drawing.
    Scaled,
}

/// Tunables for one motion analysis run.
///
/// Defaults are the stock detection constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub activity_threshold: f64,
    pub pixel_threshold: f32,
    pub min_region_area: f64,
    pub canonical_width: u32,
    pub canonical_height: u32,
    pub blur_kernel_size: usize,
    pub stroke_width: u32,
    pub highlight_color: [u8; 3],
    pub coordinate_mapping: CoordinateMapping,
    pub fps: u32,
    pub output_path: PathBuf,
    pub event_log_path: PathBuf,
    /// 0 uses the available parallelism.
    pub preprocess_workers: usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            activity_threshold: ACTIVITY_THRESHOLD,
            pixel_threshold: PIXEL_THRESHOLD,
            min_region_area: MIN_REGION_AREA,
            canonical_width: CANONICAL_WIDTH,
            canonical_height: CANONICAL_HEIGHT,
            blur_kernel_size: BLUR_KERNEL_SIZE,
            stroke_width: STROKE_WIDTH,
            highlight_color: HIGHLIGHT_COLOR,
            coordinate_mapping: CoordinateMapping::default(),
            fps: DEFAULT_FPS,
            output_path: PathBuf::from(MOTION_OUTPUT_PATH),
            event_log_path: PathBuf::from(EVENT_LOG_PATH),
            preprocess_workers: 0,
        }
    }
}

impl MotionConfig {
    /// Loads a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(ConfigError::Invalid(format!(
                "Blur kernel size must be a positive odd integer, got {}",
                self.blur_kernel_size
            )));
        }
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Canonical resolution must be non-zero, got {}x{}",
                self.canonical_width, self.canonical_height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("Frame rate must be positive".into()));
        }
        if self.stroke_width == 0 {
            return Err(ConfigError::Invalid("Stroke width must be positive".into()));
        }
        if self.activity_threshold < 0.0 || self.pixel_threshold < 0.0 || self.min_region_area < 0.0
        {
            return Err(ConfigError::Invalid("Thresholds must be non-negative".into()));
        }
        Ok(())
    }

    pub fn canonical_size(&self) -> (u32, u32) {
        (self.canonical_width, self.canonical_height)
    }
}
