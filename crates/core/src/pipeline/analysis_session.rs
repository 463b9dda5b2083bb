use std::path::{Path, PathBuf};

use crate::detection::domain::motion_detector::DetectorSettings;
use crate::shared::motion_config::MotionConfig;

/// Context for a single analysis run.
///
/// Created per source video and dropped afterwards; nothing here outlives
/// the run or is shared between runs.
#[derive(Clone, Debug)]
pub struct AnalysisSession {
    source: PathBuf,
    config: MotionConfig,
}

impl AnalysisSession {
    pub fn new(source: impl Into<PathBuf>, config: MotionConfig) -> Self {
        Self {
            source: source.into(),
            config,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output_path(&self) -> &Path {
        &self.config.output_path
    }

    pub fn event_log_path(&self) -> &Path {
        &self.config.event_log_path
    }

    pub fn fps(&self) -> u32 {
        self.config.fps
    }

    pub fn preprocess_workers(&self) -> usize {
        self.config.preprocess_workers
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings::from(&self.config)
    }
}
