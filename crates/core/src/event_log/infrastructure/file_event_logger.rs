use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::event_log::domain::event_logger::{EventLogger, MotionEvent};
use crate::shared::motion_error::MotionError;

/// Appends motion events to a UTF-8 text file.
///
/// The file is opened, written and closed on every call so concurrent
/// readers always see complete records.
pub struct FileEventLogger {
    path: PathBuf,
}

impl FileEventLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLogger for FileEventLogger {
    fn append(&mut self, event: &MotionEvent) -> Result<(), MotionError> {
        let to_log_error = |source| MotionError::LogWrite {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_log_error)?;
        file.write_all(event.to_string().as_bytes())
            .map_err(to_log_error)?;
        log::debug!("Logged '{}' for {}", event.verdict(), event.source.display());
        Ok(())
    }
}
