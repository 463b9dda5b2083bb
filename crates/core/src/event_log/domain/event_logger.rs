use std::fmt;
use std::path::PathBuf;

use crate::shared::motion_error::MotionError;

/// One analyzed source file and whether it contained motion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MotionEvent {
    pub source: PathBuf,
    pub motion_detected: bool,
}

impl MotionEvent {
    pub fn new(source: impl Into<PathBuf>, motion_detected: bool) -> Self {
        Self {
            source: source.into(),
            motion_detected,
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.motion_detected {
            "Motion Detected"
        } else {
            "No Motion Detected"
        }
    }
}

/// Two lines plus a blank separator line.
impl fmt::Display for MotionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File: {}\n{}\n\n", self.source.display(), self.verdict())
    }
}

/// Append-only sink for motion events.
///
/// Every call adds exactly one record; nothing is read back or deduplicated.
pub trait EventLogger: Send {
    fn append(&mut self, event: &MotionEvent) -> Result<(), MotionError>;
}
