use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("frame {index} has {channels} channels, expected 3")]
    Channels { index: usize, channels: u8 },
    #[error("frame {index} buffer does not hold {width}x{height} pixels")]
    Buffer { index: usize, width: u32, height: u32 },
}

/// Normalizes one raw frame for numeric comparison.
///
/// Stateless per frame, so implementations may be called from several
/// threads at once.
pub trait FramePreprocessor: Send + Sync {
    fn preprocess(&self, frame: &Frame) -> Result<Frame, PreprocessError>;
}
