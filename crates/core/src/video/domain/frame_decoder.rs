use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::motion_error::MotionError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// A fully decoded video held in memory.
pub struct DecodedVideo {
    pub metadata: VideoMetadata,
    pub frames: Vec<Frame>,
}

/// Drains a [`VideoReader`] into memory.
///
/// `decode` consumes the decoder, so a source can only be read once.
pub struct FrameDecoder {
    reader: Box<dyn VideoReader>,
}

/// Closes the wrapped reader when dropped, on every exit path.
struct ReaderGuard<'a>(&'a mut dyn VideoReader);

impl Drop for ReaderGuard<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

impl FrameDecoder {
    pub fn new(reader: Box<dyn VideoReader>) -> Self {
        Self { reader }
    }

    /// Opens `path` and reads frames until the stream is exhausted.
    ///
    /// End of stream is normal termination. An open failure is reported as
    /// [`MotionError::Open`]; a failure after opening as [`MotionError::Decode`].
    pub fn decode(mut self, path: &Path) -> Result<DecodedVideo, MotionError> {
        let mut guard = ReaderGuard(self.reader.as_mut());

        let metadata = guard.0.open(path).map_err(|source| MotionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let frames = guard
            .0
            .frames()
            .collect::<Result<Vec<_>, _>>()
            .map_err(MotionError::Decode)?;

        log::debug!(
            "Decoded {} frames ({}x{}, {:.2} fps) from {}",
            frames.len(),
            metadata.width,
            metadata.height,
            metadata.fps,
            path.display()
        );

        Ok(DecodedVideo { metadata, frames })
    }
}
