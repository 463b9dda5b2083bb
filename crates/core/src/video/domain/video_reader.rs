use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a video source.
///
/// Implementations handle I/O details (codec, container format, etc.)
/// while the pipeline works with the abstract `Frame` and `VideoMetadata`
/// types.
pub trait VideoReader: Send {
    /// Opens a video file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order, tagged with the
    /// container's native channel order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader. Safe to call repeatedly.
    fn close(&mut self);
}
