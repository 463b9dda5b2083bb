use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Abstracts video encoding so the pipeline can write output without
/// depending on a specific codec library.
pub trait VideoWriter: Send {
    /// Creates (or truncates) the container at `path`.
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes pending packets and finalizes the container.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
