use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::motion_error::MotionError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Serializes annotated frames into a single video at a fixed rate.
///
/// Output resolution comes from the first frame; any existing file at the
/// target path is replaced. Frames are written to a sibling partial file
/// that is renamed onto the target only after the writer closed cleanly, so
/// a failed encode never leaves a truncated video at `path`.
pub struct MotionVideoEncoder {
    writer: Box<dyn VideoWriter>,
}

impl MotionVideoEncoder {
    pub fn new(writer: Box<dyn VideoWriter>) -> Self {
        Self { writer }
    }

    pub fn encode(
        mut self,
        frames: &[Frame],
        fps: u32,
        path: &Path,
    ) -> Result<PathBuf, MotionError> {
        let first = frames.first().ok_or(MotionError::EmptyInput)?;
        let (width, height) = first.dimensions();
        if let Some(odd) = frames.iter().find(|f| f.dimensions() != (width, height)) {
            return Err(MotionError::FrameMismatch {
                index: odd.index(),
                expected: format!("{width}x{height}"),
                actual: format!("{}x{}", odd.width(), odd.height()),
            });
        }

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| MotionError::Encode(Box::new(e)))?;
        }

        let metadata = VideoMetadata::for_output(width, height, fps, frames.len());
        let partial = partial_path(path);
        let written = self
            .writer
            .open(&partial, &metadata)
            .and_then(|()| frames.iter().try_for_each(|f| self.writer.write(f)));
        let closed = self.writer.close();
        let finished = written.and(closed).and_then(|()| {
            fs::rename(&partial, path).map_err(|e| -> Box<dyn std::error::Error> { e.into() })
        });
        if let Err(e) = finished {
            let _ = fs::remove_file(&partial);
            return Err(MotionError::Encode(e));
        }

        log::debug!(
            "Encoded {} frame(s) at {fps} fps to {}",
            frames.len(),
            path.display()
        );
        Ok(path.to_path_buf())
    }
}

/// `dir/.partial-name.ext`; the extension is kept so the container format
/// can still be inferred from it.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".partial-{name}"))
}
