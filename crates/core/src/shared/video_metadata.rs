use std::path::PathBuf;

/// Stream-level facts about a video, as reported by a reader or handed to
/// a writer.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Metadata for an encoder output derived from its first frame.
    pub fn for_output(width: u32, height: u32, fps: u32, total_frames: usize) -> Self {
        Self {
            width,
            height,
            fps: fps as f64,
            total_frames,
            codec: "mpeg4".to_string(),
            source_path: None,
        }
    }
}
