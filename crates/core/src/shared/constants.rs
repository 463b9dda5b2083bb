pub const CANONICAL_WIDTH: u32 = 600;
pub const CANONICAL_HEIGHT: u32 = 400;

pub const BLUR_KERNEL_SIZE: usize = 5;

/// Mean difference-map value a frame pair must exceed to be analyzed.
pub const ACTIVITY_THRESHOLD: f64 = 10.0;
/// Per-pixel summed squared difference above which a pixel counts as moving.
pub const PIXEL_THRESHOLD: f32 = 25.0;
/// Regions with a contour area at or below this (canonical pixels²) are noise.
pub const MIN_REGION_AREA: f64 = 500.0;

pub const STROKE_WIDTH: u32 = 2;
pub const HIGHLIGHT_COLOR: [u8; 3] = [255, 0, 0];

pub const DEFAULT_FPS: u32 = 15;
pub const MOTION_VIDEO_FOURCC: [u8; 4] = *b"mp4v";

pub const MOTION_OUTPUT_PATH: &str = "video files for testing/motion_output_segment.mp4";
pub const EVENT_LOG_PATH: &str = "event_log.txt";

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];
