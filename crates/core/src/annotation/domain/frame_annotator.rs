use crate::shared::frame::Frame;
use crate::shared::region::MotionRegion;

/// Domain interface for marking motion regions on a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) to avoid allocation.
pub trait FrameAnnotator: Send {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[MotionRegion],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
