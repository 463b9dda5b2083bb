use image::{ImageBuffer, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{HIGHLIGHT_COLOR, STROKE_WIDTH};
use crate::shared::frame::Frame;
use crate::shared::region::MotionRegion;

/// Draws a hollow bounding box around each region.
///
/// The outline covers `x..=x + width` and `y..=y + height` and grows inward
/// for strokes wider than one pixel. Parts falling outside the frame are
/// clipped.
pub struct RectangleAnnotator {
    color: [u8; 3],
    stroke_width: u32,
}

impl RectangleAnnotator {
    /// `color` is given in RGB and rearranged to each frame's channel order.
    pub fn new(color: [u8; 3], stroke_width: u32) -> Self {
        Self {
            color,
            stroke_width: stroke_width.max(1),
        }
    }
}

impl Default for RectangleAnnotator {
    fn default() -> Self {
        Self::new(HIGHLIGHT_COLOR, STROKE_WIDTH)
    }
}

impl FrameAnnotator for RectangleAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[MotionRegion],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if regions.is_empty() {
            return Ok(());
        }
        if frame.channels() != 3 {
            return Err(format!(
                "cannot annotate frame {} with {} channel(s)",
                frame.index(),
                frame.channels()
            )
            .into());
        }

        let color = Rgb(frame.order().arrange(self.color));
        let (width, height) = frame.dimensions();
        let mut canvas: ImageBuffer<Rgb<u8>, &mut [u8]> =
            ImageBuffer::from_raw(width, height, frame.data_mut())
                .ok_or("frame buffer does not match its dimensions")?;

        for region in regions {
            for inset in 0..self.stroke_width as i32 {
                let w = region.width + 1 - 2 * inset;
                let h = region.height + 1 - 2 * inset;
                if w <= 0 || h <= 0 {
                    break;
                }
                let rect = Rect::at(region.x + inset, region.y + inset).of_size(w as u32, h as u32);
                draw_hollow_rect_mut(&mut canvas, rect, color);
            }
        }
        Ok(())
    }
}
