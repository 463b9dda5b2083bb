use image::imageops::FilterType;
use image::{ImageBuffer, Rgb};

use crate::preprocessing::domain::frame_preprocessor::{FramePreprocessor, PreprocessError};
use crate::preprocessing::infrastructure::gaussian::{
    gaussian_kernel_1d, separable_gaussian_blur_with_kernel,
};
use crate::shared::frame::{ChannelOrder, Frame};

/// Resizes to a canonical resolution, converts to RGB, then applies a
/// Gaussian blur.
///
/// Resizing uses bilinear (triangle) interpolation and is skipped when the
/// frame is already at the canonical size. When downscaling, the triangle
/// filter widens its support with the scale factor and so anti-aliases,
/// unlike plain 2×2 bilinear sampling: fine detail is averaged away and
/// activity scores on large native videos come out lower.
pub struct CanonicalPreprocessor {
    width: u32,
    height: u32,
    kernel: Vec<f32>,
}

impl CanonicalPreprocessor {
    /// `kernel_size` must be odd; 1 disables smoothing.
    pub fn new(width: u32, height: u32, kernel_size: usize) -> Self {
        Self {
            width,
            height,
            kernel: gaussian_kernel_1d(kernel_size),
        }
    }

    fn resize(&self, frame: &Frame) -> Result<Vec<u8>, PreprocessError> {
        if frame.dimensions() == (self.width, self.height) {
            return Ok(frame.data().to_vec());
        }
        let view: ImageBuffer<Rgb<u8>, &[u8]> =
            ImageBuffer::from_raw(frame.width(), frame.height(), frame.data()).ok_or(
                PreprocessError::Buffer {
                    index: frame.index(),
                    width: frame.width(),
                    height: frame.height(),
                },
            )?;
        Ok(image::imageops::resize(&view, self.width, self.height, FilterType::Triangle).into_raw())
    }
}

impl FramePreprocessor for CanonicalPreprocessor {
    fn preprocess(&self, frame: &Frame) -> Result<Frame, PreprocessError> {
        if frame.channels() != 3 {
            return Err(PreprocessError::Channels {
                index: frame.index(),
                channels: frame.channels(),
            });
        }

        let resized = Frame::new(
            self.resize(frame)?,
            self.width,
            self.height,
            3,
            frame.order(),
            frame.index(),
        );
        let mut rgb = resized.to_order(ChannelOrder::Rgb);

        let mut temp = Vec::new();
        separable_gaussian_blur_with_kernel(
            rgb.data_mut(),
            self.width as usize,
            self.height as usize,
            3,
            &self.kernel,
            &mut temp,
        );
        Ok(rgb)
    }
}
