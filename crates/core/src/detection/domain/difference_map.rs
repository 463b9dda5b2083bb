use image::{GrayImage, ImageBuffer, Luma};
use ndarray::{Array2, Axis, Zip};

use crate::shared::frame::Frame;
use crate::shared::motion_error::MotionError;

/// Per-pixel squared difference between two frames, summed over channels.
///
/// Shape is `(height, width)`; every value is non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct DifferenceMap {
    values: Array2<f32>,
}

impl DifferenceMap {
    /// Computes `Σ_c (current - previous)²` for every pixel.
    ///
    /// Both frames must have the same resolution and channel count.
    pub fn between(previous: &Frame, current: &Frame) -> Result<Self, MotionError> {
        if previous.dimensions() != current.dimensions()
            || previous.channels() != current.channels()
        {
            return Err(MotionError::FrameMismatch {
                index: current.index(),
                expected: describe(previous),
                actual: describe(current),
            });
        }

        let prev = previous.as_ndarray();
        let curr = current.as_ndarray();
        let mut values = Array2::<f32>::zeros((current.height() as usize, current.width() as usize));

        Zip::from(&mut values)
            .and(prev.lanes(Axis(2)))
            .and(curr.lanes(Axis(2)))
            .for_each(|v, p, c| {
                *v = p
                    .iter()
                    .zip(c.iter())
                    .map(|(&a, &b)| {
                        let d = b as f32 - a as f32;
                        d * d
                    })
                    .sum();
            });

        Ok(Self { values })
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn width(&self) -> u32 {
        self.values.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.values.nrows() as u32
    }

    /// Arithmetic mean over all pixels; 0 for an empty map.
    pub fn activity(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.values.iter().map(|&v| v as f64).sum();
        sum / self.values.len() as f64
    }

    /// Pixels strictly above `threshold` become 255, everything else 0.
    pub fn binarize(&self, threshold: f32) -> GrayImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            if self.values[[y as usize, x as usize]] > threshold {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }
}

fn describe(frame: &Frame) -> String {
    format!(
        "{}x{}x{} {:?}",
        frame.width(),
        frame.height(),
        frame.channels(),
        frame.order()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::ChannelOrder;
    use approx::assert_relative_eq;

    fn rgb(width: u32, height: u32, color: [u8; 3]) -> Frame {
        Frame::filled(width, height, ChannelOrder::Rgb, color, 0)
    }

    #[test]
    fn test_identical_frames_have_zero_activity() {
        let a = rgb(6, 4, [40, 50, 60]);
        let map = DifferenceMap::between(&a, &a.clone()).unwrap();
        assert_eq!(map.width(), 6);
        assert_eq!(map.height(), 4);
        assert!(map.values().iter().all(|&v| v == 0.0));
        assert_relative_eq!(map.activity(), 0.0);
    }

    #[test]
    fn test_channels_are_summed_not_averaged() {
        let a = rgb(1, 1, [0, 0, 0]);
        let b = rgb(1, 1, [1, 2, 3]);
        let map = DifferenceMap::between(&a, &b).unwrap();
        assert_relative_eq!(map.values()[[0, 0]], 1.0 + 4.0 + 9.0);
    }

    #[test]
    fn test_values_are_non_negative_in_both_directions() {
        let dark = rgb(3, 3, [10, 10, 10]);
        let bright = rgb(3, 3, [250, 0, 128]);
        for map in [
            DifferenceMap::between(&dark, &bright).unwrap(),
            DifferenceMap::between(&bright, &dark).unwrap(),
        ] {
            assert!(map.values().iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_full_white_change_per_pixel_value() {
        let black = rgb(2, 2, [0, 0, 0]);
        let white = rgb(2, 2, [255, 255, 255]);
        let map = DifferenceMap::between(&black, &white).unwrap();
        assert_relative_eq!(map.activity(), 3.0 * 255.0 * 255.0);
    }

    #[test]
    fn test_activity_is_mean_of_map() {
        // one pixel of four changes by (2, 0, 0) -> map [4, 0, 0, 0]
        let a = rgb(2, 2, [0, 0, 0]);
        let mut b = a.clone();
        b.data_mut()[0] = 2;
        let map = DifferenceMap::between(&a, &b).unwrap();
        assert_relative_eq!(map.activity(), 1.0);
    }

    #[test]
    fn test_binarize_is_strictly_greater() {
        let a = rgb(3, 1, [0, 0, 0]);
        let mut b = a.clone();
        // pixel 0: 25 (5²) -> stays 0; pixel 1: 36 (6²) -> 255
        b.data_mut()[0] = 5;
        b.data_mut()[3] = 6;
        let mask = DifferenceMap::between(&a, &b).unwrap().binarize(25.0);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(1, 0).0[0], 255);
        assert_eq!(mask.get_pixel(2, 0).0[0], 0);
    }

    #[test]
    fn test_mismatched_frames_are_rejected() {
        let a = rgb(4, 4, [0, 0, 0]);
        let b = rgb(4, 2, [0, 0, 0]);
        assert!(matches!(
            DifferenceMap::between(&a, &b),
            Err(MotionError::FrameMismatch { .. })
        ));
    }
}
