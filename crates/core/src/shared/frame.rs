use ndarray::{ArrayView3, ArrayViewMut3};

/// Byte order of the three color channels inside a [`Frame`].
///
/// Decoders hand out frames in the container's native `Bgr` order; every
/// numeric comparison works on `Rgb` frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Bgr,
    Rgb,
}

impl ChannelOrder {
    /// Arranges an RGB color triple in this channel order.
    pub fn arrange(self, rgb: [u8; 3]) -> [u8; 3] {
        match self {
            ChannelOrder::Rgb => rgb,
            ChannelOrder::Bgr => [rgb[2], rgb[1], rgb[0]],
        }
    }
}

/// A single video frame: contiguous 8-bit pixels in row-major order.
///
/// Carries its resolution, channel count and channel order so stages can
/// check what they were handed instead of trusting a raw buffer.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    order: ChannelOrder,
    index: usize,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        order: ChannelOrder,
        index: usize,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            order,
            index,
        }
    }

    /// Three-channel frame filled with a single color given in RGB.
    pub fn filled(width: u32, height: u32, order: ChannelOrder, rgb: [u8; 3], index: usize) -> Self {
        let pixel = order.arrange(rgb);
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(data, width, height, 3, order, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns a copy of this frame with the channel order swapped to `order`.
    pub fn to_order(&self, order: ChannelOrder) -> Frame {
        if order == self.order || self.channels != 3 {
            return Frame { order, ..self.clone() };
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
        Frame::new(data, self.width, self.height, 3, order, self.index)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
