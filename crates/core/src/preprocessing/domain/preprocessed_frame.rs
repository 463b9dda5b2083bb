use crate::shared::frame::Frame;

/// A decoded frame paired with its normalized, smoothed counterpart.
///
/// Both share the source frame index but own separate buffers: drawing on
/// `original` never touches `processed`.
#[derive(Clone, Debug)]
pub struct PreprocessedFrame {
    pub original: Frame,
    pub processed: Frame,
}

impl PreprocessedFrame {
    pub fn index(&self) -> usize {
        self.original.index()
    }
}
