use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("No video loaded")]
    NothingLoaded,
    #[error("failed to launch player for {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Surface that can show a finished motion video.
///
/// The pipeline only hands over the artifact path; rendering, seeking and
/// controls belong to the implementation.
pub trait VideoDisplay {
    fn load(&mut self, path: &Path);

    /// Fails with [`PlaybackError::NothingLoaded`] before a successful `load`.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self) -> Result<(), PlaybackError>;
}
