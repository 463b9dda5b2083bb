use std::path::{Path, PathBuf};

use motionscope_core::playback::domain::video_display::{PlaybackError, VideoDisplay};

/// Hands a finished motion video to the operating system's default player.
///
/// An external player cannot be paused from here, so `pause` only reports
/// that fact.
#[derive(Default)]
pub struct SystemPlayer {
    loaded: Option<PathBuf>,
}

impl SystemPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }
}

impl VideoDisplay for SystemPlayer {
    fn load(&mut self, path: &Path) {
        self.loaded = Some(path.to_path_buf());
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let path = self.loaded.as_ref().ok_or(PlaybackError::NothingLoaded)?;
        open::that(path).map_err(|source| PlaybackError::Launch {
            path: path.clone(),
            source,
        })?;
        log::info!("Playing {}", path.display());
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        let path = self.loaded.as_ref().ok_or(PlaybackError::NothingLoaded)?;
        log::warn!(
            "Pause is not supported by the external player for {}",
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_without_video_fails() {
        let mut player = SystemPlayer::new();
        assert!(matches!(player.play(), Err(PlaybackError::NothingLoaded)));
    }

    #[test]
    fn test_pause_without_video_fails() {
        let mut player = SystemPlayer::new();
        assert!(matches!(player.pause(), Err(PlaybackError::NothingLoaded)));
    }

    #[test]
    fn test_load_then_pause() {
        let mut player = SystemPlayer::new();
        player.load(Path::new("motion.mp4"));
        assert_eq!(player.loaded(), Some(Path::new("motion.mp4")));
        assert!(player.pause().is_ok());
    }

    #[test]
    fn test_nothing_loaded_message() {
        assert_eq!(PlaybackError::NothingLoaded.to_string(), "No video loaded");
    }
}
