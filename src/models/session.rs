use super::{Episode, Media, Subtitle};
use std::path::{Path, PathBuf};

/// Everything the player screen needs to know about what it is playing.
///
/// Created by `PlayerViewModel::play`, mutated only by subtitle selection and
/// dropped together with the screen.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub media: Media,
    pub url: String,
    pub subtitles: Vec<Subtitle>,
    pub current_subtitle: Option<Subtitle>,
    /// Saved position as a fraction of the stream, 0.0 when starting fresh
    pub start_position: f32,
    pub next_episode: Option<Episode>,
    /// Scratch directory for downloaded subtitles
    pub directory: PathBuf,
}

impl PlaybackSession {
    pub fn new(
        media: Media,
        url: impl Into<String>,
        start_position: f32,
        next_episode: Option<Episode>,
        directory: impl AsRef<Path>,
    ) -> Self {
        let subtitles = media.subtitles().map(<[Subtitle]>::to_vec).unwrap_or_default();
        Self {
            media,
            url: url.into(),
            subtitles,
            current_subtitle: None,
            start_position: start_position.clamp(0.0, 1.0),
            next_episode,
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn has_saved_position(&self) -> bool {
        self.start_position > 0.0
    }

    /// First subtitle whose language matches, if any
    pub fn subtitle_for_language(&self, language: &str) -> Option<&Subtitle> {
        self.subtitles.iter().find(|s| s.language == language)
    }
}
