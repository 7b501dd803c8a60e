use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{Episode, MediaId, MediaKind, Subtitle, WatchStatus};
use crate::utils::Dismissal;

/// Fetches subtitle files to local disk so the engine can open them
#[async_trait]
pub trait SubtitleService: Send + Sync {
    async fn download(&self, subtitle: &Subtitle, directory: &Path) -> Result<PathBuf>;
}

/// Write side of the watched list
#[async_trait]
pub trait WatchProgressStore: Send + Sync {
    async fn set_current_progress(
        &self,
        media_id: &MediaId,
        kind: MediaKind,
        progress: f32,
        status: WatchStatus,
    ) -> Result<()>;
}

/// The streaming session feeding the engine
#[async_trait]
pub trait StreamingService: Send + Sync {
    /// Fraction of the stream already available locally
    async fn buffer_progress(&self) -> f32;
    async fn cancel_streaming(&self, delete_data: bool) -> Result<()>;
}

/// Still-frame extraction for the scrubbing preview
#[async_trait]
pub trait FrameGrabber: Send + Sync {
    /// Encoded image bytes of the frame at `time`
    async fn frame_at(&self, url: &str, time: Duration) -> Result<Vec<u8>>;
}

/// Navigation hooks owned by whoever presented the player screen
#[async_trait]
pub trait PlayerScreenDelegate: Send + Sync {
    async fn dismiss(&self, dismissal: Dismissal);

    async fn play_next(&self, _episode: &Episode) {}

    async fn stop_theme_song(&self) {}
}
