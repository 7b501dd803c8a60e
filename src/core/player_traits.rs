// Platform-agnostic playback engine seam.
// Engines publish their state and clock changes on the EventBus; the
// player screen issues commands through this trait.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::player::SubtitleAppearance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

impl EngineState {
    /// States after which the screen has nothing left to play
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineState::Stopped | EngineState::Ended | EngineState::Error
        )
    }
}

#[async_trait]
pub trait MediaEngine: Send + Sync {
    async fn load_media(&self, url: &str) -> Result<()>;
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
    async fn is_playing(&self) -> bool;
    async fn state(&self) -> EngineState;
    /// Playback position as a fraction of the stream
    async fn position(&self) -> f32;
    async fn set_position(&self, position: f32) -> Result<()>;
    async fn time(&self) -> Duration;
    async fn remaining_time(&self) -> Duration;
    /// Relative seek; negative offsets jump backwards
    async fn jump(&self, offset_secs: i64) -> Result<()>;
    /// Gain where 1.0 is unity
    async fn set_volume(&self, volume: f64) -> Result<()>;
    async fn open_subtitle_file(&self, path: &Path) -> Result<()>;
    async fn disable_subtitles(&self) -> Result<()>;
    async fn apply_subtitle_appearance(&self, appearance: &SubtitleAppearance) -> Result<()>;
}
