use anyhow::Result;
use async_trait::async_trait;
use popcorn_player::core::{EngineState, MediaEngine};
use popcorn_player::models::Episode;
use popcorn_player::player::SubtitleAppearance;
use popcorn_player::services::PlayerScreenDelegate;
use popcorn_player::utils::Dismissal;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Engine that only remembers what it was told
pub struct MockEngine {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub state: Arc<Mutex<EngineState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            state: Arc::new(Mutex::new(EngineState::Opening)),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn position_of(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaEngine for MockEngine {
    async fn load_media(&self, url: &str) -> Result<()> {
        self.record(format!("load_media({})", url));
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.record("play".to_string());
        *self.state.lock().unwrap() = EngineState::Playing;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record("pause".to_string());
        *self.state.lock().unwrap() = EngineState::Paused;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.record("stop".to_string());
        *self.state.lock().unwrap() = EngineState::Stopped;
        Ok(())
    }

    async fn is_playing(&self) -> bool {
        *self.state.lock().unwrap() == EngineState::Playing
    }

    async fn state(&self) -> EngineState {
        *self.state.lock().unwrap()
    }

    async fn position(&self) -> f32 {
        0.0
    }

    async fn set_position(&self, position: f32) -> Result<()> {
        self.record(format!("set_position({})", position));
        Ok(())
    }

    async fn time(&self) -> Duration {
        Duration::ZERO
    }

    async fn remaining_time(&self) -> Duration {
        Duration::ZERO
    }

    async fn jump(&self, offset_secs: i64) -> Result<()> {
        self.record(format!("jump({})", offset_secs));
        Ok(())
    }

    async fn set_volume(&self, volume: f64) -> Result<()> {
        self.record(format!("set_volume({:.2})", volume));
        Ok(())
    }

    async fn open_subtitle_file(&self, path: &Path) -> Result<()> {
        self.record(format!("open_subtitle({})", path.display()));
        Ok(())
    }

    async fn disable_subtitles(&self) -> Result<()> {
        self.record("disable_subtitles".to_string());
        Ok(())
    }

    async fn apply_subtitle_appearance(&self, appearance: &SubtitleAppearance) -> Result<()> {
        self.record(format!("subtitle_appearance({})", appearance.color_hex()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockDelegate {
    pub dismissals: Mutex<Vec<Dismissal>>,
    pub next_episodes: Mutex<Vec<Episode>>,
}

impl MockDelegate {
    pub fn dismissals(&self) -> Vec<Dismissal> {
        self.dismissals.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayerScreenDelegate for MockDelegate {
    async fn dismiss(&self, dismissal: Dismissal) {
        self.dismissals.lock().unwrap().push(dismissal);
    }

    async fn play_next(&self, episode: &Episode) {
        self.next_episodes.lock().unwrap().push(episode.clone());
    }
}
