//! Playback screen controller.
//!
//! `PlayerViewModel` sits between the playback engine and whatever front end
//! draws the player screen. Gestures come in as async method calls, engine
//! notifications arrive over the `EventBus`, and everything the screen shows
//! is published through `Property` cells.

mod continue_watching;
mod controls_visibility;
mod progress_tracker;
mod seek_bar;
mod subtitles;
mod volume;


pub use continue_watching::{ContinueWatchingChoice, ContinueWatchingPrompt};
pub use controls_visibility::OverlayVisibility;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Property, PropertySubscriber, ViewModel};
use crate::config::Config;
use crate::core::{EngineState, MediaEngine};
use crate::events::{EventBus, EventPayload, EventType, PlayerEvent, TimeUpdate};
use crate::models::{Episode, Media, PlaybackSession, Subtitle};
use crate::player::SubtitleAppearance;
use crate::services::{
    FrameGrabber, PlayerScreenDelegate, StreamingService, SubtitleService, WatchProgressStore,
};
use crate::utils::{Platform, PlayerError, PlayerResult, format_elapsed, format_remaining};
use controls_visibility::IdleTimer;

/// External collaborators of the player screen
#[derive(Clone)]
pub struct PlayerServices {
    pub engine: Arc<dyn MediaEngine>,
    pub subtitles: Arc<dyn SubtitleService>,
    pub progress_store: Arc<dyn WatchProgressStore>,
    pub streaming: Arc<dyn StreamingService>,
    /// Scrubbing previews are skipped without one
    pub frame_grabber: Option<Arc<dyn FrameGrabber>>,
    pub delegate: Arc<dyn PlayerScreenDelegate>,
}

/// Icon the handheld play/pause button should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPauseIcon {
    Play,
    Pause,
}

#[derive(Default)]
struct ScreenState {
    session: Option<PlaybackSession>,
    idle_timer: Option<IdleTimer>,
    timer_generation: u64,
    scrubbing: bool,
    state_before_scrubbing: Option<EngineState>,
    preview_task: Option<tokio::task::JoinHandle<()>>,
    subtitle_task: Option<tokio::task::JoinHandle<()>>,
    /// Set once playback was asked to start or reported playing
    started: bool,
    finished: bool,
    listener: Option<CancellationToken>,
}

impl ScreenState {
    fn cancel_idle_timer(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.handle.abort();
        }
    }

    fn cancel_preview(&mut self) {
        if let Some(preview) = self.preview_task.take() {
            preview.abort();
        }
    }

    fn cancel_subtitle_download(&mut self) {
        if let Some(download) = self.subtitle_task.take() {
            download.abort();
        }
    }
}

#[derive(Clone)]
pub struct PlayerViewModel {
    services: PlayerServices,
    config: Arc<Config>,
    platform: Platform,
    state: Arc<Mutex<ScreenState>>,
    overlay: Property<OverlayVisibility>,
    status_bar_hidden: Property<bool>,
    loading_visible: Property<bool>,
    progress: Property<f32>,
    buffer_progress: Property<f32>,
    elapsed_label: Property<String>,
    remaining_label: Property<String>,
    play_pause_icon: Property<PlayPauseIcon>,
    subtitle_switcher_visible: Property<bool>,
    current_subtitle: Property<Option<Subtitle>>,
    is_scrubbing: Property<bool>,
    screenshot: Property<Option<Vec<u8>>>,
    continue_watching: Property<Option<ContinueWatchingPrompt>>,
    volume: Property<f64>,
}

impl std::fmt::Debug for PlayerViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerViewModel")
            .field("platform", &self.platform)
            .field("overlay", &self.overlay.get_sync())
            .field("loading_visible", &self.loading_visible.get_sync())
            .field("progress", &self.progress.get_sync())
            .finish()
    }
}

impl PlayerViewModel {
    pub fn new(services: PlayerServices, config: Arc<Config>, platform: Platform) -> Self {
        Self {
            services,
            config,
            platform,
            state: Arc::new(Mutex::new(ScreenState::default())),
            overlay: Property::new(OverlayVisibility::Hidden, "overlay"),
            status_bar_hidden: Property::new(true, "status_bar_hidden"),
            loading_visible: Property::new(true, "loading_visible"),
            progress: Property::new(0.0, "progress"),
            buffer_progress: Property::new(0.0, "buffer_progress"),
            elapsed_label: Property::new(format_elapsed(Duration::ZERO), "elapsed_label"),
            remaining_label: Property::new(format_remaining(Duration::ZERO), "remaining_label"),
            play_pause_icon: Property::new(PlayPauseIcon::Play, "play_pause_icon"),
            subtitle_switcher_visible: Property::new(false, "subtitle_switcher_visible"),
            current_subtitle: Property::new(None, "current_subtitle"),
            is_scrubbing: Property::new(false, "is_scrubbing"),
            screenshot: Property::new(None, "screenshot"),
            continue_watching: Property::new(None, "continue_watching"),
            volume: Property::new(1.0, "volume"),
        }
    }

    /// Prepare the screen for `media`. `from_position` is the saved fraction
    /// offered on the continue-watching prompt.
    pub async fn play(
        &self,
        media: Media,
        url: impl Into<String>,
        from_position: f32,
        next_episode: Option<Episode>,
        directory: impl AsRef<Path>,
    ) {
        let session = PlaybackSession::new(media, url, from_position, next_episode, directory);
        info!(
            "Preparing playback of {} from {:.3}",
            session.media.id(),
            session.start_position
        );

        {
            let mut state = self.state.lock().await;
            state.cancel_idle_timer();
            state.cancel_preview();
            state.cancel_subtitle_download();
            state.session = Some(session);
            state.started = false;
            state.finished = false;
            state.scrubbing = false;
            state.state_before_scrubbing = None;
        }
        self.loading_visible.set(true).await;
        self.is_scrubbing.set(false).await;
        self.screenshot.set(None).await;
        self.continue_watching.set(None).await;
        self.current_subtitle.set(None).await;
    }

    /// Hand the media to the engine and apply the configured look.
    pub async fn view_did_load(&self) -> PlayerResult<()> {
        let (url, has_subtitles, selected) = {
            let state = self.state.lock().await;
            let session = state
                .session
                .as_ref()
                .ok_or(PlayerError::NoSession("view_did_load"))?;
            let preferred = self
                .config
                .subtitles
                .language
                .as_deref()
                .and_then(|language| session.subtitle_for_language(language))
                .cloned();
            (
                session.url.clone(),
                !session.subtitles.is_empty(),
                session.current_subtitle.clone().or(preferred),
            )
        };

        let engine = &self.services.engine;
        engine.load_media(&url).await?;
        self.progress.set(0.0).await;
        engine.set_volume(self.config.playback.engine_volume).await?;
        engine
            .apply_subtitle_appearance(&SubtitleAppearance::from(&self.config.subtitles))
            .await?;

        self.select_subtitle(selected).await?;

        if !self.platform.is_television() {
            self.subtitle_switcher_visible.set(has_subtitles).await;
        }
        Ok(())
    }

    /// Start listening to engine notifications.
    pub async fn view_will_appear(&self, event_bus: &EventBus) {
        let token = CancellationToken::new();
        let mut subscriber = event_bus.subscribe_to_types(vec![
            EventType::EngineStateChanged,
            EventType::EngineTimeChanged,
        ]);

        if let Some(previous) = self.state.lock().await.listener.replace(token.clone()) {
            previous.cancel();
        }

        let vm = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = subscriber.recv() => match event {
                        Ok(event) => vm.handle_event(event).await,
                        Err(e) => {
                            debug!("Engine notifications ended: {}", e);
                            break;
                        }
                    },
                }
            }
        });
    }

    pub async fn view_will_disappear(&self) {
        if let Err(e) = self.services.engine.pause().await {
            warn!("Failed to pause engine on disappear: {}", e);
        }

        let mut state = self.state.lock().await;
        if let Some(listener) = state.listener.take() {
            listener.cancel();
        }
        state.cancel_idle_timer();
        state.cancel_subtitle_download();
    }

    async fn handle_event(&self, event: PlayerEvent) {
        match event.payload {
            EventPayload::State { state } => self.handle_state_changed(state).await,
            EventPayload::Time(update) => self.handle_time_changed(update).await,
        }
    }

    pub async fn handle_state_changed(&self, engine_state: EngineState) {
        debug!("Engine state changed to {:?}", engine_state);

        let next_episode = {
            let mut state = self.state.lock().await;
            match engine_state {
                EngineState::Playing => state.started = true,
                // The engine holds freshly loaded media paused until told to play
                EngineState::Paused if !state.started => {
                    debug!("Ignoring pause before playback started");
                    return;
                }
                _ => {}
            }
            state
                .session
                .as_ref()
                .and_then(|session| session.next_episode.clone())
        };

        self.report_progress(engine_state).await;

        match engine_state {
            EngineState::Stopped | EngineState::Ended | EngineState::Error => {
                if engine_state == EngineState::Ended
                    && let Some(episode) = next_episode
                {
                    info!("Playback ended, handing over to {}", episode.season_episode());
                    self.services.delegate.play_next(&episode).await;
                }
                self.did_finish_playing().await;
            }
            EngineState::Paused => {
                if self.platform.is_television() {
                    if !self.overlay.get_sync().is_visible() {
                        self.set_controls_visible(true).await;
                    }
                } else {
                    self.play_pause_icon.set(PlayPauseIcon::Play).await;
                }
                self.reset_idle_timer().await;
            }
            EngineState::Playing => {
                if !self.platform.is_television() {
                    self.play_pause_icon.set(PlayPauseIcon::Pause).await;
                }
                self.reset_idle_timer().await;
            }
            EngineState::Buffering => {
                if !self.overlay.get_sync().is_visible() {
                    self.set_controls_visible(true).await;
                }
            }
            EngineState::Opening => {}
        }
    }

    pub async fn handle_time_changed(&self, update: TimeUpdate) {
        if self.loading_visible.get_sync() {
            self.loading_visible.set(false).await;
            self.set_controls_visible(true).await;
        }

        self.buffer_progress
            .set(self.services.streaming.buffer_progress().await)
            .await;
        self.elapsed_label.set(format_elapsed(update.time)).await;
        self.remaining_label
            .set(format_remaining(update.remaining))
            .await;

        if !self.state.lock().await.scrubbing {
            self.progress.set(update.position).await;
        }
    }

    pub async fn play_and_pause(&self) -> PlayerResult<()> {
        let engine = &self.services.engine;
        if engine.is_playing().await {
            engine.pause().await?;
        } else {
            self.start_engine().await?;
        }
        Ok(())
    }

    /// Issue `play` and remember that playback was started.
    pub(super) async fn start_engine(&self) -> PlayerResult<()> {
        self.state.lock().await.started = true;
        self.services.engine.play().await?;
        Ok(())
    }

    pub async fn fast_forward(&self) -> PlayerResult<()> {
        let offset = self.config.playback.long_jump_secs as i64;
        self.services.engine.jump(offset).await?;
        Ok(())
    }

    pub async fn rewind(&self) -> PlayerResult<()> {
        let offset = self.config.playback.long_jump_secs as i64;
        self.services.engine.jump(-offset).await?;
        Ok(())
    }

    /// Tear down playback and leave the screen. Runs once per session.
    pub async fn did_finish_playing(&self) {
        {
            let mut state = self.state.lock().await;
            if state.finished {
                return;
            }
            state.finished = true;
            state.cancel_idle_timer();
        }

        if let Err(e) = self.services.engine.stop().await {
            warn!("Failed to stop engine: {}", e);
        }

        let delete_data = self.config.playback.remove_cache_on_player_exit;
        if let Err(e) = self.services.streaming.cancel_streaming(delete_data).await {
            warn!("Failed to cancel streaming: {}", e);
        }

        self.services
            .delegate
            .dismiss(self.platform.dismissal())
            .await;
    }

    pub async fn session(&self) -> Option<PlaybackSession> {
        self.state.lock().await.session.clone()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn overlay(&self) -> &Property<OverlayVisibility> {
        &self.overlay
    }

    pub fn status_bar_hidden(&self) -> &Property<bool> {
        &self.status_bar_hidden
    }

    pub fn loading_visible(&self) -> &Property<bool> {
        &self.loading_visible
    }

    pub fn progress(&self) -> &Property<f32> {
        &self.progress
    }

    pub fn buffer_progress(&self) -> &Property<f32> {
        &self.buffer_progress
    }

    pub fn elapsed_label(&self) -> &Property<String> {
        &self.elapsed_label
    }

    pub fn remaining_label(&self) -> &Property<String> {
        &self.remaining_label
    }

    pub fn play_pause_icon(&self) -> &Property<PlayPauseIcon> {
        &self.play_pause_icon
    }

    pub fn subtitle_switcher_visible(&self) -> &Property<bool> {
        &self.subtitle_switcher_visible
    }

    pub fn current_subtitle(&self) -> &Property<Option<Subtitle>> {
        &self.current_subtitle
    }

    pub fn is_scrubbing(&self) -> &Property<bool> {
        &self.is_scrubbing
    }

    pub fn screenshot(&self) -> &Property<Option<Vec<u8>>> {
        &self.screenshot
    }

    pub fn continue_watching(&self) -> &Property<Option<ContinueWatchingPrompt>> {
        &self.continue_watching
    }

    pub fn volume(&self) -> &Property<f64> {
        &self.volume
    }
}

#[async_trait::async_trait]
impl ViewModel for PlayerViewModel {
    async fn initialize(&self, event_bus: Arc<EventBus>) {
        self.view_will_appear(&event_bus).await;
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "overlay" => Some(self.overlay.subscribe()),
            "status_bar_hidden" => Some(self.status_bar_hidden.subscribe()),
            "loading_visible" => Some(self.loading_visible.subscribe()),
            "progress" => Some(self.progress.subscribe()),
            "buffer_progress" => Some(self.buffer_progress.subscribe()),
            "elapsed_label" => Some(self.elapsed_label.subscribe()),
            "remaining_label" => Some(self.remaining_label.subscribe()),
            "play_pause_icon" => Some(self.play_pause_icon.subscribe()),
            "subtitle_switcher_visible" => Some(self.subtitle_switcher_visible.subscribe()),
            "current_subtitle" => Some(self.current_subtitle.subscribe()),
            "is_scrubbing" => Some(self.is_scrubbing.subscribe()),
            "screenshot" => Some(self.screenshot.subscribe()),
            "continue_watching" => Some(self.continue_watching.subscribe()),
            "volume" => Some(self.volume.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        if self.state.lock().await.scrubbing {
            return;
        }
        let position = self.services.engine.position().await;
        self.progress.set(position).await;
    }

    fn dispose(&self) {
        // Best effort: a held lock means a gesture is in flight and the
        // disappear path will clean up
        if let Ok(mut state) = self.state.try_lock() {
            if let Some(listener) = state.listener.take() {
                listener.cancel();
            }
            state.cancel_idle_timer();
            state.cancel_preview();
            state.cancel_subtitle_download();
        }
    }
}
