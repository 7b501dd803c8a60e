use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use libmpv2::Mpv;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::{EngineFlags, SubtitleAppearance};
use crate::core::{EngineState, MediaEngine};
use crate::events::{EventBus, PlayerEvent, TimeUpdate};

/// How often mpv is polled for clock and state changes
const POLL_INTERVAL: Duration = Duration::from_millis(250);

struct MpvEngineInner {
    mpv: Mutex<Mpv>,
    state: Mutex<EngineState>,
    loaded: Mutex<bool>,
    /// Cleared on load, set by the first `play`
    started: AtomicBool,
}

impl MpvEngineInner {
    fn with_mpv<T>(&self, f: impl FnOnce(&Mpv) -> Result<T>) -> Result<T> {
        let mpv = self
            .mpv
            .lock()
            .map_err(|_| anyhow!("MPV handle poisoned"))?;
        f(&mpv)
    }

    fn set_state(&self, state: EngineState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    fn current_state(&self) -> EngineState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(EngineState::Error)
    }

    fn is_loaded(&self) -> bool {
        self.loaded.lock().map(|loaded| *loaded).unwrap_or(false)
    }

    fn set_loaded(&self, loaded: bool) {
        if let Ok(mut current) = self.loaded.lock() {
            *current = loaded;
        }
    }

    fn seconds(&self, property: &str) -> Duration {
        self.with_mpv(|mpv| {
            mpv.get_property::<f64>(property)
                .map_err(|e| anyhow!("{}: {:?}", property, e))
        })
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or_default()
    }

    fn flag(&self, property: &str) -> bool {
        self.with_mpv(|mpv| {
            mpv.get_property::<bool>(property)
                .map_err(|e| anyhow!("{}: {:?}", property, e))
        })
        .unwrap_or(false)
    }

    /// State as mpv currently reports it, or `None` when nothing is loaded
    fn observed_state(&self) -> Option<EngineState> {
        let current = self.current_state();
        if !self.is_loaded() || matches!(current, EngineState::Stopped | EngineState::Error) {
            return None;
        }

        let flags = EngineFlags {
            started: self.started.load(Ordering::SeqCst),
            ended: self.flag("eof-reached"),
            stalled: self.flag("paused-for-cache") || self.flag("seeking"),
            paused: self.flag("pause"),
            has_duration: !self.seconds("duration").is_zero(),
        };
        Some(flags.state())
    }
}

/// `MediaEngine` backed by libmpv.
///
/// mpv has no push notifications wired here; a background task polls the
/// clock and state and publishes changes on the `EventBus`.
pub struct MpvEngine {
    inner: Arc<MpvEngineInner>,
    poller: CancellationToken,
}

impl MpvEngine {
    pub fn new(event_bus: Arc<EventBus>) -> Result<Self> {
        info!("Creating MPV instance");
        let mpv =
            Mpv::new().map_err(|e| anyhow!("Failed to create MPV instance: {:?}", e))?;
        Self::configure(&mpv)?;

        let inner = Arc::new(MpvEngineInner {
            mpv: Mutex::new(mpv),
            state: Mutex::new(EngineState::Opening),
            loaded: Mutex::new(false),
            started: AtomicBool::new(false),
        });

        let poller = CancellationToken::new();
        tokio::spawn(Self::poll(inner.clone(), event_bus, poller.clone()));

        Ok(Self { inner, poller })
    }

    fn configure(mpv: &Mpv) -> Result<()> {
        let set = |name: &str, value: &str| {
            mpv.set_property(name, value)
                .map_err(|e| anyhow!("Failed to set {}: {:?}", name, e))
        };

        set("keep-open", "yes")?;
        set("hwdec", "auto-safe")?;
        set("input-default-bindings", "no")?;
        set("osc", "no")?;
        set("ytdl", "no")?;
        set("force-seekable", "yes")?;
        // Room for the configured gain above unity
        mpv.set_property("volume-max", 200.0)
            .map_err(|e| anyhow!("Failed to set volume-max: {:?}", e))?;

        if let Ok(version) = mpv.get_property::<String>("mpv-version") {
            info!("MPV version: {}", version);
        }
        Ok(())
    }

    async fn poll(inner: Arc<MpvEngineInner>, event_bus: Arc<EventBus>, token: CancellationToken) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        let mut last_state: Option<EngineState> = None;
        let mut last_time = Duration::ZERO;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {}
            }

            let Some(state) = inner.observed_state() else {
                let state = inner.current_state();
                if last_state != Some(state) && state.is_terminal() {
                    last_state = Some(state);
                    Self::publish(&event_bus, PlayerEvent::state_changed(state)).await;
                }
                continue;
            };

            if last_state != Some(state) {
                debug!("MPV state {:?} -> {:?}", last_state, state);
                inner.set_state(state);
                last_state = Some(state);
                Self::publish(&event_bus, PlayerEvent::state_changed(state)).await;
            }

            let time = inner.seconds("time-pos");
            if time != last_time {
                last_time = time;
                let update = TimeUpdate::new(time, inner.seconds("time-remaining"));
                trace!("MPV clock {:?}", update.time);
                Self::publish(&event_bus, PlayerEvent::time_changed(update)).await;
            }
        }
        debug!("MPV poller stopped");
    }

    async fn publish(event_bus: &EventBus, event: PlayerEvent) {
        if let Err(e) = event_bus.publish(event).await {
            warn!("Failed to publish engine event: {}", e);
        }
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        self.poller.cancel();
    }
}

#[async_trait]
impl MediaEngine for MpvEngine {
    async fn load_media(&self, url: &str) -> Result<()> {
        info!("Loading media: {}", url);
        self.inner.with_mpv(|mpv| {
            // Held until the screen decides between resuming and restarting
            mpv.set_property("pause", true)
                .map_err(|e| anyhow!("Failed to set pause=true: {:?}", e))?;
            mpv.command("loadfile", &[url, "replace"])
                .map_err(|e| anyhow!("Failed to load media: {:?}", e))
        })?;
        self.inner.started.store(false, Ordering::SeqCst);
        self.inner.set_loaded(true);
        self.inner.set_state(EngineState::Opening);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        debug!("Starting playback");
        self.inner.with_mpv(|mpv| {
            mpv.set_property("pause", false)
                .map_err(|e| anyhow!("Failed to set pause=false: {:?}", e))
        })?;
        self.inner.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        debug!("Pausing playback");
        self.inner.with_mpv(|mpv| {
            mpv.set_property("pause", true)
                .map_err(|e| anyhow!("Failed to set pause=true: {:?}", e))
        })
    }

    async fn stop(&self) -> Result<()> {
        debug!("Stopping playback");
        self.inner.with_mpv(|mpv| {
            mpv.command("stop", &[])
                .map_err(|e| anyhow!("Failed to stop: {:?}", e))
        })?;
        self.inner.set_loaded(false);
        self.inner.set_state(EngineState::Stopped);
        Ok(())
    }

    async fn is_playing(&self) -> bool {
        self.inner.is_loaded() && !self.inner.flag("pause") && !self.inner.flag("eof-reached")
    }

    async fn state(&self) -> EngineState {
        self.inner.current_state()
    }

    async fn position(&self) -> f32 {
        self.inner
            .with_mpv(|mpv| {
                mpv.get_property::<f64>("percent-pos")
                    .map_err(|e| anyhow!("percent-pos: {:?}", e))
            })
            .map(|percent| (percent / 100.0).clamp(0.0, 1.0) as f32)
            .unwrap_or(0.0)
    }

    async fn set_position(&self, position: f32) -> Result<()> {
        let percent = (f64::from(position) * 100.0).clamp(0.0, 100.0);
        debug!("Seeking to {:.1}%", percent);
        self.inner.with_mpv(|mpv| {
            mpv.command("seek", &[&percent.to_string(), "absolute-percent"])
                .map_err(|e| anyhow!("Failed to seek: {:?}", e))
        })
    }

    async fn time(&self) -> Duration {
        self.inner.seconds("time-pos")
    }

    async fn remaining_time(&self) -> Duration {
        self.inner.seconds("time-remaining")
    }

    async fn jump(&self, offset_secs: i64) -> Result<()> {
        debug!("Jumping {}s", offset_secs);
        self.inner.with_mpv(|mpv| {
            mpv.command("seek", &[&offset_secs.to_string(), "relative"])
                .map_err(|e| anyhow!("Failed to jump: {:?}", e))
        })
    }

    async fn set_volume(&self, volume: f64) -> Result<()> {
        // MPV expects volume in percent
        let mpv_volume = (volume * 100.0).clamp(0.0, 200.0);
        self.inner.with_mpv(|mpv| {
            mpv.set_property("volume", mpv_volume)
                .map_err(|e| anyhow!("Failed to set volume: {:?}", e))
        })
    }

    async fn open_subtitle_file(&self, path: &Path) -> Result<()> {
        let path = path
            .to_str()
            .context("Subtitle path is not valid UTF-8")?;
        info!("Adding subtitle file {}", path);
        self.inner.with_mpv(|mpv| {
            mpv.command("sub-add", &[path, "select"])
                .map_err(|e| anyhow!("Failed to add subtitle: {:?}", e))
        })
    }

    async fn disable_subtitles(&self) -> Result<()> {
        self.inner.with_mpv(|mpv| {
            mpv.set_property("sid", "no")
                .map_err(|e| anyhow!("Failed to disable subtitles: {:?}", e))
        })
    }

    async fn apply_subtitle_appearance(&self, appearance: &SubtitleAppearance) -> Result<()> {
        debug!("Applying subtitle appearance {:?}", appearance);
        let color = appearance.color_hex();
        self.inner.with_mpv(|mpv| {
            mpv.set_property("sub-font", appearance.font.as_str())
                .map_err(|e| anyhow!("Failed to set sub-font: {:?}", e))?;
            mpv.set_property("sub-font-size", f64::from(appearance.size))
                .map_err(|e| anyhow!("Failed to set sub-font-size: {:?}", e))?;
            mpv.set_property("sub-color", color.as_str())
                .map_err(|e| anyhow!("Failed to set sub-color: {:?}", e))?;
            mpv.set_property("sub-bold", appearance.bold)
                .map_err(|e| anyhow!("Failed to set sub-bold: {:?}", e))?;
            mpv.set_property("sub-codepage", appearance.encoding.as_str())
                .map_err(|e| anyhow!("Failed to set sub-codepage: {:?}", e))
        })
    }
}
