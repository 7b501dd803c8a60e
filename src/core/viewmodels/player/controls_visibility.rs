use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::PlayerViewModel;

/// Shared visibility of every overlay region (transport bar, buttons, title)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayVisibility {
    Visible,
    Hidden,
}

impl OverlayVisibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, OverlayVisibility::Visible)
    }

    pub fn toggled(&self) -> Self {
        match self {
            OverlayVisibility::Visible => OverlayVisibility::Hidden,
            OverlayVisibility::Hidden => OverlayVisibility::Visible,
        }
    }
}

/// Single-shot hide timer. A timer whose generation has been superseded is
/// ignored when it fires.
pub(super) struct IdleTimer {
    pub(super) generation: u64,
    pub(super) handle: JoinHandle<()>,
}

/// The hide timer only runs while there is something to get out of the way of
pub(super) fn should_arm_idle_timer(
    playing: bool,
    loading: bool,
    scrubbing: bool,
    controls_visible: bool,
) -> bool {
    playing && !loading && !scrubbing && controls_visible
}

impl PlayerViewModel {
    pub async fn toggle_controls_visible(&self) {
        let target = self.overlay.get_sync().toggled();
        self.set_controls_visible(target.is_visible()).await;
    }

    pub(super) async fn set_controls_visible(&self, visible: bool) {
        let target = if visible {
            OverlayVisibility::Visible
        } else {
            OverlayVisibility::Hidden
        };
        self.apply_overlay(target).await;

        if visible {
            self.reset_idle_timer().await;
        } else {
            self.state.lock().await.cancel_idle_timer();
        }
    }

    /// Publishes the overlay state without touching the idle timer
    async fn apply_overlay(&self, target: OverlayVisibility) {
        debug!("Controls -> {:?}", target);
        self.overlay.set(target).await;
        self.status_bar_hidden
            .set(self.platform.is_television() || !target.is_visible())
            .await;
    }

    /// Cancel any pending hide and arm a fresh one when the policy allows it.
    pub async fn reset_idle_timer(&self) {
        let playing = self.services.engine.is_playing().await;
        let loading = self.loading_visible.get_sync();
        let controls_visible = self.overlay.get_sync().is_visible();

        let mut state = self.state.lock().await;
        state.cancel_idle_timer();

        if !should_arm_idle_timer(playing, loading, state.scrubbing, controls_visible) {
            trace!(
                "Idle timer suppressed (playing: {}, loading: {}, scrubbing: {}, visible: {})",
                playing, loading, state.scrubbing, controls_visible
            );
            return;
        }

        state.timer_generation += 1;
        let generation = state.timer_generation;
        let delay = Duration::from_secs(self.config.playback.controls_hide_delay_secs);
        let vm = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            vm.idle_timer_exceeded(generation).await;
        });

        state.idle_timer = Some(IdleTimer { generation, handle });
    }

    async fn idle_timer_exceeded(&self, generation: u64) {
        {
            let mut state = self.state.lock().await;
            if state.idle_timer.as_ref().map(|timer| timer.generation) != Some(generation) {
                return;
            }
            // Detach rather than abort: this is the timer's own task
            state.idle_timer = None;
        }

        if self.overlay.get_sync().is_visible() {
            debug!("Idle timeout, hiding controls");
            self.apply_overlay(OverlayVisibility::Hidden).await;
        }
    }

    pub async fn idle_timer_armed(&self) -> bool {
        self.state.lock().await.idle_timer.is_some()
    }
}
