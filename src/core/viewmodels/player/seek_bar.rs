use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use super::PlayerViewModel;
use crate::core::EngineState;
use crate::utils::{PlayerResult, format_offset};

impl PlayerViewModel {
    /// The user put a finger on the position control.
    pub async fn begin_scrubbing(&self) {
        let engine_state = self.services.engine.state().await;
        {
            let mut state = self.state.lock().await;
            state.scrubbing = true;
            state.state_before_scrubbing = Some(engine_state);
        }
        self.is_scrubbing.set(true).await;
        self.reset_idle_timer().await;
    }

    /// The position control moved while scrubbing: update labels and preview.
    pub async fn position_slider_did_drag(&self, progress: f32) {
        if !progress.is_finite() {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        self.progress.set(progress).await;

        let engine = &self.services.engine;
        let duration = engine.time().await + engine.remaining_time().await;
        let preview_time = duration.mul_f32(progress);

        let preview_ms = preview_time.as_millis() as i64;
        let duration_ms = duration.as_millis() as i64;
        self.elapsed_label.set(format_offset(preview_ms)).await;
        self.remaining_label
            .set(format_offset(preview_ms - duration_ms))
            .await;

        self.request_preview_frame(preview_time).await;
    }

    /// The user let go of the position control.
    /// A non-finite `progress` leaves the position where it was.
    pub async fn end_scrubbing(&self, progress: f32) -> PlayerResult<()> {
        let before = {
            let mut state = self.state.lock().await;
            state.scrubbing = false;
            self.is_scrubbing.set(false).await;
            self.screenshot.set(None).await;
            state.state_before_scrubbing.take()
        };

        if progress.is_finite() {
            self.position_slider_action(progress).await?;
        }

        let engine = &self.services.engine;
        if before == Some(EngineState::Playing) && !engine.is_playing().await {
            self.start_engine().await?;
        }
        Ok(())
    }

    /// Seek to `progress` (fraction of the stream).
    pub async fn position_slider_action(&self, progress: f32) -> PlayerResult<()> {
        self.reset_idle_timer().await;
        if !progress.is_finite() {
            return Ok(());
        }
        let progress = progress.clamp(0.0, 1.0);
        self.progress.set(progress).await;
        self.services.engine.set_position(progress).await?;
        Ok(())
    }

    async fn request_preview_frame(&self, time: Duration) {
        let Some(grabber) = self.services.frame_grabber.clone() else {
            return;
        };

        let mut state = self.state.lock().await;
        let Some(url) = state.session.as_ref().map(|session| session.url.clone()) else {
            return;
        };

        let screen = Arc::downgrade(&self.state);
        let screenshot = self.screenshot.clone();
        let task = tokio::spawn(async move {
            let frame = match grabber.frame_at(&url, time).await {
                Ok(frame) => frame,
                Err(e) => {
                    debug!("No preview frame at {:?}: {}", time, e);
                    return;
                }
            };

            // The screen may have closed, or the finger lifted, in the meantime
            let Some(screen) = screen.upgrade() else {
                return;
            };
            let state = screen.lock().await;
            if state.scrubbing {
                screenshot.set(Some(frame)).await;
            } else {
                trace!("Dropping stale preview frame at {:?}", time);
            }
        });

        // Only the latest drag position matters
        if let Some(previous) = state.preview_task.replace(task) {
            previous.abort();
        }
    }
}
