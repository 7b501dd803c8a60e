use tracing::warn;

use super::PlayerViewModel;
use crate::core::EngineState;
use crate::models::WatchStatus;

/// Watched-list status recorded for an engine state, if any
pub(super) fn status_for(state: EngineState) -> Option<WatchStatus> {
    match state {
        EngineState::Stopped | EngineState::Ended | EngineState::Error => {
            Some(WatchStatus::Finished)
        }
        EngineState::Paused => Some(WatchStatus::Paused),
        EngineState::Playing => Some(WatchStatus::Watching),
        EngineState::Opening | EngineState::Buffering => None,
    }
}

impl PlayerViewModel {
    pub(super) async fn report_progress(&self, engine_state: EngineState) {
        let Some(status) = status_for(engine_state) else {
            return;
        };

        let Some((media_id, kind)) = self
            .state
            .lock()
            .await
            .session
            .as_ref()
            .map(|session| (session.media.id().clone(), session.media.kind()))
        else {
            return;
        };

        let progress = self.progress.get_sync();
        if let Err(e) = self
            .services
            .progress_store
            .set_current_progress(&media_id, kind, progress, status)
            .await
        {
            warn!("Failed to record progress for {}: {}", media_id, e);
        }
    }
}
