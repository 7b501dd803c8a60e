use std::sync::Arc;
use tracing::{debug, info, warn};

use super::PlayerViewModel;
use crate::models::Subtitle;
use crate::utils::{PlayerError, PlayerResult};

impl PlayerViewModel {
    /// Switch subtitles. `None` turns them off.
    ///
    /// Downloads run in the background so loading the screen never waits on
    /// the subtitle server. A newer selection aborts the pending download,
    /// and a finished download is only opened in the engine if its subtitle
    /// is still the selected one.
    pub async fn select_subtitle(&self, subtitle: Option<Subtitle>) -> PlayerResult<()> {
        let directory = {
            let mut state = self.state.lock().await;
            let session = state
                .session
                .as_mut()
                .ok_or(PlayerError::NoSession("select_subtitle"))?;
            session.current_subtitle = subtitle.clone();
            let directory = session.directory.clone();
            if let Some(pending) = state.subtitle_task.take() {
                pending.abort();
            }
            directory
        };
        self.current_subtitle.set(subtitle.clone()).await;

        let Some(subtitle) = subtitle else {
            debug!("Subtitles disabled");
            self.services.engine.disable_subtitles().await?;
            return Ok(());
        };

        let downloader = self.services.subtitles.clone();
        let engine = self.services.engine.clone();
        let screen = Arc::downgrade(&self.state);

        let handle = tokio::spawn(async move {
            let path = match downloader.download(&subtitle, &directory).await {
                Ok(path) => path,
                Err(e) => {
                    warn!("Failed to download {} subtitle: {}", subtitle.language, e);
                    return;
                }
            };

            let Some(screen) = screen.upgrade() else {
                return;
            };
            let still_selected = screen
                .lock()
                .await
                .session
                .as_ref()
                .is_some_and(|session| session.current_subtitle.as_ref() == Some(&subtitle));
            if !still_selected {
                debug!("Subtitle {} was replaced during download", subtitle.name);
                return;
            }

            info!("Opening subtitle {} from {}", subtitle.name, path.display());
            if let Err(e) = engine.open_subtitle_file(&path).await {
                warn!("Engine refused subtitle {}: {}", subtitle.name, e);
            }
        });

        self.state.lock().await.subtitle_task = Some(handle);
        Ok(())
    }

    /// Subtitles offered for the current media
    pub async fn available_subtitles(&self) -> Vec<Subtitle> {
        self.state
            .lock()
            .await
            .session
            .as_ref()
            .map(|session| session.subtitles.clone())
            .unwrap_or_default()
    }
}
