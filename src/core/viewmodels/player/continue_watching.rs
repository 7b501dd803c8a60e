use tracing::info;

use super::PlayerViewModel;
use crate::utils::{PlayerError, PlayerResult, PromptStyle, TraitCollection};

/// Question shown when the media was partially watched before
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueWatchingPrompt {
    pub style: PromptStyle,
    pub title: String,
    pub message: String,
    pub resume_label: String,
    pub restart_label: String,
    pub start_position: f32,
}

impl ContinueWatchingPrompt {
    fn new(style: PromptStyle, start_position: f32) -> Self {
        Self {
            style,
            title: "Continue watching?".to_string(),
            message: "Looks like you've already started watching this, would you like to \
                      start from the start or continue where you left off."
                .to_string(),
            resume_label: "Yes, continue from where I left off".to_string(),
            restart_label: "Nope, play from the beginning".to_string(),
            start_position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueWatchingChoice {
    Resume,
    Restart,
}

impl PlayerViewModel {
    /// Start playback, asking first when there is a saved position.
    pub async fn view_did_appear(&self, traits: TraitCollection) -> PlayerResult<()> {
        let engine = &self.services.engine;
        if engine.is_playing().await {
            return Ok(());
        }

        let (start_position, has_saved_position) = self
            .state
            .lock()
            .await
            .session
            .as_ref()
            .map(|session| (session.start_position, session.has_saved_position()))
            .ok_or(PlayerError::NoSession("view_did_appear"))?;

        if has_saved_position {
            info!("Offering to resume from {:.3}", start_position);
            self.continue_watching
                .set(Some(ContinueWatchingPrompt::new(
                    traits.prompt_style(),
                    start_position,
                )))
                .await;
            if !self.overlay.get_sync().is_visible() {
                self.set_controls_visible(true).await;
            }
        } else {
            self.start_engine().await?;
        }

        self.services.delegate.stop_theme_song().await;
        Ok(())
    }

    pub async fn resolve_continue_watching(
        &self,
        choice: ContinueWatchingChoice,
    ) -> PlayerResult<()> {
        let prompt = self
            .continue_watching
            .get_sync()
            .ok_or(PlayerError::NoPendingPrompt)?;
        self.continue_watching.set(None).await;

        let engine = &self.services.engine;
        if choice == ContinueWatchingChoice::Resume {
            engine.set_position(prompt.start_position).await?;
            self.progress.set(prompt.start_position).await;
        }
        self.start_engine().await?;
        Ok(())
    }
}
