use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("No playback session: call play() before {0}")]
    NoSession(&'static str),

    #[error("No continue-watching prompt is pending")]
    NoPendingPrompt,

    #[error("Engine error: {0}")]
    Engine(#[from] anyhow::Error),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
