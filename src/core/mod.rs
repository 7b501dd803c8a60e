pub mod player_traits;
pub mod viewmodels;

pub use player_traits::{EngineState, MediaEngine};
