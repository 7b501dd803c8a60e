#[cfg(feature = "mpv")]
pub mod mpv_engine;
pub mod types;

#[cfg(feature = "mpv")]
pub use mpv_engine::MpvEngine;
pub use types::{EngineFlags, SubtitleAppearance};
