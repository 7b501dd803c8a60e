// Player screen tuning constants. Values here are the config defaults.

// === Controls ===
pub const PLAYER_CONTROLS_HIDE_DELAY_SECS: u64 = 5;

// === Transport ===
pub const DEFAULT_LONG_JUMP_SECS: u64 = 300;

// Twice unity gain; the engine clips above this
pub const DEFAULT_ENGINE_VOLUME: f64 = 2.0;

// === Subtitles ===
pub const SUBTITLE_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

// === Event bus ===
pub const EVENT_BUS_CAPACITY: usize = 256;
