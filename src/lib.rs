// Playback screen controller shared by every front end.
// The optional `mpv` feature adds a libmpv engine and the runnable player.

pub mod config;
pub mod constants;
pub mod core;
pub mod events;
pub mod models;
pub mod player;
pub mod services;
pub mod utils;

pub use config::Config;
pub use core::viewmodels::{PlayerServices, PlayerViewModel};
