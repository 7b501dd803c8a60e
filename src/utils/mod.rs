pub mod errors;
pub mod platform;
pub mod time_format;

pub use errors::{PlayerError, PlayerResult};
pub use platform::{Dismissal, Platform, PromptStyle, SizeClass, TraitCollection};
pub use time_format::{format_elapsed, format_offset, format_remaining};
