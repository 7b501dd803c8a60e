use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{
    DEFAULT_ENGINE_VOLUME, DEFAULT_LONG_JUMP_SECS, PLAYER_CONTROLS_HIDE_DELAY_SECS,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub subtitles: SubtitleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_hide_delay")]
    pub controls_hide_delay_secs: u64,

    #[serde(default = "default_long_jump")]
    pub long_jump_secs: u64,

    /// Engine gain, 1.0 is unity
    #[serde(default = "default_engine_volume")]
    pub engine_volume: f64,

    #[serde(default)]
    pub remove_cache_on_player_exit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Preferred subtitle language, selected automatically when available
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default = "default_subtitle_size")]
    pub size: f32,

    /// 0xRRGGBB
    #[serde(default = "default_subtitle_color")]
    pub color: u32,

    #[serde(default = "default_subtitle_font")]
    pub font: String,

    #[serde(default)]
    pub style: FontStyle,

    #[serde(default = "default_subtitle_encoding")]
    pub encoding: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            info!("Config loaded successfully");
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("popcorn-player").join("config.toml"))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            controls_hide_delay_secs: default_hide_delay(),
            long_jump_secs: default_long_jump(),
            engine_volume: default_engine_volume(),
            remove_cache_on_player_exit: false,
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            language: None,
            size: default_subtitle_size(),
            color: default_subtitle_color(),
            font: default_subtitle_font(),
            style: FontStyle::default(),
            encoding: default_subtitle_encoding(),
        }
    }
}

// Default value functions
fn default_hide_delay() -> u64 { PLAYER_CONTROLS_HIDE_DELAY_SECS }
fn default_long_jump() -> u64 { DEFAULT_LONG_JUMP_SECS }
fn default_engine_volume() -> f64 { DEFAULT_ENGINE_VOLUME }
fn default_subtitle_size() -> f32 { 20.0 }
fn default_subtitle_color() -> u32 { 0xFFFFFF }
fn default_subtitle_font() -> String { "Helvetica Neue".to_string() }
fn default_subtitle_encoding() -> String { "Windows-1252".to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [playback]
            remove_cache_on_player_exit = true

            [subtitles]
            language = "English"
            style = "bold_italic"
            "#,
        )
        .unwrap();

        assert!(config.playback.remove_cache_on_player_exit);
        assert_eq!(config.playback.controls_hide_delay_secs, 5);
        assert_eq!(config.playback.long_jump_secs, 300);
        assert_eq!(config.subtitles.language.as_deref(), Some("English"));
        assert!(config.subtitles.style.is_bold());
        assert_eq!(config.subtitles.encoding, "Windows-1252");
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert!(!config.playback.remove_cache_on_player_exit);

        let mut changed = config.clone();
        changed.playback.engine_volume = 1.0;
        changed.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.playback.engine_volume, 1.0);
    }
}
