//! Common types shared by engine adapters

use crate::config::SubtitleConfig;
use crate::core::EngineState;

/// How the engine should render subtitle text
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleAppearance {
    pub font: String,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub bold: bool,
    /// Character encoding of downloaded subtitle files
    pub encoding: String,
}

impl SubtitleAppearance {
    pub fn color_hex(&self) -> String {
        format!("#{:06X}", self.color & 0xFF_FFFF)
    }
}

impl From<&SubtitleConfig> for SubtitleAppearance {
    fn from(config: &SubtitleConfig) -> Self {
        Self {
            font: config.font.clone(),
            size: config.size,
            color: config.color,
            bold: config.style.is_bold(),
            encoding: config.encoding.clone(),
        }
    }
}

/// Snapshot of the engine flags a state is derived from
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineFlags {
    /// `play` was issued since the media was loaded
    pub started: bool,
    pub ended: bool,
    /// Waiting on the network or a seek
    pub stalled: bool,
    pub paused: bool,
    pub has_duration: bool,
}

impl EngineFlags {
    pub fn state(&self) -> EngineState {
        if self.ended {
            EngineState::Ended
        } else if !self.started {
            // Loaded media is held paused until the screen starts it
            EngineState::Opening
        } else if self.stalled {
            EngineState::Buffering
        } else if self.paused {
            EngineState::Paused
        } else if !self.has_duration {
            EngineState::Opening
        } else {
            EngineState::Playing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontStyle;

    #[test]
    fn test_appearance_from_config() {
        let config = SubtitleConfig {
            color: 0x00FF7F,
            style: FontStyle::Bold,
            ..SubtitleConfig::default()
        };
        let appearance = SubtitleAppearance::from(&config);
        assert!(appearance.bold);
        assert_eq!(appearance.color_hex(), "#00FF7F");
        assert_eq!(appearance.encoding, "Windows-1252");
    }

    #[test]
    fn test_held_media_reports_opening_until_started() {
        let held = EngineFlags {
            paused: true,
            has_duration: true,
            ..EngineFlags::default()
        };
        assert_eq!(held.state(), EngineState::Opening);

        let started = EngineFlags {
            started: true,
            ..held
        };
        assert_eq!(started.state(), EngineState::Paused);
        assert_eq!(
            EngineFlags {
                paused: false,
                ..started
            }
            .state(),
            EngineState::Playing
        );
    }

    #[test]
    fn test_stall_and_end_take_precedence() {
        let flags = EngineFlags {
            started: true,
            stalled: true,
            paused: true,
            has_duration: true,
            ended: false,
        };
        assert_eq!(flags.state(), EngineState::Buffering);
        assert_eq!(
            EngineFlags {
                ended: true,
                ..flags
            }
            .state(),
            EngineState::Ended
        );
    }
}
