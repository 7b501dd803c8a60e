mod identifiers;
pub mod session;

pub use identifiers::{MediaId, ShowId};
pub use session::PlaybackSession;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Remote location of the subtitle file
    pub link: String,
    /// Human-readable language name, matched against the configured language
    pub language: String,
    pub name: String,
}

impl Subtitle {
    pub fn new(
        link: impl Into<String>,
        language: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            link: link.into(),
            language: language.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MediaId,
    pub title: String,
    #[serde(default)]
    pub subtitles: Option<Vec<Subtitle>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: MediaId,
    pub show_id: ShowId,
    pub show_title: String,
    pub title: String,
    pub season: u32,
    pub episode: u32,
    #[serde(default)]
    pub subtitles: Option<Vec<Subtitle>>,
}

impl Episode {
    pub fn season_episode(&self) -> String {
        format!("Season {} Episode {}", self.season, self.episode)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Media {
    Movie(Movie),
    Episode(Episode),
}

impl Media {
    pub fn id(&self) -> &MediaId {
        match self {
            Media::Movie(m) => &m.id,
            Media::Episode(e) => &e.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Media::Movie(m) => &m.title,
            Media::Episode(e) => &e.title,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Movie(_) => MediaKind::Movie,
            Media::Episode(_) => MediaKind::Episode,
        }
    }

    pub fn subtitles(&self) -> Option<&[Subtitle]> {
        match self {
            Media::Movie(m) => m.subtitles.as_deref(),
            Media::Episode(e) => e.subtitles.as_deref(),
        }
    }
}

/// Which watched list a progress record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Episode,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchStatus {
    Watching,
    Paused,
    Finished,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Watching => "watching",
            WatchStatus::Paused => "paused",
            WatchStatus::Finished => "finished",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "watching" => Some(WatchStatus::Watching),
            "paused" => Some(WatchStatus::Paused),
            "finished" => Some(WatchStatus::Finished),
            _ => None,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
