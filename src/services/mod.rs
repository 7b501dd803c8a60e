pub mod stream_cache;
pub mod subtitle_service;
pub mod traits;
pub mod watch_progress;

pub use stream_cache::LocalStreamCache;
pub use subtitle_service::HttpSubtitleService;
pub use traits::{
    FrameGrabber, PlayerScreenDelegate, StreamingService, SubtitleService, WatchProgressStore,
};
pub use watch_progress::{SqliteWatchProgressStore, WatchProgress};
