use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use popcorn_player::PlayerServices;
use popcorn_player::config::Config;
use popcorn_player::constants::{EVENT_BUS_CAPACITY, SUBTITLE_DOWNLOAD_TIMEOUT_SECS};
use popcorn_player::core::viewmodels::{ContinueWatchingChoice, PlayerViewModel};
use popcorn_player::events::EventBus;
use popcorn_player::models::{Episode, Media, MediaId, Movie, Subtitle};
use popcorn_player::player::MpvEngine;
use popcorn_player::services::{
    HttpSubtitleService, LocalStreamCache, PlayerScreenDelegate, SqliteWatchProgressStore,
};
use popcorn_player::utils::{Dismissal, Platform, TraitCollection};

/// Stands in for the navigation stack: dismissal ends the process
struct ExitOnDismiss {
    dismissed: Notify,
}

#[async_trait]
impl PlayerScreenDelegate for ExitOnDismiss {
    async fn dismiss(&self, dismissal: Dismissal) {
        info!("Player screen dismissed ({:?})", dismissal);
        self.dismissed.notify_one();
    }

    async fn play_next(&self, episode: &Episode) {
        info!("Up next: {} {}", episode.show_title, episode.season_episode());
    }
}

#[derive(Parser, Debug)]
#[command(name = "popcorn-player", about = "Play a stream with the popcorn player screen")]
struct Args {
    /// Stream URL or local file
    url: String,

    /// Title shown on the player screen
    #[arg(long)]
    title: Option<String>,

    /// Subtitle offered for the stream, as <language>=<link>
    #[arg(long = "subtitle", value_name = "LANGUAGE=LINK", value_parser = parse_subtitle)]
    subtitles: Vec<Subtitle>,
}

fn parse_subtitle(value: &str) -> Result<Subtitle, String> {
    match value.split_once('=') {
        Some((language, link)) if !language.is_empty() && !link.is_empty() => {
            Ok(Subtitle::new(link, language, language))
        }
        _ => Err(format!("expected <language>=<link>, got '{}'", value)),
    }
}

fn media_for(args: &Args) -> Media {
    let name = Path::new(&args.url)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.url.clone());

    Media::Movie(Movie {
        id: MediaId::new(args.url.clone()),
        title: args.title.clone().unwrap_or(name),
        subtitles: (!args.subtitles.is_empty()).then(|| args.subtitles.clone()),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popcorn_player=debug".into()),
        )
        .init();

    let args = Args::parse();
    info!("Starting popcorn-player");

    let config = Arc::new(Config::load()?);
    let event_bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY));

    let db_path = SqliteWatchProgressStore::default_path()?;
    let store = Arc::new(SqliteWatchProgressStore::open(&db_path).await?);
    let cache_dir = std::env::temp_dir().join("popcorn-player");
    let streaming = Arc::new(LocalStreamCache::new(&cache_dir));
    // mpv buffers on its own; the indicator shows the whole stream as available
    streaming.set_progress(1.0).await;

    let subtitle_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(SUBTITLE_DOWNLOAD_TIMEOUT_SECS))
        .build()
        .context("Failed to build subtitle HTTP client")?;

    let delegate = Arc::new(ExitOnDismiss {
        dismissed: Notify::new(),
    });

    let services = PlayerServices {
        engine: Arc::new(MpvEngine::new(event_bus.clone())?),
        subtitles: Arc::new(HttpSubtitleService::with_client(subtitle_client)),
        progress_store: store.clone(),
        streaming,
        frame_grabber: None,
        delegate: delegate.clone(),
    };
    let vm = PlayerViewModel::new(services, config, Platform::Handheld);

    let media = media_for(&args);
    let start_position = store
        .resume_position(media.id(), media.kind())
        .await
        .unwrap_or_else(|e| {
            warn!("Could not read saved position: {}", e);
            0.0
        });

    vm.play(media, args.url.clone(), start_position, None, &cache_dir)
        .await;
    vm.view_did_load().await?;
    vm.view_will_appear(&event_bus).await;
    vm.view_did_appear(TraitCollection::regular()).await?;

    if let Some(prompt) = vm.continue_watching().get_sync() {
        info!("{} {}", prompt.title, prompt.resume_label);
        vm.resolve_continue_watching(ContinueWatchingChoice::Resume)
            .await?;
    }

    tokio::select! {
        _ = delegate.dismissed.notified() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, closing player");
            vm.did_finish_playing().await;
        }
    }

    vm.view_will_disappear().await;

    let stats = event_bus.get_stats().await;
    info!(
        "Engine published {} events ({} unobserved)",
        stats.total_events, stats.dropped_events
    );
    for (event_type, count) in &stats.events_by_type {
        debug!("  {}: {}", event_type, count);
    }
    info!("Bye");
    Ok(())
}
