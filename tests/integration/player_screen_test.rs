#[cfg(test)]
mod player_screen_tests {
    use crate::common::fixtures::{episode, movie_with_subtitle, plain_movie};
    use crate::common::mocks::{MockDelegate, MockEngine};
    use crate::common::wait_for_async;
    use mockito::Server;
    use popcorn_player::config::Config;
    use popcorn_player::core::EngineState;
    use popcorn_player::core::viewmodels::{ContinueWatchingChoice, PlayerServices, PlayerViewModel};
    use popcorn_player::events::{EventBus, PlayerEvent, TimeUpdate};
    use popcorn_player::models::{Media, MediaId, MediaKind, WatchStatus};
    use popcorn_player::services::{
        HttpSubtitleService, LocalStreamCache, SqliteWatchProgressStore, WatchProgressStore,
    };
    use popcorn_player::utils::{Dismissal, Platform, PromptStyle, SizeClass, TraitCollection};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nWake up, Neo...\n";

    struct Screen {
        vm: PlayerViewModel,
        engine: Arc<MockEngine>,
        store: Arc<SqliteWatchProgressStore>,
        cache: Arc<LocalStreamCache>,
        delegate: Arc<MockDelegate>,
    }

    async fn screen(config: Config, platform: Platform, stream_dir: &Path) -> Screen {
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(SqliteWatchProgressStore::in_memory().await.unwrap());
        let cache = Arc::new(LocalStreamCache::new(stream_dir));
        let delegate = Arc::new(MockDelegate::default());

        let services = PlayerServices {
            engine: engine.clone(),
            subtitles: Arc::new(HttpSubtitleService::new()),
            progress_store: store.clone(),
            streaming: cache.clone(),
            frame_grabber: None,
            delegate: delegate.clone(),
        };

        Screen {
            vm: PlayerViewModel::new(services, Arc::new(config), platform),
            engine,
            store,
            cache,
            delegate,
        }
    }

    async fn wait_for_status(
        store: &Arc<SqliteWatchProgressStore>,
        id: &MediaId,
        kind: MediaKind,
        status: WatchStatus,
    ) -> bool {
        wait_for_async(
            || {
                let store = store.clone();
                let id = id.clone();
                async move {
                    matches!(
                        store.current_progress(&id, kind).await,
                        Ok(Some(record)) if record.status == status
                    )
                }
            },
            Duration::from_secs(2),
        )
        .await
    }

    #[tokio::test]
    async fn test_full_session_through_event_bus() {
        let mut server = Server::new_async().await;
        let subtitle_mock = server
            .mock("GET", "/subs/en.srt")
            .with_status(200)
            .with_body(SRT)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let stream_dir = dir.path().join("stream");
        std::fs::create_dir_all(&stream_dir).unwrap();
        std::fs::write(stream_dir.join("matrix.mkv"), b"partial").unwrap();

        let mut config = Config::default();
        config.subtitles.language = Some("English".to_string());
        config.playback.remove_cache_on_player_exit = true;

        let s = screen(config, Platform::Handheld, &stream_dir).await;
        s.cache.set_progress(0.75).await;
        let bus = EventBus::new(64);

        let link = format!("{}/subs/en.srt", server.url());
        let subtitle_dir = dir.path().join("subs");
        s.vm
            .play(
                movie_with_subtitle(&link),
                "file:///movies/matrix.mkv",
                0.0,
                None,
                &subtitle_dir,
            )
            .await;

        s.vm.view_did_load().await.unwrap();

        let subtitle_path = subtitle_dir.join("en.srt");
        let open_call = format!("open_subtitle({})", subtitle_path.display());
        let engine = s.engine.clone();
        let opened = wait_for_async(
            || {
                let engine = engine.clone();
                let open_call = open_call.clone();
                async move { engine.position_of(&open_call).is_some() }
            },
            Duration::from_secs(2),
        )
        .await;
        assert!(opened);
        subtitle_mock.assert_async().await;
        assert_eq!(std::fs::read_to_string(&subtitle_path).unwrap(), SRT);
        assert!(s.engine.position_of("subtitle_appearance(#FFFFFF)").is_some());
        assert!(s.vm.subtitle_switcher_visible().get_sync());

        s.vm.view_will_appear(&bus).await;
        s.vm.view_did_appear(TraitCollection::regular()).await.unwrap();
        assert!(s.vm.continue_watching().get_sync().is_none());
        assert!(s.engine.position_of("play").is_some());

        bus.publish(PlayerEvent::time_changed(TimeUpdate::new(
            Duration::from_secs(30),
            Duration::from_secs(70),
        )))
        .await
        .unwrap();
        bus.publish(PlayerEvent::state_changed(EngineState::Paused))
            .await
            .unwrap();

        let id = MediaId::new("tt0133093");
        assert!(wait_for_status(&s.store, &id, MediaKind::Movie, WatchStatus::Paused).await);

        let record = s
            .store
            .current_progress(&id, MediaKind::Movie)
            .await
            .unwrap()
            .unwrap();
        assert!((record.progress - 0.3).abs() < 1e-3);
        assert!(!s.vm.loading_visible().get_sync());
        assert_eq!(s.vm.buffer_progress().get_sync(), 0.75);
        assert_eq!(s.vm.elapsed_label().get_sync(), "00:30");
        assert_eq!(s.vm.remaining_label().get_sync(), "-01:10");

        bus.publish(PlayerEvent::state_changed(EngineState::Ended))
            .await
            .unwrap();

        let delegate = s.delegate.clone();
        let dismissed = wait_for_async(
            || {
                let delegate = delegate.clone();
                async move { !delegate.dismissals().is_empty() }
            },
            Duration::from_secs(2),
        )
        .await;
        assert!(dismissed);

        assert_eq!(s.delegate.dismissals(), vec![Dismissal::DismissModal]);
        assert!(s.cache.is_cancelled());
        assert!(!stream_dir.exists());
        assert!(s.engine.position_of("stop").is_some());

        let record = s
            .store
            .current_progress(&id, MediaKind::Movie)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, WatchStatus::Finished);
        assert_eq!(
            s.store.resume_position(&id, MediaKind::Movie).await.unwrap(),
            0.0
        );

        s.vm.view_will_disappear().await;
    }

    #[tokio::test]
    async fn test_saved_position_is_offered_and_restored() {
        let dir = TempDir::new().unwrap();
        let s = screen(Config::default(), Platform::Handheld, dir.path()).await;

        let media = plain_movie();
        s.store
            .set_current_progress(media.id(), media.kind(), 0.6, WatchStatus::Paused)
            .await
            .unwrap();
        let start = s
            .store
            .resume_position(media.id(), media.kind())
            .await
            .unwrap();
        assert_eq!(start, 0.6);

        s.vm
            .play(media, "file:///movies/2001.mkv", start, None, dir.path())
            .await;
        s.vm.view_did_load().await.unwrap();
        assert!(s.engine.position_of("disable_subtitles").is_some());
        assert!(!s.vm.subtitle_switcher_visible().get_sync());

        s.vm
            .view_did_appear(TraitCollection::new(SizeClass::Compact, SizeClass::Compact))
            .await
            .unwrap();

        let prompt = s.vm.continue_watching().get_sync().unwrap();
        assert_eq!(prompt.style, PromptStyle::ActionSheet);
        assert!(s.vm.overlay().get_sync().is_visible());
        assert_eq!(prompt.resume_label, "Yes, continue from where I left off");
        assert!(s.engine.position_of("play").is_none());

        s.vm
            .resolve_continue_watching(ContinueWatchingChoice::Resume)
            .await
            .unwrap();

        let seek = s.engine.position_of("set_position(0.6)").unwrap();
        let play = s.engine.position_of("play").unwrap();
        assert!(seek < play);
    }

    #[tokio::test]
    async fn test_finished_media_starts_over_without_prompt() {
        let dir = TempDir::new().unwrap();
        let s = screen(Config::default(), Platform::Handheld, dir.path()).await;

        let media = plain_movie();
        s.store
            .set_current_progress(media.id(), media.kind(), 0.98, WatchStatus::Finished)
            .await
            .unwrap();
        let start = s
            .store
            .resume_position(media.id(), media.kind())
            .await
            .unwrap();

        s.vm
            .play(media, "file:///movies/2001.mkv", start, None, dir.path())
            .await;
        s.vm.view_did_appear(TraitCollection::regular()).await.unwrap();

        assert!(s.vm.continue_watching().get_sync().is_none());
        assert!(s.engine.position_of("play").is_some());
        assert!(s.engine.position_of("set_position(0.98)").is_none());
    }

    #[tokio::test]
    async fn test_television_episode_hands_over_and_pops() {
        let dir = TempDir::new().unwrap();
        let s = screen(Config::default(), Platform::Television, dir.path()).await;
        let bus = EventBus::new(16);

        s.vm
            .play(
                Media::Episode(episode(1)),
                "file:///shows/s01e01.mkv",
                0.0,
                Some(episode(2)),
                dir.path(),
            )
            .await;
        s.vm.view_will_appear(&bus).await;

        bus.publish(PlayerEvent::state_changed(EngineState::Ended))
            .await
            .unwrap();

        let delegate = s.delegate.clone();
        assert!(
            wait_for_async(
                || {
                    let delegate = delegate.clone();
                    async move { !delegate.dismissals().is_empty() }
                },
                Duration::from_secs(2),
            )
            .await
        );

        assert_eq!(s.delegate.dismissals(), vec![Dismissal::PopNavigation]);
        assert_eq!(
            s.delegate.next_episodes.lock().unwrap().clone(),
            vec![episode(2)]
        );
        // Cache kept unless configured otherwise
        assert!(dir.path().exists());

        let record = s
            .store
            .current_progress(&episode(1).id, MediaKind::Episode)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, WatchStatus::Finished);
    }
}
