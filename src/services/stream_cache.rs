use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::traits::StreamingService;

/// Streaming session whose data lives in a single download directory.
///
/// The downloader reports progress through `set_progress`; the player
/// screen reads it for the buffer indicator and tears the session down on
/// exit.
#[derive(Debug, Clone)]
pub struct LocalStreamCache {
    directory: PathBuf,
    progress: Arc<RwLock<f32>>,
    cancelled: Arc<AtomicBool>,
}

impl LocalStreamCache {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            progress: Arc::new(RwLock::new(0.0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub async fn set_progress(&self, progress: f32) {
        *self.progress.write().await = progress.clamp(0.0, 1.0);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamingService for LocalStreamCache {
    async fn buffer_progress(&self) -> f32 {
        *self.progress.read().await
    }

    async fn cancel_streaming(&self, delete_data: bool) -> Result<()> {
        self.cancelled.store(true, Ordering::SeqCst);
        info!(
            "Streaming cancelled for {:?} (delete data: {})",
            self.directory, delete_data
        );

        if delete_data && tokio::fs::try_exists(&self.directory).await.unwrap_or(false) {
            debug!("Removing cached data in {:?}", self.directory);
            tokio::fs::remove_dir_all(&self.directory)
                .await
                .context("Failed to delete cached stream data")?;
        }

        Ok(())
    }
}
