use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::WatchProgressStore;
use crate::models::{MediaId, MediaKind, WatchStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct WatchProgress {
    pub media_id: MediaId,
    pub kind: MediaKind,
    pub progress: f32,
    pub status: WatchStatus,
    pub updated_at: DateTime<Utc>,
}

/// SQLite-backed watched list, one row per (media, kind)
#[derive(Debug, Clone)]
pub struct SqliteWatchProgressStore {
    db: Arc<SqlitePool>,
}

impl SqliteWatchProgressStore {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        info!("Opening watch progress store at {}", db_url);
        let db = SqlitePool::connect(&db_url)
            .await
            .context("Failed to connect to watch progress database")?;

        Self::initialize_schema(&db).await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Private database that lives as long as the store
    pub async fn in_memory() -> Result<Self> {
        // Every connection to :memory: is a fresh database, so keep exactly one alive
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        Self::initialize_schema(&db).await?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join("popcorn-player").join("watched.db"))
    }

    async fn initialize_schema(db: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS watch_progress (
                media_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                progress REAL NOT NULL,
                status TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (media_id, kind)
            )
            "#,
        )
        .execute(db)
        .await
        .context("Failed to create watch_progress table")?;

        Ok(())
    }

    pub async fn current_progress(
        &self,
        media_id: &MediaId,
        kind: MediaKind,
    ) -> Result<Option<WatchProgress>> {
        let row = sqlx::query(
            "SELECT progress, status, updated_at FROM watch_progress WHERE media_id = ? AND kind = ?",
        )
        .bind(media_id.as_str())
        .bind(kind.as_str())
        .fetch_optional(self.db.as_ref())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let progress: f64 = row.try_get("progress")?;
        let status: String = row.try_get("status")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
        let status = WatchStatus::parse(&status)
            .ok_or_else(|| anyhow!("Unknown watch status '{}' for {}", status, media_id))?;

        Ok(Some(WatchProgress {
            media_id: media_id.clone(),
            kind,
            progress: progress as f32,
            status,
            updated_at,
        }))
    }

    /// Position to offer on the continue-watching prompt; finished items start over
    pub async fn resume_position(&self, media_id: &MediaId, kind: MediaKind) -> Result<f32> {
        Ok(match self.current_progress(media_id, kind).await? {
            Some(record) if record.status != WatchStatus::Finished => record.progress,
            _ => 0.0,
        })
    }
}

#[async_trait]
impl WatchProgressStore for SqliteWatchProgressStore {
    async fn set_current_progress(
        &self,
        media_id: &MediaId,
        kind: MediaKind,
        progress: f32,
        status: WatchStatus,
    ) -> Result<()> {
        debug!(
            "Recording {} {} at {:.3} as {}",
            kind, media_id, progress, status
        );

        sqlx::query(
            r#"
            INSERT INTO watch_progress (media_id, kind, progress, status, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(media_id, kind) DO UPDATE SET
                progress = excluded.progress,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(media_id.as_str())
        .bind(kind.as_str())
        .bind(progress.clamp(0.0, 1.0) as f64)
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(self.db.as_ref())
        .await
        .context("Failed to record watch progress")?;

        Ok(())
    }
}
