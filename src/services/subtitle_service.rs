use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use super::traits::SubtitleService;
use crate::models::Subtitle;

/// Downloads subtitle files over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpSubtitleService {
    client: reqwest::Client,
}

impl HttpSubtitleService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Last path segment of the link, or `<language>.srt` when the link has none
    fn file_name(url: &Url, subtitle: &Subtitle) -> String {
        url.path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.srt", subtitle.language))
    }
}

#[async_trait]
impl SubtitleService for HttpSubtitleService {
    async fn download(&self, subtitle: &Subtitle, directory: &Path) -> Result<PathBuf> {
        let url = Url::parse(&subtitle.link)
            .with_context(|| format!("Invalid subtitle link: {}", subtitle.link))?;
        let path = directory.join(Self::file_name(&url, subtitle));

        debug!("Downloading subtitle {} to {:?}", url, path);
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .context("Subtitle request failed")?
            .error_for_status()
            .context("Subtitle server returned an error")?
            .bytes()
            .await
            .context("Failed to read subtitle body")?;

        tokio::fs::create_dir_all(directory)
            .await
            .context("Failed to create subtitle directory")?;
        tokio::fs::write(&path, &bytes)
            .await
            .context("Failed to write subtitle file")?;

        Ok(path)
    }
}
