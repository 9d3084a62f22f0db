//! Flat-file store for generated sitemaps: one `<id>.xml` per sitemap.

use std::fmt;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::errors::{Result, SitemapError};

const MAX_ID_LEN: usize = 64;

/// Opaque handle of a stored sitemap: generation time in milliseconds plus a
/// short random suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SitemapId(String);

impl SitemapId {
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        SitemapId(format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8]))
    }

    /// Accepts only ASCII alphanumerics and `-`, so an id can never name a
    /// path outside the store directory.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ID_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| SitemapId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn file_name(&self) -> String {
        format!("{}.xml", self.0)
    }
}

impl fmt::Display for SitemapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sitemap that has been written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedSitemap {
    pub id: SitemapId,
    pub xml: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SitemapStore {
    dir: PathBuf,
}

impl SitemapStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<system temp dir>/generated_sitemaps`.
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("generated_sitemaps")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &SitemapId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Writes `xml` under a fresh id. Never overwrites an existing file.
    pub async fn save(&self, xml: String) -> Result<GeneratedSitemap> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let id = SitemapId::generate();
        let path = self.path_for(&id);
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_remove(file, &path, xml.as_bytes()).await?;

        tracing::info!(id = %id, path = %path.display(), bytes = xml.len(), "stored sitemap");
        Ok(GeneratedSitemap { id, xml, path })
    }

    /// Reads the raw bytes stored under `id`.
    pub async fn load(&self, id: &str) -> Result<Vec<u8>> {
        let id = SitemapId::parse(id).ok_or_else(|| {
            tracing::warn!(id, "rejected malformed sitemap id");
            SitemapError::NotFound(id.to_string())
        })?;
        let path = self.path_for(&id);

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    tracing::debug!(id = %id, "sitemap file does not exist");
                } else {
                    tracing::warn!(id = %id, error = %err, "failed to read sitemap file");
                }
                Err(SitemapError::NotFound(id.to_string()))
            }
        }
    }
}

/// Writes `bytes` to `out`, deleting `path` if the write fails so a
/// truncated sitemap is never served.
async fn write_or_remove<W>(mut out: W, path: &Path, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(bytes).await?;
        out.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(out);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove partial sitemap");
        }
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::tempdir;

    struct FailingWriter;

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(ErrorKind::Other, "no space left")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_removes_the_file() {
        let root = tempdir().unwrap();
        let path = root.path().join("1700000000000-abcd1234.xml");
        std::fs::write(&path, b"<urlset>").unwrap();

        let err = write_or_remove(FailingWriter, &path, b"<urlset/>")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(!path.exists());

        let store = SitemapStore::new(root.path());
        assert!(matches!(
            store.load("1700000000000-abcd1234").await.unwrap_err(),
            SitemapError::NotFound(_)
        ));
    }

    #[test]
    fn generated_ids_parse_back() {
        let id = SitemapId::generate();
        assert_eq!(SitemapId::parse(id.as_str()), Some(id.clone()));
        let (millis, suffix) = id.as_str().split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
    }

    #[test]
    fn ids_with_path_characters_are_rejected() {
        for raw in ["", "../etc/passwd", "a/b", "a.xml", "..", "id with space"] {
            assert_eq!(SitemapId::parse(raw), None, "{}", raw);
        }
        assert_eq!(SitemapId::parse(&"a".repeat(MAX_ID_LEN + 1)), None);
    }

    #[tokio::test]
    async fn save_creates_directory_and_load_returns_bytes() {
        let root = tempdir().unwrap();
        let store = SitemapStore::new(root.path().join("nested").join("out"));

        let saved = store.save("<urlset/>".to_string()).await.unwrap();
        assert_eq!(saved.path, store.dir().join(format!("{}.xml", saved.id)));
        assert!(saved.path.exists());

        let bytes = store.load(saved.id.as_str()).await.unwrap();
        assert_eq!(bytes, b"<urlset/>");
    }

    #[tokio::test]
    async fn consecutive_saves_get_distinct_ids() {
        let root = tempdir().unwrap();
        let store = SitemapStore::new(root.path());
        let first = store.save("a".to_string()).await.unwrap();
        let second = store.save("b".to_string()).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.load(first.id.as_str()).await.unwrap(), b"a");
        assert_eq!(store.load(second.id.as_str()).await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let root = tempdir().unwrap();
        let store = SitemapStore::new(root.path());
        for id in ["1700000000000-deadbeef", "../secret"] {
            let err = store.load(id).await.unwrap_err();
            assert!(matches!(err, SitemapError::NotFound(_)), "{}", id);
        }
    }
}
