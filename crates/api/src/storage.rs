//! Local filesystem store for uploaded binaries.
//!
//! Paths handed in and out are relative to the store root and `/`-separated;
//! they are what the `assets.storage_path` column records.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored file. Rejects paths that would escape
    /// the root.
    pub fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        let rel = Path::new(relative);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative.is_empty() || escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage path '{relative}'"),
            ));
        }
        Ok(self.root.join(rel))
    }

    /// Write `data` to `<dir>/<file_name>`, creating directories on demand.
    /// Never overwrites an existing file. Returns the relative path.
    pub async fn save(&self, dir: &str, file_name: &str, data: &[u8]) -> io::Result<String> {
        let relative = format!("{dir}/{file_name}");
        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(relative)
    }

    pub async fn exists(&self, relative: &str) -> bool {
        match self.resolve(relative) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Open a stored file for streaming, returning it with its length.
    pub async fn open(&self, relative: &str) -> io::Result<(File, u64)> {
        let path = self.resolve(relative)?;
        let file = File::open(&path).await?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }

    pub async fn remove(&self, relative: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(relative)?).await
    }

    /// Best-effort removal used for compensation and cleanup; the outcome
    /// is logged and never propagated.
    pub async fn remove_quietly(&self, relative: &str) {
        match self.remove(relative).await {
            Ok(()) => tracing::info!(path = relative, "Removed stored file"),
            Err(e) => tracing::warn!(path = relative, error = %e, "Failed to remove stored file"),
        }
    }
}
