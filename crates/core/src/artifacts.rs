//! Artifact storage: uploaded source files and translated outputs.
//!
//! Keys are flat file names produced by [`crate::naming`]. The store treats
//! them as opaque apart from rejecting anything that could escape its root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::naming;

/// Errors from an [`ArtifactStore`].
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Invalid artifact key '{0}'")]
    InvalidKey(String),

    #[error("Artifact '{0}' not found")]
    NotFound(String),

    #[error("Artifact I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Key/bytes storage for job artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous content.
    ///
    /// A failed write leaves nothing readable under `key`.
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ArtifactError>;

    /// Read the full content stored under `key`.
    async fn read(&self, key: &str) -> Result<Vec<u8>, ArtifactError>;

    /// Whether `key` currently holds an artifact.
    async fn exists(&self, key: &str) -> Result<bool, ArtifactError>;
}

/// Filesystem-backed store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ArtifactError> {
        naming::validate_key(key).map_err(|_| ArtifactError::InvalidKey(key.to_string()))?;
        Ok(self.root.join(key))
    }
}

fn io_error(key: &str, source: std::io::Error) -> ArtifactError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ArtifactError::NotFound(key.to_string())
    } else {
        ArtifactError::Io {
            key: key.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        let path = self.path_for(key)?;
        // Hidden temp names are rejected by `validate_key`, so they are never served.
        let tmp = self.root.join(format!(".{key}.part"));

        let result: std::io::Result<()> = async {
            tokio::fs::write(&tmp, bytes).await?;
            tokio::fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ArtifactError::Io {
                key: key.to_string(),
                source: e,
            });
        }
        tracing::debug!(key, bytes = bytes.len(), "Artifact written");
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path).await.map_err(|e| io_error(key, e))
    }

    async fn exists(&self, key: &str) -> Result<bool, ArtifactError> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(key, e))
    }
}
