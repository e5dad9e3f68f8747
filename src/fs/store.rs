//! Where specialists put their artifacts.

use crate::fs::atomic_write_file;
use crate::error::{OrchestratorError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Sink for agent artifacts. Implementations must be safe to call from
/// several agents at once.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Writes artifacts to the local filesystem with [`atomic_write_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactStore;

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        let path = path.to_path_buf();
        let content = content.to_string();
        tokio::task::spawn_blocking(move || atomic_write_file(&path, &content))
            .await
            .map_err(|e| OrchestratorError::Artifact(format!("artifact writer panicked: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_store_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("06-deployment").join("deployment-plan.md");

        FsArtifactStore.write(&path, "# Deploy\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Deploy\n");
    }
}
