//! Feature workspace provisioning.
//!
//! Every feature request gets an isolated directory tree
//! `{workspace_dir}/feature-{slug}/` with eight fixed stage subdirectories.
//! The tree exists before any agent runs; creation is idempotent, so running
//! the same feature twice reuses the same directories.

mod context;
mod slug;


pub use context::{Stage, WorkspaceContext};
pub use slug::{DEFAULT_SLUG_MAX_LEN, slugify};

use crate::error::{OrchestratorError, Result};
use crate::workflow::FeatureRequest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every feature workspace directory.
pub const WORKSPACE_PREFIX: &str = "feature-";

/// Creates and locates feature workspaces under a configured root.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
    project_path: PathBuf,
    slug_max_len: usize,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>, project_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            project_path: project_path.into(),
            slug_max_len: DEFAULT_SLUG_MAX_LEN,
        }
    }

    pub fn with_slug_max_len(mut self, max_len: usize) -> Self {
        self.slug_max_len = max_len;
        self
    }

    /// Feature name a request would be filed under.
    pub fn feature_name(&self, request: &FeatureRequest) -> String {
        slugify(&request.description, self.slug_max_len)
    }

    /// Path of the workspace for a feature name, whether or not it exists.
    pub fn workspace_path(&self, feature_name: &str) -> PathBuf {
        self.root.join(format!("{}{}", WORKSPACE_PREFIX, feature_name))
    }

    /// Create (or reuse) the workspace for a request.
    ///
    /// # Errors
    ///
    /// * `OrchestratorError::Workspace` - the root is not writable or a stage
    ///   path is occupied by a non-directory
    pub fn create(&self, request: &FeatureRequest) -> Result<WorkspaceContext> {
        let feature_name = self.feature_name(request);
        let workspace_path = absolute(&self.workspace_path(&feature_name))?;

        create_dir(&workspace_path)?;
        for stage in Stage::ALL {
            create_dir(&context::stage_path(&workspace_path, stage))?;
        }
        debug!(workspace = %workspace_path.display(), "workspace provisioned");

        Ok(WorkspaceContext::new(
            feature_name,
            workspace_path,
            absolute(&self.project_path)?,
            request.clone(),
        ))
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        OrchestratorError::Workspace(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        OrchestratorError::Workspace(format!(
            "failed to resolve path '{}': {}",
            path.display(),
            e
        ))
    })
}
