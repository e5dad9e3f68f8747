//! Feature requests: the immutable input to one workflow execution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// A feature idea plus whatever context the caller already has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    /// Feature description or idea.
    pub description: String,

    /// Existing specification document to start from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_stories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance_criteria: Vec<String>,

    /// Target package inside the project (e.g. `packages/features/analytics`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_package: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl FeatureRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_spec_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec_path = Some(path.into());
        self
    }

    pub fn with_user_stories(mut self, stories: Vec<String>) -> Self {
        self.user_stories = stories;
        self
    }

    pub fn with_acceptance_criteria(mut self, criteria: Vec<String>) -> Self {
        self.acceptance_criteria = criteria;
        self
    }

    pub fn with_target_package(mut self, package: impl Into<String>) -> Self {
        self.target_package = Some(package.into());
        self
    }
}
