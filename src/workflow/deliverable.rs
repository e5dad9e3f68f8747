//! Deliverables and quality gates produced by agent tasks.

use super::types::{AgentRole, DeliverableKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// An artifact written by a task and recorded against the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub name: String,
    pub kind: DeliverableKind,
    /// Where the artifact was persisted.
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    pub created_by: AgentRole,
    pub created_at: DateTime<Utc>,
}

impl Deliverable {
    pub fn new(
        name: impl Into<String>,
        kind: DeliverableKind,
        path: impl Into<PathBuf>,
        created_by: AgentRole,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
            content: None,
            metadata: Map::new(),
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A named pass/fail assessment. Informational unless gate enforcement is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    pub name: String,
    pub passed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl QualityGate {
    pub fn new(name: impl Into<String>, passed: bool, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = details;
        self
    }
}
