//! Workflow state model.
//!
//! This module defines the records the engine builds and mutates:
//!
//! - **Types**: the closed phase / role / status / mode enumerations
//! - **Request**: the immutable feature request
//! - **Task**: one agent role scheduled within one execution
//! - **Deliverable**: artifacts and quality gates produced by tasks
//! - **Execution**: the end-to-end record tracked to a terminal status

mod deliverable;
mod execution;
mod request;
mod task;
mod types;


pub use deliverable::{Deliverable, QualityGate};
pub use execution::WorkflowExecution;
pub use request::FeatureRequest;
pub use task::{AgentTask, TaskInput};
pub use types::{AgentRole, DeliverableKind, Phase, TaskStatus, WorkflowMode};
