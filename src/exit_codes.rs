//! Exit code constants for the sdlc CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid configuration, unregistered role)
//! - 2: Workflow failure (a task exhausted its retries, or an enforced gate failed)
//! - 3: Workspace I/O failure
//! - 4: An execution for the same feature is already running

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Workflow failure: the execution ended in the `failed` status.
pub const WORKFLOW_FAILURE: i32 = 2;

/// Workspace failure: the feature workspace could not be provisioned.
pub const WORKSPACE_FAILURE: i32 = 3;

/// Another execution currently owns the feature workspace.
pub const BUSY: i32 = 4;
