//! Prompt rendering for specialist agents.
//!
//! - **Template**: `{variable}` substitution shared with model command lines
//! - **Context**: agent input flattened into template variables
//!
//! # Template Syntax
//!
//! ```text
//! Feature: {feature_name}
//! Description: {description}
//!
//! Earlier deliverables:
//! {previous_deliverables}
//! ```
//!
//! Use `{{` to escape and render a literal `{`.

mod context;
mod template;

pub use context::PromptContext;
pub use template::{TemplateError, TemplateVars, render_template, vars};
