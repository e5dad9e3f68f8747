//! Agent input flattened into template variables.
//!
//! Lists render as `- item` lines; absent values render as `None provided`
//! so every variable is always defined.

use super::template::TemplateVars;
use crate::agent::AgentInput;

/// Placeholder for empty optional inputs.
const NONE_PROVIDED: &str = "None provided";

/// Extracted context for one specialist prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub role: String,
    pub feature_name: String,
    pub description: String,
    pub user_stories: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub target_package: Option<String>,
    pub spec_path: Option<String>,
    pub workspace: String,
    pub project: String,
    /// `name (role): path` for each earlier deliverable.
    pub previous_deliverables: Vec<String>,
}

impl PromptContext {
    pub fn from_input(input: &AgentInput) -> Self {
        let request = &input.feature_request;
        Self {
            role: input.role.to_string(),
            feature_name: input.feature_name.clone(),
            description: request.description.clone(),
            user_stories: request.user_stories.clone(),
            acceptance_criteria: request.acceptance_criteria.clone(),
            target_package: request.target_package.clone(),
            spec_path: request
                .spec_path
                .as_ref()
                .map(|p| p.display().to_string()),
            workspace: input.workspace_path.display().to_string(),
            project: input.project_path.display().to_string(),
            previous_deliverables: input
                .previous_deliverables
                .iter()
                .map(|d| format!("{} ({}): {}", d.name, d.created_by, d.path.display()))
                .collect(),
        }
    }

    /// Convert the context to template variables.
    pub fn to_template_vars(&self) -> TemplateVars {
        let mut vars = TemplateVars::new();

        vars.insert("role".to_string(), self.role.clone());
        vars.insert("feature_name".to_string(), self.feature_name.clone());
        vars.insert("description".to_string(), self.description.clone());
        vars.insert("workspace".to_string(), self.workspace.clone());
        vars.insert("project".to_string(), self.project.clone());

        vars.insert("user_stories".to_string(), bullets(&self.user_stories));
        vars.insert(
            "acceptance_criteria".to_string(),
            bullets(&self.acceptance_criteria),
        );
        vars.insert(
            "previous_deliverables".to_string(),
            bullets(&self.previous_deliverables),
        );

        vars.insert(
            "target_package".to_string(),
            self.target_package
                .clone()
                .unwrap_or_else(|| NONE_PROVIDED.to_string()),
        );
        vars.insert(
            "spec_path".to_string(),
            self.spec_path
                .clone()
                .unwrap_or_else(|| NONE_PROVIDED.to_string()),
        );

        vars
    }
}

fn bullets(items: &[String]) -> String {
    if items.is_empty() {
        return NONE_PROVIDED.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{
        AgentRole, Deliverable, DeliverableKind, FeatureRequest, TaskInput,
    };
    use std::path::PathBuf;

    fn input(previous: Vec<Deliverable>) -> AgentInput {
        let request = FeatureRequest::new("Add a team activity log")
            .with_user_stories(vec!["As an owner I see who changed what".to_string()])
            .with_target_package("packages/features/activity");
        let task_input = TaskInput {
            workspace_path: PathBuf::from("/ws/feature-add-a-team-activity-log"),
            project_path: PathBuf::from("/projects/app"),
            feature_request: request,
        };
        AgentInput::from_task(
            AgentRole::SolutionsArchitect,
            "add-a-team-activity-log",
            &task_input,
            previous,
        )
    }

    #[test]
    fn test_vars_cover_request_fields() {
        let vars = PromptContext::from_input(&input(Vec::new())).to_template_vars();

        assert_eq!(vars["role"], "solutions-architect");
        assert_eq!(vars["feature_name"], "add-a-team-activity-log");
        assert_eq!(vars["description"], "Add a team activity log");
        assert_eq!(vars["user_stories"], "- As an owner I see who changed what");
        assert_eq!(vars["target_package"], "packages/features/activity");
        assert_eq!(vars["project"], "/projects/app");
    }

    #[test]
    fn test_missing_values_render_placeholder() {
        let vars = PromptContext::from_input(&input(Vec::new())).to_template_vars();

        assert_eq!(vars["acceptance_criteria"], NONE_PROVIDED);
        assert_eq!(vars["spec_path"], NONE_PROVIDED);
        assert_eq!(vars["previous_deliverables"], NONE_PROVIDED);
    }

    #[test]
    fn test_previous_deliverables_are_listed() {
        let prd = Deliverable::new(
            "Product Requirements Document",
            DeliverableKind::Document,
            "/ws/feature-x/01-requirements/prd.md",
            AgentRole::ProductManager,
        );
        let vars = PromptContext::from_input(&input(vec![prd])).to_template_vars();

        assert_eq!(
            vars["previous_deliverables"],
            "- Product Requirements Document (product-manager): /ws/feature-x/01-requirements/prd.md"
        );
    }
}
