//! Profile-driven specialist agents.
//!
//! Every role shares one execution shape: render prompts from the agent input,
//! call the language model once, persist the reply under the role's stage
//! directory, and optionally grade it with a quality check. What differs per
//! role lives in a static [`SpecialistProfile`].

use super::prompt::{PromptContext, TemplateVars, render_template};
use super::{Agent, AgentInput, AgentOutput};
use crate::config::ModelConfig;
use crate::error::{OrchestratorError, Result};
use crate::fs::ArtifactStore;
use crate::llm::{CompletionRequest, LanguageModel};
use crate::workflow::{AgentRole, Deliverable, DeliverableKind, QualityGate};
use crate::workspace::Stage;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// User prompt shared by every role except the product manager.
const DEFAULT_USER_TEMPLATE: &str = "Execute your role for this feature:

Feature: {feature_name}
Description: {description}

User stories:
{user_stories}

Acceptance criteria:
{acceptance_criteria}

Target package: {target_package}
Existing spec: {spec_path}

Workspace: {workspace}
Target project: {project}

Deliverables produced so far:
{previous_deliverables}

Please produce your deliverable according to your role and expertise.
";

const REQUIREMENTS_USER_TEMPLATE: &str = "Create a comprehensive PRD for this feature:

Feature description:
{description}

User stories provided:
{user_stories}

Acceptance criteria provided:
{acceptance_criteria}

Target package: {target_package}

Write the PRD in Markdown with an Overview, User Personas, a `## User Stories`
section where every story carries its Acceptance Criteria, Technical
Considerations, Success Metrics and Out of Scope.
";

/// Built-in check applied to a specialist's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    /// Requirements document has user stories and acceptance criteria.
    RequirementsCompleteness,
    /// Security audit reports no CRITICAL or HIGH finding.
    SecurityAudit,
}

impl GateCheck {
    pub fn evaluate(&self, content: &str) -> QualityGate {
        match self {
            GateCheck::RequirementsCompleteness => {
                let lower = content.to_lowercase();
                let has_user_stories = lower.contains("## user stories");
                let has_acceptance_criteria = lower.contains("acceptance criteria");
                let passed = has_user_stories && has_acceptance_criteria;
                let message = if passed {
                    "requirements include user stories and acceptance criteria"
                } else {
                    "requirements are missing required sections"
                };
                QualityGate::new("Requirements Completeness", passed, message)
                    .with_details(details([
                        ("has_user_stories", json!(has_user_stories)),
                        ("has_acceptance_criteria", json!(has_acceptance_criteria)),
                    ]))
            }
            GateCheck::SecurityAudit => {
                let critical = content.contains("CRITICAL");
                let high = content.contains("HIGH");
                let passed = !critical && !high;
                let message = if passed {
                    "no critical vulnerabilities found"
                } else {
                    "critical vulnerabilities detected"
                };
                QualityGate::new("Security Audit", passed, message).with_details(details([
                    ("critical", json!(critical)),
                    ("high", json!(high)),
                ]))
            }
        }
    }
}

/// Static description of one role's specialist.
#[derive(Debug, Clone, Copy)]
pub struct SpecialistProfile {
    pub role: AgentRole,
    pub display_name: &'static str,
    /// Overrides the configured model temperature when set.
    pub temperature: Option<f32>,
    pub system_prompt: &'static str,
    pub user_template: &'static str,
    pub stage: Stage,
    /// Path relative to the stage directory.
    pub file_name: &'static str,
    pub deliverable_name: &'static str,
    pub kind: DeliverableKind,
    pub gate: Option<GateCheck>,
}

impl SpecialistProfile {
    /// Where this profile's artifact lands inside a workspace.
    pub fn artifact_path(&self, workspace_path: &Path) -> PathBuf {
        workspace_path
            .join(self.stage.dir_name())
            .join(self.file_name)
    }
}

/// Profile for a role.
pub fn profile_for(role: AgentRole) -> SpecialistProfile {
    let base = SpecialistProfile {
        role,
        display_name: "",
        temperature: None,
        system_prompt: "",
        user_template: DEFAULT_USER_TEMPLATE,
        stage: Stage::Docs,
        file_name: "",
        deliverable_name: "",
        kind: DeliverableKind::Document,
        gate: None,
    };

    match role {
        AgentRole::ProductManager => SpecialistProfile {
            display_name: "Product Manager",
            temperature: Some(0.3),
            system_prompt: "You are an expert Product Manager for multi-tenant SaaS applications.
Turn feature ideas into PRDs with clear personas, user stories in the form
\"As a [persona], I want to [action] so that [benefit]\", and 3-5 acceptance
criteria per story. Consider permissions, data isolation, accessibility and
internationalization.

Project path: {project}
Feature workspace: {workspace}",
            user_template: REQUIREMENTS_USER_TEMPLATE,
            stage: Stage::Requirements,
            file_name: "prd.md",
            deliverable_name: "Product Requirements Document",
            gate: Some(GateCheck::RequirementsCompleteness),
            ..base
        },
        AgentRole::UxResearcher => SpecialistProfile {
            display_name: "UX Researcher",
            temperature: Some(0.3),
            system_prompt: "You are a UX Researcher for SaaS applications.
Analyze user journeys, personas and interaction patterns for mobile and
desktop, accessibility requirements, and personal vs team account flows.",
            stage: Stage::Requirements,
            file_name: "ux-analysis.md",
            deliverable_name: "UX Analysis",
            ..base
        },
        AgentRole::BusinessAnalyst => SpecialistProfile {
            display_name: "Business Analyst",
            temperature: Some(0.2),
            system_prompt: "You are a Business Analyst for SaaS products.
Define detailed acceptance criteria in Given/When/Then form, success metrics,
business rules, edge cases and error scenarios.",
            stage: Stage::Requirements,
            file_name: "acceptance-criteria.md",
            deliverable_name: "Acceptance Criteria",
            ..base
        },
        AgentRole::SolutionsArchitect => SpecialistProfile {
            display_name: "Solutions Architect",
            system_prompt: "You are a Solutions Architect for Next.js + Supabase applications.
Design the component hierarchy, data flow, affected packages, API surface and
state management. Include Mermaid diagrams.

Project: {project}",
            stage: Stage::Architecture,
            file_name: "system-design.md",
            deliverable_name: "System Design",
            ..base
        },
        AgentRole::DatabaseArchitect => SpecialistProfile {
            display_name: "Database Architect",
            system_prompt: "You are a Database Architect specializing in PostgreSQL.
Design table schemas, indexes, row level security policies, functions,
triggers and relationships with a focus on data integrity.",
            stage: Stage::Architecture,
            file_name: "database-design.md",
            deliverable_name: "Database Design",
            ..base
        },
        AgentRole::SecurityArchitect => SpecialistProfile {
            display_name: "Security Architect",
            system_prompt: "You are a Security Architect for SaaS applications.
Define authentication and authorization requirements, data isolation policies,
input validation, OWASP Top 10 mitigations and audit logging.",
            stage: Stage::Architecture,
            file_name: "security-model.md",
            deliverable_name: "Security Model",
            ..base
        },
        AgentRole::DatabaseEngineer => SpecialistProfile {
            display_name: "Database Engineer",
            system_prompt: "You are a Database Engineer specializing in PostgreSQL migrations.
Write a production-ready SQL migration: tables, indexes, row level security,
functions, triggers and foreign keys. Use gen_random_uuid() for ids.

Project: {project}",
            stage: Stage::Database,
            file_name: "migration.sql",
            deliverable_name: "Database Migration",
            kind: DeliverableKind::File,
            ..base
        },
        AgentRole::BackendEngineer => SpecialistProfile {
            display_name: "Backend Engineer",
            system_prompt: "You are a Backend Engineer for Next.js applications.
Implement type-safe server actions with schema validation, a service layer
over the database client, and explicit error handling.

Project: {project}",
            stage: Stage::Backend,
            file_name: "server-actions.ts",
            deliverable_name: "Server Actions",
            kind: DeliverableKind::File,
            ..base
        },
        AgentRole::FrontendEngineer => SpecialistProfile {
            display_name: "Frontend Engineer",
            system_prompt: "You are a Frontend Engineer specializing in React and Next.js.
Implement server components by default, client components where needed,
validated forms and responsive, accessible UI.

Project: {project}",
            stage: Stage::Frontend,
            file_name: "components/feature-component.tsx",
            deliverable_name: "Feature Component",
            kind: DeliverableKind::File,
            ..base
        },
        AgentRole::QaEngineer => SpecialistProfile {
            display_name: "QA Engineer",
            temperature: Some(0.2),
            system_prompt: "You are a QA Engineer for SaaS applications.
Define test scenarios for happy paths and edge cases, end-to-end and database
coverage, test data, and how each acceptance criterion is validated.",
            stage: Stage::Tests,
            file_name: "test-plan.md",
            deliverable_name: "Test Plan",
            ..base
        },
        AgentRole::E2eTestEngineer => SpecialistProfile {
            display_name: "E2E Test Engineer",
            system_prompt: "You are an E2E Test Engineer using Playwright.
Write tests for complete user flows using data-test selectors, covering
authentication, personal and team accounts, UI state and accessibility.

Project: {project}",
            stage: Stage::Tests,
            file_name: "e2e/feature.spec.ts",
            deliverable_name: "E2E Tests",
            kind: DeliverableKind::File,
            ..base
        },
        AgentRole::DbTestEngineer => SpecialistProfile {
            display_name: "Database Test Engineer",
            system_prompt: "You are a Database Test Engineer using pgTAP.
Test row level security policies, functions, triggers, constraints and
permissions with pgTAP assertions.",
            stage: Stage::Tests,
            file_name: "db/feature-tests.sql",
            deliverable_name: "Database Tests",
            kind: DeliverableKind::File,
            ..base
        },
        AgentRole::SecurityEngineer => SpecialistProfile {
            display_name: "Security Engineer",
            system_prompt: "You are a Security Engineer specializing in web application security.
Audit for injection, XSS, CSRF, row level security bypasses, input validation
gaps, exposed secrets and authorization flaws. Generate the security audit
report with severity ratings.",
            stage: Stage::Reviews,
            file_name: "security-audit.md",
            deliverable_name: "Security Audit Report",
            kind: DeliverableKind::Report,
            gate: Some(GateCheck::SecurityAudit),
            ..base
        },
        AgentRole::CodeReviewer => SpecialistProfile {
            display_name: "Code Reviewer",
            system_prompt: "You are a Senior Code Reviewer.
Review TypeScript and React practices, duplication, naming, error handling
and maintainability. Give constructive feedback.",
            stage: Stage::Reviews,
            file_name: "code-review.md",
            deliverable_name: "Code Review",
            kind: DeliverableKind::Report,
            ..base
        },
        AgentRole::PerformanceEngineer => SpecialistProfile {
            display_name: "Performance Engineer",
            system_prompt: "You are a Performance Engineer.
Analyze bundle size, query plans, N+1 queries, missing indexes, unnecessary
re-renders and Core Web Vitals impact. Recommend optimizations.",
            stage: Stage::Reviews,
            file_name: "performance-audit.md",
            deliverable_name: "Performance Audit",
            kind: DeliverableKind::Report,
            ..base
        },
        AgentRole::TechnicalWriter => SpecialistProfile {
            display_name: "Technical Writer",
            temperature: Some(0.2),
            system_prompt: "You are a Technical Writer for developer documentation.
Write a feature overview, API reference, usage examples, configuration guide
and troubleshooting tips.",
            stage: Stage::Docs,
            file_name: "README.md",
            deliverable_name: "Feature Documentation",
            ..base
        },
        AgentRole::DevopsEngineer => SpecialistProfile {
            display_name: "DevOps Engineer",
            system_prompt: "You are a DevOps Engineer.
Plan the migration strategy, environment variables, CI/CD changes, rollback
procedure, monitoring and a deployment checklist.",
            stage: Stage::Docs,
            file_name: "deployment-guide.md",
            deliverable_name: "Deployment Guide",
            ..base
        },
    }
}

/// The standard capability for a role.
pub struct SpecialistAgent {
    profile: SpecialistProfile,
    settings: ModelConfig,
    model: Arc<dyn LanguageModel>,
    store: Arc<dyn ArtifactStore>,
}

impl SpecialistAgent {
    pub fn new(
        profile: SpecialistProfile,
        settings: ModelConfig,
        model: Arc<dyn LanguageModel>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            profile,
            settings,
            model,
            store,
        }
    }

    fn render(&self, template: &str, vars: &TemplateVars) -> Result<String> {
        render_template(template, vars).map_err(|e| {
            OrchestratorError::Config(format!(
                "prompt template for '{}' is invalid: {}",
                self.profile.role, e
            ))
        })
    }
}

#[async_trait]
impl Agent for SpecialistAgent {
    async fn execute(&self, input: &AgentInput) -> Result<AgentOutput> {
        let profile = &self.profile;
        let vars = PromptContext::from_input(input).to_template_vars();

        let request = CompletionRequest {
            role: profile.role,
            system_prompt: self.render(profile.system_prompt, &vars)?,
            user_prompt: self.render(profile.user_template, &vars)?,
            model: self.settings.name.clone(),
            temperature: profile.temperature.unwrap_or(self.settings.temperature),
            max_tokens: self.settings.max_tokens,
        };
        let content = self.model.complete(&request).await?;
        if content.trim().is_empty() {
            return Ok(AgentOutput::failure(format!(
                "model returned an empty response for '{}'",
                profile.role
            )));
        }

        let path = profile.artifact_path(&input.workspace_path);
        self.store.write(&path, &content).await?;
        debug!(role = %profile.role, path = %path.display(), bytes = content.len(), "artifact written");

        let gates = profile
            .gate
            .map(|check| check.evaluate(&content))
            .into_iter()
            .collect();
        let deliverable = Deliverable::new(profile.deliverable_name, profile.kind, path, profile.role)
            .with_metadata(details([
                ("stage", json!(profile.stage.dir_name())),
                ("model", json!(request.model)),
            ]))
            .with_content(content);

        Ok(AgentOutput::success(vec![deliverable], gates)
            .with_metadata(details([("feature_name", json!(input.feature_name))])))
    }
}

fn details<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
