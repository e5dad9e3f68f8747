//! `{variable}` substitution for prompts and model command lines.
//!
//! - `{name}` substitutes the value of variable `name` (surrounding
//!   whitespace inside the braces is ignored)
//! - `{{` and `}}` render literal braces
//! - a lone `}` is kept as-is
//!
//! Undefined variables are errors rather than empty substitutions, so a typo
//! in a specialist template fails loudly.

use std::collections::HashMap;
use std::fmt;

/// Variables available to a template.
pub type TemplateVars = HashMap<String, String>;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    UndefinedVariable { name: String, position: usize },
    /// A `{` was found without a matching `}`.
    UnmatchedBrace { position: usize },
    /// `{}` with nothing inside.
    EmptyVariableName { position: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedVariable { name, position } => write!(
                f,
                "undefined variable '{}' at position {} in template",
                name, position
            ),
            TemplateError::UnmatchedBrace { position } => {
                write!(f, "unmatched '{{' at position {} in template", position)
            }
            TemplateError::EmptyVariableName { position } => write!(
                f,
                "empty variable name '{{}}' at position {} in template",
                position
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Render a template string by substituting variables.
pub fn render_template(template: &str, variables: &TemplateVars) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(TemplateError::UnmatchedBrace { position: pos });
                }

                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }

                let value = variables
                    .get(name)
                    .ok_or_else(|| TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position: pos,
                    })?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> TemplateVars
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_substitution() {
        let vars = vars([("feature", "activity-log"), ("role", "qa-engineer")]);
        let result = render_template("{role} working on {feature}", &vars).unwrap();
        assert_eq!(result, "qa-engineer working on activity-log");
    }

    #[test]
    fn test_escaped_braces() {
        let vars = TemplateVars::new();
        let result = render_template("json: {{\"a\": 1}}", &vars).unwrap();
        assert_eq!(result, "json: {\"a\": 1}");
    }

    #[test]
    fn test_lone_closing_brace_is_kept() {
        let vars = TemplateVars::new();
        assert_eq!(render_template("a } b", &vars).unwrap(), "a } b");
    }

    #[test]
    fn test_whitespace_inside_braces_is_trimmed() {
        let vars = vars([("model", "claude-sonnet-4.5")]);
        let result = render_template("--model { model }", &vars).unwrap();
        assert_eq!(result, "--model claude-sonnet-4.5");
    }

    #[test]
    fn test_braces_in_values_are_not_reparsed() {
        let vars = vars([("code", "fn main() { {x} }")]);
        let result = render_template("Code: {code}", &vars).unwrap();
        assert_eq!(result, "Code: fn main() { {x} }");
    }

    #[test]
    fn test_undefined_variable_error() {
        let err = render_template("Hello {name}", &TemplateVars::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "name".to_string(),
                position: 6
            }
        );
    }

    #[test]
    fn test_unmatched_brace_error() {
        let err = render_template("Hello {name", &TemplateVars::new()).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 6 });
    }

    #[test]
    fn test_empty_variable_name_error() {
        let err = render_template("Hello { }", &TemplateVars::new()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyVariableName { position: 6 });
    }

    #[test]
    fn test_unicode_is_preserved() {
        let vars = vars([("text", "日本語")]);
        let result = render_template("→ {text} ✓", &vars).unwrap();
        assert_eq!(result, "→ 日本語 ✓");
    }

    #[test]
    fn test_error_display() {
        let err = TemplateError::UnmatchedBrace { position: 5 };
        assert_eq!(err.to_string(), "unmatched '{' at position 5 in template");
    }
}
