use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeIssue {
    /// JSON pointer into the theme, empty for the root.
    pub pointer: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ThemeIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_at<'a>(&'a self, pointer: &'a str) -> impl Iterator<Item = &'a ThemeIssue> {
        self.issues.iter().filter(move |issue| issue.pointer == pointer)
    }
}

/// Checks a theme document against the full schema.
///
/// Fails only when the schema itself cannot be compiled; violations are
/// returned in the report.
pub fn validate_theme(schema: &Value, theme: &Value) -> Result<ValidationReport> {
    let validator =
        jsonschema::validator_for(schema).context("failed to compile theme schema")?;
    let issues: Vec<ThemeIssue> = validator
        .iter_errors(theme)
        .map(|error| ThemeIssue {
            pointer: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect();
    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "theme failed schema validation");
    }
    Ok(ValidationReport { issues })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Value {
        json!({
            "definitions": {
                "segment": {
                    "type": "object",
                    "required": ["type"],
                    "properties": {
                        "type": {"type": "string"},
                        "style": {"enum": ["plain", "powerline", "diamond"]}
                    }
                }
            },
            "type": "object",
            "properties": {
                "blocks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "segments": {
                                "type": "array",
                                "items": {"$ref": "#/definitions/segment"}
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn valid_theme_has_no_issues() {
        let theme = json!({"blocks": [{"segments": [{"type": "git", "style": "plain"}]}]});
        let report = validate_theme(&schema(), &theme).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn reports_issue_pointers() {
        let theme = json!({"blocks": [{"segments": [{"type": "git", "style": "fancy"}, {}]}]});
        let report = validate_theme(&schema(), &theme).unwrap();
        assert_eq!(report.issues.len(), 2);
        assert_eq!(
            report.issues_at("/blocks/0/segments/0/style").count(),
            1
        );
        assert_eq!(report.issues_at("/blocks/0/segments/1").count(), 1);
    }

    #[test]
    fn broken_schema_is_an_error() {
        let schema = json!({"type": 12});
        assert!(validate_theme(&schema, &json!({})).is_err());
    }
}
