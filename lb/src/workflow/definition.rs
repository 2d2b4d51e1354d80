//! Workflow and step definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A workflow definition as loaded from a YAML document
///
/// Immutable after load; keyed by `name` in the registry. Reloading a
/// document with the same name replaces the prior entry wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Unique registry key
    pub name: String,

    /// Human-readable description
    pub description: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_author")]
    pub author: String,

    /// Default variables, overridable by the caller at run time
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Ordered steps
    pub steps: Vec<StepDefinition>,
}

/// One unit of workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Step name (for logs and the result trail)
    pub name: String,

    /// Skill registry key; must resolve at execution time
    pub skill: String,

    /// Action name on the skill
    pub action: String,

    /// Keyword params, may contain interpolation templates
    #[serde(default)]
    pub params: Map<String, Value>,

    /// Keep executing later steps even if this one fails
    #[serde(default)]
    pub continue_on_error: bool,

    /// Re-attempts after a failure (0 = single attempt)
    #[serde(default)]
    pub retry: u32,

    /// Pause between attempts in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay: f64,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_author() -> String {
    "Unknown".to_string()
}

fn default_retry_delay() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_step() {
        let yaml = r#"
name: greet
skill: shell
action: execute
"#;

        let step: StepDefinition = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(step.name, "greet");
        assert!(step.params.is_empty());
        assert!(!step.continue_on_error);
        assert_eq!(step.retry, 0);
        assert_eq!(step.retry_delay, 1.0);
    }

    #[test]
    fn test_deserialize_full_step() {
        let yaml = r#"
name: backup
skill: filesystem
action: write_file
params:
  path: "backup_{{ date }}.txt"
  content: "{{ step_0_result.stdout }}"
  overwrite: true
continue_on_error: true
retry: 2
retry_delay: 0.5
"#;

        let step: StepDefinition = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(step.skill, "filesystem");
        assert_eq!(step.params["overwrite"], serde_json::json!(true));
        assert!(step.continue_on_error);
        assert_eq!(step.retry, 2);
        assert_eq!(step.retry_delay, 0.5);
    }

    #[test]
    fn test_definition_metadata_defaults() {
        let yaml = r#"
name: sample
description: A sample workflow
steps:
  - name: one
    skill: shell
    action: execute
"#;

        let def: WorkflowDefinition = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(def.version, "1.0");
        assert_eq!(def.author, "Unknown");
        assert!(def.variables.is_empty());
        assert_eq!(def.steps.len(), 1);
    }
}
