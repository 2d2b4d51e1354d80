//! Workflow document loading and validation
//!
//! Documents live in a designated directory and are all loaded at startup.
//! Each document defines exactly one workflow. Later loads of a document with
//! the same `name` replace the prior registry entry (last-load-wins, no merge).
//!
//! A malformed document cannot be run, so validation errors here are real
//! errors - unlike step failures, which are recovered into result data.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::definition::WorkflowDefinition;

/// Errors raised while loading a workflow document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse workflow document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("'steps' must be a sequence")]
    StepsNotASequence,

    #[error("Step {index} missing required field: {field}")]
    StepMissingField { index: usize, field: &'static str },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse and validate a workflow document
pub fn load_str(text: &str) -> Result<WorkflowDefinition, LoadError> {
    let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
    validate_document(&doc)?;

    let definition: WorkflowDefinition = serde_yaml::from_value(doc)?;
    Ok(definition)
}

/// Validate the raw document shape before typed deserialization
fn validate_document(doc: &serde_yaml::Value) -> Result<(), LoadError> {
    for field in ["name", "description", "steps"] {
        if doc.get(field).is_none() {
            return Err(LoadError::MissingField { field });
        }
    }

    let steps = doc
        .get("steps")
        .and_then(serde_yaml::Value::as_sequence)
        .ok_or(LoadError::StepsNotASequence)?;

    for (index, step) in steps.iter().enumerate() {
        for field in ["name", "skill", "action"] {
            if step.get(field).is_none() {
                return Err(LoadError::StepMissingField { index, field });
            }
        }
    }

    Ok(())
}

/// In-memory registry of loaded workflow definitions, keyed by name
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    workflows: HashMap<String, WorkflowDefinition>,
}

impl WorkflowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any prior entry with the same name
    pub fn insert(&mut self, definition: WorkflowDefinition) -> Option<WorkflowDefinition> {
        debug!(name = %definition.name, "WorkflowRegistry::insert: called");
        self.workflows.insert(definition.name.clone(), definition)
    }

    /// Load a single document file into the registry
    pub fn load_file(&mut self, path: &Path) -> Result<String, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let definition = load_str(&content)?;
        let name = definition.name.clone();

        if self.insert(definition).is_some() {
            debug!(%name, "load_file: replaced existing workflow");
        }
        info!("Workflow loaded: {}", name);
        Ok(name)
    }

    /// Load every workflow document from a directory
    ///
    /// Per-file failures are logged and skipped so one bad document cannot
    /// block the rest. Returns the number of documents loaded.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        if !dir.exists() {
            warn!("Workflow directory not found: {}", dir.display());
            return 0;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read workflow directory {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut count = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_workflow = path
                .extension()
                .map(|e| e == "lobster" || e == "yml" || e == "yaml")
                .unwrap_or(false);
            if !is_workflow {
                debug!(?path, "load_dir: skipping non-workflow file");
                continue;
            }

            match self.load_file(&path) {
                Ok(_) => count += 1,
                Err(e) => warn!(?path, error = %e, "Failed to load workflow document"),
            }
        }

        info!("{} workflows loaded from {}", count, dir.display());
        count
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.workflows.get(name)
    }

    /// Check whether a workflow is registered
    pub fn contains(&self, name: &str) -> bool {
        self.workflows.contains_key(name)
    }

    /// Registered workflow names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workflows.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Number of registered workflows
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Check if no workflows are loaded
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// Iterate over registered definitions
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WorkflowDefinition)> {
        self.workflows.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const VALID: &str = r#"
name: morning-briefing
description: Collect notes and summarize them
version: "1.1"
author: lobster
variables:
  target: notes
steps:
  - name: collect
    skill: shell
    action: execute
    params:
      command: "ls {{ target }}"
  - name: save
    skill: filesystem
    action: write_file
    params:
      path: "briefing_{{ date }}.txt"
      content: "{{ step_0_result.stdout }}"
"#;

    #[test]
    fn test_load_valid_document() {
        let def = load_str(VALID).unwrap();

        assert_eq!(def.name, "morning-briefing");
        assert_eq!(def.version, "1.1");
        assert_eq!(def.steps.len(), 2);
        assert_eq!(def.steps[1].action, "write_file");
    }

    #[test]
    fn test_missing_name() {
        let yaml = "description: x\nsteps: []\n";
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field: "name" }));
    }

    #[test]
    fn test_missing_description() {
        let yaml = "name: x\nsteps: []\n";
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field: "description" }));
    }

    #[test]
    fn test_missing_steps() {
        let yaml = "name: x\ndescription: y\n";
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field: "steps" }));
    }

    #[test]
    fn test_steps_not_a_sequence() {
        let yaml = "name: x\ndescription: y\nsteps: not-a-list\n";
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::StepsNotASequence));
    }

    #[test]
    fn test_step_missing_skill() {
        let yaml = r#"
name: x
description: y
steps:
  - name: one
    action: execute
"#;
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::StepMissingField { index: 0, field: "skill" }));
    }

    #[test]
    fn test_step_missing_action_reports_index() {
        let yaml = r#"
name: x
description: y
steps:
  - name: one
    skill: shell
    action: execute
  - name: two
    skill: shell
"#;
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::StepMissingField { index: 1, field: "action" }));
    }

    #[test]
    fn test_last_load_wins() {
        let mut registry = WorkflowRegistry::new();

        let first = load_str(VALID).unwrap();
        registry.insert(first);

        let updated = load_str(&VALID.replace("Collect notes", "Updated description")).unwrap();
        let replaced = registry.insert(updated);

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .get("morning-briefing")
                .unwrap()
                .description
                .contains("Updated")
        );
    }

    #[test]
    fn test_load_dir_skips_bad_documents() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("good.lobster"), VALID).unwrap();
        fs::write(temp.path().join("bad.lobster"), "name: broken\n").unwrap();
        fs::write(temp.path().join("ignored.txt"), "not a workflow").unwrap();

        let mut registry = WorkflowRegistry::new();
        let count = registry.load_dir(temp.path());

        assert_eq!(count, 1);
        assert!(registry.contains("morning-briefing"));
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let mut registry = WorkflowRegistry::new();
        let count = registry.load_dir(Path::new("/nonexistent/workflows"));

        assert_eq!(count, 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_dir_accepts_yaml_extensions() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.yml"), VALID.replace("morning-briefing", "wf-a")).unwrap();
        fs::write(temp.path().join("b.yaml"), VALID.replace("morning-briefing", "wf-b")).unwrap();

        let mut registry = WorkflowRegistry::new();
        let count = registry.load_dir(temp.path());

        assert_eq!(count, 2);
        assert_eq!(registry.names(), vec!["wf-a", "wf-b"]);
    }
}
