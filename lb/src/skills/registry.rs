//! SkillRegistry - maps skill names to capability providers

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;

use super::builtin::{FilesystemSkill, HttpSkill, ShellSkill};
use super::traits::Skill;

/// Read-mostly lookup table of registered skills
///
/// Populated once at startup; the workflow engine treats it as read-only for
/// the duration of every run.
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
}

impl SkillRegistry {
    /// Create a registry with the standard builtin skills and default settings
    pub fn standard() -> Self {
        Self::from_config(&Config::default())
    }

    /// Create a registry with builtin skills configured from `config`
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(FilesystemSkill));
        registry.register(Arc::new(ShellSkill::new(config.shell.timeout_secs)));
        registry.register(Arc::new(HttpSkill::new(config.fetch.clone())));

        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        Self { skills: HashMap::new() }
    }

    /// Add a skill to the registry (replaces any previous skill with the same name)
    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        self.skills.insert(skill.name().to_string(), skill);
    }

    /// Look up a skill by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.skills.get(name).cloned()
    }

    /// Check if a skill exists
    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    /// Get registered skill names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.skills.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
