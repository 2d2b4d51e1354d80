//! Skill dispatch error types

use thiserror::Error;

/// Errors that can occur resolving a skill capability
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Skill '{skill}' has no action '{action}'")]
    UnknownAction { skill: String, action: String },

    #[error("Skill '{name}' not found")]
    SkillNotFound { name: String },
}

impl SkillError {
    /// Shorthand for the unknown-action variant
    pub fn unknown_action(skill: &str, action: &str) -> Self {
        Self::UnknownAction {
            skill: skill.to_string(),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_message() {
        let err = SkillError::unknown_action("filesystem", "frobnicate");

        let msg = err.to_string();
        assert!(msg.contains("filesystem"));
        assert!(msg.contains("frobnicate"));
    }

    #[test]
    fn test_skill_not_found_message() {
        let err = SkillError::SkillNotFound {
            name: "telegram".to_string(),
        };

        assert!(err.to_string().contains("telegram"));
    }
}
