//! Skill trait definition

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::context::SkillContext;
use super::error::SkillError;

/// A named capability provider invocable by the workflow engine
///
/// Dispatch is closed: `invoke` matches explicitly on the action names listed
/// by `actions()`. Anything else returns `SkillError::UnknownAction` so the
/// caller can fall back to the generic `execute` entry point.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Registry key (matches the `skill` field of workflow steps)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Actions this skill answers to
    fn actions(&self) -> &'static [&'static str];

    /// Invoke a named action with keyword params
    async fn invoke(&self, action: &str, params: &Map<String, Value>, ctx: &SkillContext)
    -> Result<SkillResult, SkillError>;

    /// Generic single-argument entry point, used when no named action matches
    async fn execute(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult;
}

/// Result of one skill action
///
/// `value` carries the action's payload fields; raw (non-mapping) payloads are
/// wrapped as `{success, result}` when merged into a workflow context.
#[derive(Debug, Clone)]
pub struct SkillResult {
    pub success: bool,
    pub value: Value,
    pub error: Option<String>,
}

impl SkillResult {
    /// Create a successful result carrying a payload
    pub fn ok(value: Value) -> Self {
        Self {
            success: true,
            value,
            error: None,
        }
    }

    /// Create a failed result with an error message
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            value: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Merge the result into a single mapping for contexts and logs
    ///
    /// Mapping payloads get `success` (and `error`, if any) folded in; other
    /// payloads are auto-wrapped as `{success, result}`.
    pub fn to_value(&self) -> Value {
        match &self.value {
            Value::Object(map) => {
                let mut merged = map.clone();
                merged.insert("success".to_string(), Value::Bool(self.success));
                if let Some(error) = &self.error {
                    merged.insert("error".to_string(), Value::String(error.clone()));
                }
                Value::Object(merged)
            }
            Value::Null if self.error.is_some() => json!({
                "success": self.success,
                "error": self.error,
            }),
            other => json!({
                "success": self.success,
                "result": other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_result_ok() {
        let result = SkillResult::ok(json!({"path": "a.txt"}));
        assert!(result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_skill_result_err() {
        let result = SkillResult::err("File not found");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("File not found"));
    }

    #[test]
    fn test_to_value_merges_mapping() {
        let result = SkillResult::ok(json!({"path": "a.txt", "size": 3}));
        let value = result.to_value();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["path"], json!("a.txt"));
        assert_eq!(value["size"], json!(3));
    }

    #[test]
    fn test_to_value_wraps_raw_payload() {
        let result = SkillResult::ok(json!(42));
        let value = result.to_value();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["result"], json!(42));
    }

    #[test]
    fn test_to_value_error() {
        let result = SkillResult::err("boom");
        let value = result.to_value();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!("boom"));
    }
}
