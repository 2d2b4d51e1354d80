//! ToolExecutor - dispatches parsed tool invocations onto skills

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::skills::{SkillContext, SkillError, SkillRegistry, SkillResult};

use super::parser::{ToolInvocation, parse_tool_tags};

/// Result of a single tool invocation
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Executes tool invocations against the skill registry
///
/// Tag names map onto builtin skill capabilities; unknown names become failed
/// results and never abort the rest of a batch.
pub struct ToolExecutor {
    skills: Arc<SkillRegistry>,
    ctx: SkillContext,
}

impl ToolExecutor {
    /// Create an executor over the given skills and context
    pub fn new(skills: Arc<SkillRegistry>, ctx: SkillContext) -> Self {
        Self { skills, ctx }
    }

    /// Parse `text` and execute every invocation in document order
    ///
    /// Returns the assembled execution log, or `None` when no tool tags were
    /// present (callers skip downstream logging entirely in that case).
    pub async fn run(&self, text: &str) -> Option<String> {
        let invocations = parse_tool_tags(text)?;

        let mut log = String::new();
        for invocation in &invocations {
            info!("Executing tool: {}", invocation.name);
            let result = self.execute(invocation).await;

            log.push_str(&format!("--- Tool Execution: {} ---\n", invocation.name));
            log.push_str(result.content.trim_end());
            log.push_str("\n\n");
        }

        Some(log.trim_end().to_string())
    }

    /// Execute a single invocation
    pub async fn execute(&self, invocation: &ToolInvocation) -> ToolResult {
        debug!(name = %invocation.name, "ToolExecutor::execute: called");
        match invocation.name.as_str() {
            "run_shell" => self.run_shell(&invocation.argument).await,
            "write_file" => self.write_file(&invocation.argument).await,
            "read_file" => self.read_file(&invocation.argument).await,
            "fetch_url" => self.fetch_url(&invocation.argument).await,
            other => ToolResult::error(format!("Unknown tool: {}", other)),
        }
    }

    async fn run_shell(&self, argument: &str) -> ToolResult {
        let result = self
            .invoke_skill("shell", "execute", json!({"command": argument}))
            .await;

        // The full transcript goes in the log even for failed commands
        if let Some(obj) = result.value.as_object() {
            let stdout = obj.get("stdout").and_then(Value::as_str).unwrap_or("");
            let stderr = obj.get("stderr").and_then(Value::as_str).unwrap_or("");
            let returncode = obj.get("returncode").and_then(Value::as_i64).unwrap_or(-1);

            let content = format!("STDOUT:\n{}\nSTDERR:\n{}\nReturn Code: {}", stdout, stderr, returncode);
            if result.success {
                ToolResult::success(content)
            } else {
                ToolResult::error(content)
            }
        } else {
            ToolResult::error(result.error.unwrap_or_else(|| "Shell execution failed".to_string()))
        }
    }

    async fn write_file(&self, argument: &str) -> ToolResult {
        // First line is the path, the rest is content
        let Some((path, content)) = argument.split_once('\n') else {
            return ToolResult::error(
                "write_file requires a path on the first line and content on the following lines",
            );
        };

        let result = self
            .invoke_skill(
                "filesystem",
                "write_file",
                json!({"path": path.trim(), "content": content}),
            )
            .await;

        if result.success {
            let message = result.value["message"].as_str().unwrap_or("File written").to_string();
            ToolResult::success(message)
        } else {
            ToolResult::error(result.error.unwrap_or_else(|| "File write failed".to_string()))
        }
    }

    async fn read_file(&self, argument: &str) -> ToolResult {
        let path = argument.trim();
        let result = self.invoke_skill("filesystem", "read_file", json!({"path": path})).await;

        if result.success {
            let content = result.value["content"].as_str().unwrap_or("");
            ToolResult::success(format!("Contents of '{}':\n{}", path, content))
        } else {
            ToolResult::error(result.error.unwrap_or_else(|| "File read failed".to_string()))
        }
    }

    async fn fetch_url(&self, argument: &str) -> ToolResult {
        let url = argument.trim();
        let result = self.invoke_skill("http", "fetch_url", json!({"url": url})).await;

        if result.success {
            let content = result.value["content"].as_str().unwrap_or("");
            ToolResult::success(format!("Content of URL '{}':\n{}", url, content))
        } else {
            ToolResult::error(result.error.unwrap_or_else(|| "URL fetch failed".to_string()))
        }
    }

    async fn invoke_skill(&self, skill_name: &str, action: &str, params: Value) -> SkillResult {
        let params: Map<String, Value> = params.as_object().cloned().unwrap_or_default();

        let Some(skill) = self.skills.get(skill_name) else {
            return SkillResult::err(format!("Skill '{}' not found", skill_name));
        };

        match skill.invoke(action, &params, &self.ctx).await {
            Ok(result) => result,
            Err(SkillError::UnknownAction { .. }) => skill.execute(&params, &self.ctx).await,
            Err(e) => SkillResult::err(e.to_string()),
        }
    }
}
