//! shell skill - execute shell commands

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

use crate::skills::{Skill, SkillContext, SkillError, SkillResult};

/// Execute shell commands with a bounded timeout
pub struct ShellSkill {
    default_timeout_secs: u64,
}

impl ShellSkill {
    /// Create a shell skill with the given default timeout
    pub fn new(default_timeout_secs: u64) -> Self {
        Self { default_timeout_secs }
    }
}

#[async_trait]
impl Skill for ShellSkill {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn description(&self) -> &'static str {
        "Execute a shell command in the workdir and capture stdout, stderr, and the exit code."
    }

    fn actions(&self) -> &'static [&'static str] {
        &["execute"]
    }

    async fn invoke(
        &self,
        action: &str,
        params: &Map<String, Value>,
        ctx: &SkillContext,
    ) -> Result<SkillResult, SkillError> {
        match action {
            "execute" => Ok(self.run(params, ctx).await),
            _ => Err(SkillError::unknown_action(self.name(), action)),
        }
    }

    // Running a command IS this skill's generic entry point
    async fn execute(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        self.run(params, ctx).await
    }
}

impl ShellSkill {
    async fn run(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        let Some(command) = params.get("command").and_then(Value::as_str) else {
            return SkillResult::err("'command' is required");
        };

        let timeout_secs = params
            .get("timeout_secs")
            .and_then(Value::as_u64)
            .unwrap_or(self.default_timeout_secs);

        debug!(%command, %timeout_secs, run_id = %ctx.run_id, "ShellSkill::run: spawning command");
        let output = match tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            tokio::process::Command::new("sh")
                .arg("-c")
                .arg(command)
                .current_dir(&ctx.workdir)
                .output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return SkillResult::err(format!("Failed to execute command: {}", e));
            }
            Err(_) => {
                return SkillResult::err(format!("Command timed out after {}s", timeout_secs));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let returncode = output.status.code().unwrap_or(-1);
        let success = output.status.success();

        debug!(%returncode, stdout_len = stdout.len(), stderr_len = stderr.len(), "ShellSkill::run: command completed");

        SkillResult {
            success,
            value: json!({
                "command": command,
                "returncode": returncode,
                "stdout": stdout,
                "stderr": stderr,
            }),
            error: if success {
                None
            } else {
                Some(format!("Command exited with code {}", returncode))
            },
        }
    }
}
