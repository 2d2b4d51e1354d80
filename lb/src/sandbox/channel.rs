//! SandboxChannel - file-based hand-off to the container runtime

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SandboxConfig;

use super::protocol::{ResultDescriptor, TaskDescriptor, result_file_name, task_file_name};

/// Outcome of one sandbox exchange
///
/// Channel failures (missing container, timeout, runner errors) are reported
/// here with a human-readable log, never raised to the orchestrator.
#[derive(Debug, Clone)]
pub struct SandboxOutcome {
    pub success: bool,
    pub log: String,
}

impl SandboxOutcome {
    fn completed(log: impl Into<String>) -> Self {
        Self {
            success: true,
            log: log.into(),
        }
    }

    fn failure(log: impl Into<String>) -> Self {
        Self {
            success: false,
            log: log.into(),
        }
    }
}

/// Hands tool-tag batches to the sandbox container and collects their logs
pub struct SandboxChannel {
    config: SandboxConfig,
}

impl SandboxChannel {
    /// Create a channel with the given configuration
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Execute tool-tag text inside the sandbox container
    ///
    /// Writes a uniquely-named task descriptor, invokes the runner inside the
    /// container, and polls for the result descriptor. Both descriptors are
    /// removed on every path so no temp files leak.
    pub async fn execute(&self, tool_code: &str) -> SandboxOutcome {
        let task_id = uuid::Uuid::now_v7().to_string();
        let host_task = self.config.io_dir.join(task_file_name(&task_id));
        let host_result = self.config.io_dir.join(result_file_name(&task_id));

        if let Err(e) = tokio::fs::create_dir_all(&self.config.io_dir).await {
            return SandboxOutcome::failure(format!("Failed to create sandbox io directory: {}", e));
        }

        let descriptor = TaskDescriptor {
            task_id: task_id.clone(),
            tool_code: tool_code.to_string(),
        };
        let payload = match serde_json::to_string(&descriptor) {
            Ok(p) => p,
            Err(e) => return SandboxOutcome::failure(format!("Failed to encode task descriptor: {}", e)),
        };
        if let Err(e) = tokio::fs::write(&host_task, payload).await {
            return SandboxOutcome::failure(format!("Failed to write task descriptor: {}", e));
        }

        // Path the runner sees inside the container
        let container_task = format!(
            "{}/{}",
            self.config.container_dir.trim_end_matches('/'),
            task_file_name(&task_id)
        );

        info!(%task_id, container = %self.config.container, "Dispatching task to sandbox");
        debug!(%container_task, "SandboxChannel::execute: invoking runner");

        let output = match tokio::process::Command::new(&self.config.docker_bin)
            .arg("exec")
            .arg(&self.config.container)
            .arg(&self.config.runner)
            .arg(&container_task)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                self.cleanup(&host_task, &host_result).await;
                return SandboxOutcome::failure(format!(
                    "Failed to invoke sandbox runtime '{}': {}",
                    self.config.docker_bin, e
                ));
            }
        };

        if !output.status.success() {
            let mut log = format!(
                "Sandbox runner failed (exit code: {}).\n",
                output.status.code().unwrap_or(-1)
            );
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stdout.is_empty() {
                log.push_str(&format!("STDOUT: {}\n", stdout));
            }
            if !stderr.is_empty() {
                log.push_str(&format!("STDERR: {}\n", stderr));
            }

            self.cleanup(&host_task, &host_result).await;
            return SandboxOutcome::failure(log);
        }

        let outcome = self.await_result(&host_result).await;
        self.cleanup(&host_task, &host_result).await;
        outcome
    }

    /// Poll for the result descriptor until it appears or the timeout elapses
    async fn await_result(&self, host_result: &Path) -> SandboxOutcome {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(self.config.timeout_ms);
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        while tokio::time::Instant::now() < deadline {
            if tokio::fs::try_exists(host_result).await.unwrap_or(false) {
                let content = match tokio::fs::read_to_string(host_result).await {
                    Ok(content) => content,
                    Err(e) => {
                        return SandboxOutcome::failure(format!("Failed to read result descriptor: {}", e));
                    }
                };

                return match serde_json::from_str::<ResultDescriptor>(&content) {
                    Ok(result) => {
                        debug!(task_id = %result.task_id, "SandboxChannel::await_result: result received");
                        SandboxOutcome::completed(result.execution_log)
                    }
                    Err(e) => SandboxOutcome::failure(format!("Failed to parse result descriptor: {}", e)),
                };
            }
            tokio::time::sleep(poll_interval).await;
        }

        warn!("Timed out waiting for the sandbox result");
        SandboxOutcome::failure("Timed out waiting for the sandbox result")
    }

    /// Remove both descriptors; missing files are fine
    async fn cleanup(&self, host_task: &Path, host_result: &Path) {
        let _ = tokio::fs::remove_file(host_task).await;
        let _ = tokio::fs::remove_file(host_result).await;
    }
}
