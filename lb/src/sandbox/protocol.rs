//! Sandbox file protocol - descriptors exchanged with the container runtime

use serde::{Deserialize, Serialize};

/// Task descriptor written by the host, read by the sandbox runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub task_id: String,
    /// Raw tool-tag text to execute
    pub tool_code: String,
}

/// Result descriptor written by the sandbox runner, read by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDescriptor {
    pub task_id: String,
    pub execution_log: String,
}

/// File name of a task descriptor
pub fn task_file_name(task_id: &str) -> String {
    format!("task_{}.json", task_id)
}

/// File name of the result descriptor matching a task
pub fn result_file_name(task_id: &str) -> String {
    format!("result_{}.json", task_id)
}
