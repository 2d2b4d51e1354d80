//! sbx - sandbox-side task runner
//!
//! Runs inside the sandbox container. Reads the task descriptor named on the
//! command line, executes its tool-tag text, and writes the result descriptor
//! next to it. Structural problems (missing file, bad JSON, empty fields)
//! exit non-zero; tool failures are ordinary log content.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use lobster::sandbox::{ResultDescriptor, TaskDescriptor, result_file_name};
use lobster::skills::{SkillContext, SkillRegistry};
use lobster::tools::ToolExecutor;

/// Execute a Lobster task descriptor inside the sandbox
#[derive(Parser)]
#[command(name = "sbx", version)]
struct Cli {
    /// Path to the task descriptor file
    task_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let content = tokio::fs::read_to_string(&cli.task_file)
        .await
        .context(format!("Failed to read task file {}", cli.task_file.display()))?;

    let task: TaskDescriptor = serde_json::from_str(&content).context("Failed to parse task descriptor")?;

    if task.task_id.is_empty() || task.tool_code.is_empty() {
        eyre::bail!("Task descriptor is missing task_id or tool_code");
    }

    info!("Processing task: {}", task.task_id);

    let workdir = std::env::current_dir().context("Failed to get current directory")?;
    let skills = Arc::new(SkillRegistry::standard());
    let ctx = SkillContext::new(workdir, task.task_id.clone());
    let executor = ToolExecutor::new(skills, ctx);

    let execution_log = executor
        .run(&task.tool_code)
        .await
        .unwrap_or_else(|| "No tool tags found in the submitted code.".to_string());

    let result = ResultDescriptor {
        task_id: task.task_id.clone(),
        execution_log,
    };

    // The result lands in the same directory as the task
    let result_path = cli.task_file.with_file_name(result_file_name(&task.task_id));
    let payload = serde_json::to_string(&result).context("Failed to encode result descriptor")?;
    tokio::fs::write(&result_path, payload)
        .await
        .context(format!("Failed to write result descriptor {}", result_path.display()))?;

    info!("Result for task '{}' written to {}", task.task_id, result_path.display());
    Ok(())
}
