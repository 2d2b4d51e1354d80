//! WorkflowEngine - executes workflow steps in declaration order

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::skills::{SkillContext, SkillError, SkillRegistry, SkillResult};

use super::definition::StepDefinition;
use super::interpolate::{Interpolator, builtin_context};
use super::loader::WorkflowRegistry;

/// Status of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Result of one executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub step: String,
    pub success: bool,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a whole workflow run
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRunResult {
    /// True iff every attempted step succeeded; an aborted run is always a failure
    pub success: bool,
    pub workflow: String,
    /// Steps actually attempted, including the aborting step
    pub steps_executed: usize,
    pub steps_total: usize,
    pub results: Vec<StepResult>,
}

/// Structural errors - nothing was attempted
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Workflow '{name}' not found")]
    WorkflowNotFound { name: String },
}

/// Executes workflows against its own skill and workflow registries
///
/// The engine owns both registries; call sites never mutate them directly,
/// and they are read-only for the duration of every run. Runs are
/// single-file: steps execute strictly in declaration order, one at a time.
pub struct WorkflowEngine {
    skills: Arc<SkillRegistry>,
    workflows: WorkflowRegistry,
    interpolator: Interpolator,
    workdir: PathBuf,
}

impl WorkflowEngine {
    /// Create an engine over the given registries
    pub fn new(skills: Arc<SkillRegistry>, workflows: WorkflowRegistry, workdir: PathBuf) -> Self {
        Self {
            skills,
            workflows,
            interpolator: Interpolator::new(),
            workdir,
        }
    }

    /// The engine's workflow registry (read-only)
    pub fn workflows(&self) -> &WorkflowRegistry {
        &self.workflows
    }

    /// Execute a workflow to completion
    ///
    /// Caller variables override definition defaults; built-in variables
    /// (`date`, `datetime`, `timestamp`, `workflow_name`) override both.
    pub async fn execute(&self, name: &str, variables: Map<String, Value>) -> Result<WorkflowRunResult, EngineError> {
        let Some(definition) = self.workflows.get(name) else {
            return Err(EngineError::WorkflowNotFound { name: name.to_string() });
        };

        let mut status = RunStatus::Pending;
        debug!(workflow = %name, %status, "run created");

        // Seed the run-local execution context
        let mut context = Map::new();
        for (key, value) in &definition.variables {
            context.insert(key.clone(), Value::String(value.clone()));
        }
        for (key, value) in variables {
            context.insert(key, value);
        }
        for (key, value) in builtin_context(name) {
            context.insert(key, value);
        }

        let run_id = format!("{}-{}", name, uuid::Uuid::now_v7().simple());
        let skill_ctx = SkillContext::new(self.workdir.clone(), run_id);

        status = RunStatus::Running;
        info!(workflow = %name, %status, "Executing workflow");

        let steps_total = definition.steps.len();
        let mut results: Vec<StepResult> = Vec::new();

        for (index, step) in definition.steps.iter().enumerate() {
            info!("Executing step {}/{}: {}", index + 1, steps_total, step.name);

            let step_result = self.run_step(step, &context, &skill_ctx).await;

            // Later steps see this step's outcome during interpolation
            context.insert(format!("step_{}_result", index), step_result.result.clone());

            let failed = !step_result.success;
            if failed {
                warn!(
                    "Step '{}' failed: {}",
                    step.name,
                    step_result.error.as_deref().unwrap_or("no error message")
                );
            }
            results.push(step_result);

            if failed && !step.continue_on_error {
                error!("Step '{}' failed, aborting workflow", step.name);
                break;
            }
        }

        let success = results.iter().all(|r| r.success);
        status = if success { RunStatus::Succeeded } else { RunStatus::Failed };
        info!(workflow = %name, %status, steps = results.len(), "Workflow finished");

        Ok(WorkflowRunResult {
            success,
            workflow: definition.name.clone(),
            steps_executed: results.len(),
            steps_total,
            results,
        })
    }

    /// Fire-and-continue variant: runs the same step sequence off the
    /// caller's thread and returns immediately
    pub fn execute_detached(
        self: &Arc<Self>,
        name: &str,
        variables: Map<String, Value>,
    ) -> Result<tokio::task::JoinHandle<WorkflowRunResult>, EngineError> {
        if !self.workflows.contains(name) {
            return Err(EngineError::WorkflowNotFound { name: name.to_string() });
        }

        let engine = Arc::clone(self);
        let name = name.to_string();
        info!(workflow = %name, "Workflow started in background");

        Ok(tokio::spawn(async move {
            match engine.execute(&name, variables).await {
                Ok(result) => result,
                // The definition was present at submission; a failed lookup
                // here still must not panic the background task
                Err(e) => WorkflowRunResult {
                    success: false,
                    workflow: name,
                    steps_executed: 0,
                    steps_total: 0,
                    results: vec![StepResult {
                        step: String::new(),
                        success: false,
                        result: Value::Null,
                        error: Some(e.to_string()),
                    }],
                },
            }
        }))
    }

    /// Execute one step, applying its retry policy
    async fn run_step(&self, step: &StepDefinition, context: &Map<String, Value>, ctx: &SkillContext) -> StepResult {
        // Interpolate once; retries reuse the same params
        let params = self.interpolator.interpolate_params(&step.params, context);

        let mut status = StepStatus::Running;
        debug!(step = %step.name, %status, "step started");

        let mut attempt: u32 = 0;
        let final_result = loop {
            let result = self.invoke(step, &params, ctx).await;

            if result.success || attempt >= step.retry {
                break result;
            }

            attempt += 1;
            warn!(
                "Attempt {} of step '{}' failed, retrying in {}s",
                attempt, step.name, step.retry_delay
            );
            tokio::time::sleep(Duration::from_secs_f64(step.retry_delay)).await;
        };

        status = if final_result.success {
            StepStatus::Succeeded
        } else {
            StepStatus::Failed
        };
        debug!(step = %step.name, %status, attempts = attempt + 1, "step finished");

        StepResult {
            step: step.name.clone(),
            success: final_result.success,
            result: final_result.to_value(),
            error: final_result.error,
        }
    }

    /// Resolve and invoke the step's skill action
    async fn invoke(&self, step: &StepDefinition, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        let Some(skill) = self.skills.get(&step.skill) else {
            // A missing skill is an ordinary step failure, subject to the
            // same continue/abort policy as any other
            return SkillResult::err(format!("Skill '{}' not found", step.skill));
        };

        match skill.invoke(&step.action, params, ctx).await {
            Ok(result) => result,
            Err(SkillError::UnknownAction { .. }) => {
                debug!(skill = %step.skill, action = %step.action, "falling back to generic execute");
                skill.execute(params, ctx).await
            }
            Err(e) => SkillResult::err(e.to_string()),
        }
    }
}
