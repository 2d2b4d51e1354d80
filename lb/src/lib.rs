//! Lobster - workflow automation engine for a personal agent
//!
//! Lobster turns LLM text output into side effects. Tool invocations arrive
//! as `<tool code="...">` tags and are dispatched onto a registry of skills
//! (shell, filesystem, http); structured automations are YAML workflow
//! documents executed step by step with variable interpolation, retry, and
//! continue-on-error policy. Batches that must not touch the host are handed
//! to an isolated container runtime over a file-based task channel.
//!
//! # Core Concepts
//!
//! - **Failures Are Data**: tool and step failures become result values, never
//!   panics - a run always completes or cleanly aborts
//! - **Closed Dispatch**: every (skill, action) pair resolves through an
//!   explicit match, with a generic fallback entry point per skill
//! - **Read-Only Registries**: the engine owns its skill and workflow tables;
//!   nothing mutates them during a run
//!
//! # Modules
//!
//! - [`tools`] - tool-tag parsing and execution
//! - [`skills`] - capability providers and their registry
//! - [`workflow`] - workflow loading, interpolation, and the execution engine
//! - [`sandbox`] - file-based hand-off to the sandbox container
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod sandbox;
pub mod skills;
pub mod tools;
pub mod workflow;

// Re-export commonly used types
pub use config::{Config, FetchConfig, SandboxConfig, ShellConfig, WorkflowsConfig};
pub use sandbox::{ResultDescriptor, SandboxChannel, SandboxOutcome, TaskDescriptor};
pub use skills::{Skill, SkillContext, SkillError, SkillRegistry, SkillResult};
pub use tools::{ToolExecutor, ToolInvocation, ToolResult, parse_tool_tags};
pub use workflow::{
    EngineError, Interpolator, LoadError, RunStatus, StepDefinition, StepResult, StepStatus, WorkflowDefinition,
    WorkflowEngine, WorkflowRegistry, WorkflowRunResult, builtin_context, load_str,
};
