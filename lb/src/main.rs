//! Lobster - workflow automation agent
//!
//! CLI entry point for running workflows and tool-tag batches.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use serde_json::{Map, Value, json};
use tracing::info;

use lobster::cli::{Cli, Command, OutputFormat};
use lobster::config::Config;
use lobster::sandbox::SandboxChannel;
use lobster::skills::{SkillContext, SkillRegistry};
use lobster::tools::ToolExecutor;
use lobster::workflow::{WorkflowEngine, WorkflowRegistry, WorkflowRunResult, load_str};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lobster")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout - command output stays clean
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("lobster.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Run { workflow, vars, format } => cmd_run(&config, &workflow, &vars, format).await,
        Command::List { format } => cmd_list(&config, format),
        Command::Info { workflow, format } => cmd_info(&config, &workflow, format),
        Command::Check { file } => cmd_check(&file),
        Command::Exec { file } => cmd_exec(&config, file).await,
        Command::Sandbox { file } => cmd_sandbox(&config, &file).await,
    }
}

/// Build the engine over the configured workflows directory
fn build_engine(config: &Config) -> Result<Arc<WorkflowEngine>> {
    let mut workflows = WorkflowRegistry::new();
    let count = workflows.load_dir(&config.workflows.dir);
    info!("Loaded {} workflows from {}", count, config.workflows.dir.display());

    let skills = Arc::new(SkillRegistry::from_config(config));
    let workdir = std::env::current_dir().context("Failed to get current directory")?;

    Ok(Arc::new(WorkflowEngine::new(skills, workflows, workdir)))
}

/// Parse repeated KEY=VALUE arguments into a variables mapping
fn parse_vars(vars: &[String]) -> Result<Map<String, Value>> {
    let mut variables = Map::new();
    for var in vars {
        let (key, value) = var
            .split_once('=')
            .ok_or_else(|| eyre::eyre!("Invalid variable '{}': expected KEY=VALUE", var))?;
        variables.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(variables)
}

/// Run a workflow to completion
async fn cmd_run(config: &Config, workflow: &str, vars: &[String], format: OutputFormat) -> Result<()> {
    let engine = build_engine(config)?;
    let variables = parse_vars(vars)?;

    let result = engine.execute(workflow, variables).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => print_run_result(&result),
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Per-step trail plus a one-line verdict
fn print_run_result(result: &WorkflowRunResult) {
    println!("Workflow: {}", result.workflow);
    println!();

    for step in &result.results {
        if step.success {
            println!("  ✓ {}", step.step);
        } else {
            println!("  [ERROR] {}: {}", step.step, step.error.as_deref().unwrap_or("step failed"));
        }
    }

    println!();
    println!("Steps executed: {}/{}", result.steps_executed, result.steps_total);
    if result.success {
        println!("✓ Workflow '{}' completed successfully", result.workflow);
    } else {
        println!("✗ Workflow '{}' failed", result.workflow);
    }
}

/// List loaded workflows
fn cmd_list(config: &Config, format: OutputFormat) -> Result<()> {
    let mut workflows = WorkflowRegistry::new();
    workflows.load_dir(&config.workflows.dir);

    match format {
        OutputFormat::Json => {
            let entries: Vec<Value> = workflows
                .names()
                .iter()
                .filter_map(|name| workflows.get(name))
                .map(|def| {
                    json!({
                        "name": def.name,
                        "description": def.description,
                        "version": def.version,
                        "steps": def.steps.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if workflows.is_empty() {
                println!("No workflows found in {}", config.workflows.dir.display());
                return Ok(());
            }

            println!("Available workflows:");
            println!();
            for name in workflows.names() {
                if let Some(def) = workflows.get(name) {
                    println!("  {} (v{}, {} steps)", def.name, def.version, def.steps.len());
                    println!("    {}", def.description);
                    println!();
                }
            }
        }
    }

    Ok(())
}

/// Show details of one workflow
fn cmd_info(config: &Config, workflow: &str, format: OutputFormat) -> Result<()> {
    let mut workflows = WorkflowRegistry::new();
    workflows.load_dir(&config.workflows.dir);

    let def = workflows
        .get(workflow)
        .ok_or_else(|| eyre::eyre!("Workflow '{}' not found", workflow))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(def)?);
        }
        OutputFormat::Text => {
            println!("{} (v{})", def.name, def.version);
            println!("  {}", def.description);
            println!("  Author: {}", def.author);

            if !def.variables.is_empty() {
                println!("  Variables:");
                let mut keys: Vec<&String> = def.variables.keys().collect();
                keys.sort();
                for key in keys {
                    println!("    {} = {}", key, def.variables[key]);
                }
            }

            println!("  Steps:");
            for step in &def.steps {
                println!("    {} -> {}.{}", step.name, step.skill, step.action);
            }
        }
    }

    Ok(())
}

/// Validate a workflow document without running it
fn cmd_check(file: &PathBuf) -> Result<()> {
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;

    let def = load_str(&content).context(format!("Invalid workflow document: {}", file.display()))?;

    println!("✓ {} is valid ({} steps)", def.name, def.steps.len());
    Ok(())
}

/// Parse tool tags from a file or stdin and execute them
async fn cmd_exec(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
    };

    let skills = Arc::new(SkillRegistry::from_config(config));
    let workdir = std::env::current_dir().context("Failed to get current directory")?;
    let ctx = SkillContext::new(workdir, format!("exec-{}", std::process::id()));
    let executor = ToolExecutor::new(skills, ctx);

    match executor.run(&text).await {
        Some(log) => println!("{}", log),
        None => println!("No tool tags found."),
    }

    Ok(())
}

/// Execute tool-tag text inside the sandbox container
async fn cmd_sandbox(config: &Config, file: &PathBuf) -> Result<()> {
    let text = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;

    let channel = SandboxChannel::new(config.sandbox.clone());
    let outcome = channel.execute(&text).await;

    println!("{}", outcome.log);
    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
