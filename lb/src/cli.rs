//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lobster - workflow automation agent
#[derive(Parser)]
#[command(
    name = "lobster",
    about = "Workflow automation engine and tool-execution protocol",
    version,
    after_help = "Logs are written to: ~/.local/share/lobster/logs/lobster.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run a workflow to completion
    Run {
        /// Workflow name (as registered from the workflows directory)
        workflow: String,

        /// Caller variables as KEY=VALUE (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List loaded workflows
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show details of one workflow
    Info {
        /// Workflow name
        workflow: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a workflow document without running it
    Check {
        /// Path to the workflow document
        file: PathBuf,
    },

    /// Parse tool tags from a file (or stdin) and execute them
    Exec {
        /// File containing tool-tag text; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Execute tool-tag text inside the sandbox container
    Sandbox {
        /// File containing tool-tag text
        file: PathBuf,
    },
}

/// Output format for run/list/info commands
#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_parsing() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_run_with_vars() {
        let cli = Cli::parse_from(["lobster", "run", "backup", "--var", "target=/tmp", "--var", "mode=full"]);

        match cli.command {
            Command::Run { workflow, vars, .. } => {
                assert_eq!(workflow, "backup");
                assert_eq!(vars, vec!["target=/tmp", "mode=full"]);
            }
            _ => panic!("expected run command"),
        }
    }
}
