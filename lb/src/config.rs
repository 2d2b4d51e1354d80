//! Lobster configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Lobster configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workflow document loading
    pub workflows: WorkflowsConfig,

    /// Shell capability defaults
    pub shell: ShellConfig,

    /// URL fetching defaults
    pub fetch: FetchConfig,

    /// Sandbox task channel
    pub sandbox: SandboxConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .lobster.yml
        let local_config = PathBuf::from(".lobster.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/lobster/lobster.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("lobster").join("lobster.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Workflow document loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowsConfig {
    /// Directory scanned for workflow documents at startup
    pub dir: PathBuf,
}

impl Default for WorkflowsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("workflows"),
        }
    }
}

/// Shell capability defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Command timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

/// URL fetching defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum characters of page text kept (bounds prompt size)
    #[serde(rename = "max-content-chars")]
    pub max_content_chars: usize,

    /// User-Agent header sent with requests
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_content_chars: 10_000,
            user_agent: format!("lobster/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Sandbox task channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Host directory shared with the sandbox container
    #[serde(rename = "io-dir")]
    pub io_dir: PathBuf,

    /// Name of the sandbox container
    pub container: String,

    /// Runner executable invoked inside the container
    pub runner: String,

    /// Path the shared directory is mounted at inside the container
    #[serde(rename = "container-dir")]
    pub container_dir: String,

    /// Container runtime binary
    #[serde(rename = "docker-bin")]
    pub docker_bin: String,

    /// Total time to wait for a result descriptor in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Poll interval while waiting in milliseconds
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            io_dir: PathBuf::from("sandbox_io"),
            container: "lobster-sandbox".to_string(),
            runner: "sbx".to_string(),
            container_dir: "/app/sandbox".to_string(),
            docker_bin: "docker".to_string(),
            timeout_ms: 120_000,
            poll_interval_ms: 500,
        }
    }
}
