//! SkillContext - execution context for skills

use std::path::{Path, PathBuf};
use tracing::debug;

/// Execution context for skills - scoped to a single run
///
/// Relative paths passed to filesystem and shell capabilities resolve against
/// `workdir`. One context is created per workflow run (or per tool batch) and
/// discarded afterwards.
#[derive(Debug, Clone)]
pub struct SkillContext {
    /// Base directory for relative paths and spawned commands
    pub workdir: PathBuf,

    /// Run identifier (for log correlation)
    pub run_id: String,
}

impl SkillContext {
    /// Create a new skill context
    pub fn new(workdir: PathBuf, run_id: String) -> Self {
        debug!(?workdir, %run_id, "SkillContext::new: called");
        Self { workdir, run_id }
    }

    /// Resolve a path relative to the workdir
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }
}
