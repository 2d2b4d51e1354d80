//! Skill system - named capability providers
//!
//! A skill exposes a closed set of actions (methods invocable by name with
//! keyword params) plus a generic `execute` entry point used when no named
//! action matches. Skills are looked up in a `SkillRegistry` by the workflow
//! engine and by the tool-tag executor.

mod context;
mod error;
mod registry;
mod traits;

pub mod builtin;

pub use context::SkillContext;
pub use error::SkillError;
pub use registry::SkillRegistry;
pub use traits::{Skill, SkillResult};
