//! Sandbox task channel
//!
//! Tool batches that must not run on the host are handed to an isolated
//! container runtime through a shared directory: the host writes a task
//! descriptor, invokes the runner inside the container, and polls for the
//! matching result descriptor. Each call uses a fresh task id, so concurrent
//! calls never collide; there is no queuing or back-pressure.

mod channel;
mod protocol;

pub use channel::{SandboxChannel, SandboxOutcome};
pub use protocol::{ResultDescriptor, TaskDescriptor, result_file_name, task_file_name};
