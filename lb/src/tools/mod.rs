//! Tool-tag protocol - parsing and executing `<tool code="...">` tags
//!
//! LLM output carries tool invocations as delimited text fragments:
//!
//! ```text
//! <tool code="run_shell">
//! ls -l
//! </tool>
//! ```
//!
//! The parser extracts them in document order; the executor dispatches each
//! one onto the skill registry and assembles an execution log.

mod executor;
mod parser;

pub use executor::{ToolExecutor, ToolResult};
pub use parser::{ToolInvocation, parse_tool_tags};
