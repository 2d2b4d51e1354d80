//! Tool-tag parser - extracts tool invocations from free-form text

use regex::Regex;
use std::sync::LazyLock;

/// Tag grammar: an opening marker with a `code` attribute, a free-form body,
/// and the first matching closing marker. Non-greedy, spans lines. There is no
/// escaping: a literal `</tool>` inside a body terminates it.
static TOOL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<tool code="([^"]+)">\s*(.*?)\s*</tool>"#).expect("tool tag pattern is valid")
});

/// One parsed tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Tool name from the `code` attribute
    pub name: String,

    /// Body text between the markers, trimmed
    pub argument: String,
}

/// Extract tool invocations from `text` in document order
///
/// Returns `None` when no tags are present, so callers can distinguish
/// "nothing to log" from "executed zero tools". Malformed tags (unclosed,
/// misspelled attribute) are simply not matched - no partial-parse error.
pub fn parse_tool_tags(text: &str) -> Option<Vec<ToolInvocation>> {
    let invocations: Vec<ToolInvocation> = TOOL_TAG
        .captures_iter(text)
        .map(|cap| ToolInvocation {
            name: cap[1].trim().to_string(),
            argument: cap[2].trim().to_string(),
        })
        .collect();

    if invocations.is_empty() { None } else { Some(invocations) }
}
