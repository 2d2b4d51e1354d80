//! http skill - fetch and clean web page content

use async_trait::async_trait;
use scraper::Html;
use serde_json::{Map, Value, json};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::skills::{Skill, SkillContext, SkillError, SkillResult};

/// Elements whose text never belongs in fetched page content
const EXCLUDED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "noscript"];

/// Fetch a URL and reduce it to prompt-sized text
pub struct HttpSkill {
    config: FetchConfig,
}

impl HttpSkill {
    /// Create an http skill with the given fetch settings
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Skill for HttpSkill {
    fn name(&self) -> &'static str {
        "http"
    }

    fn description(&self) -> &'static str {
        "Fetch a URL and convert HTML to readable text, truncated to bound prompt size."
    }

    fn actions(&self) -> &'static [&'static str] {
        &["fetch_url"]
    }

    async fn invoke(
        &self,
        action: &str,
        params: &Map<String, Value>,
        ctx: &SkillContext,
    ) -> Result<SkillResult, SkillError> {
        match action {
            "fetch_url" => Ok(self.fetch(params, ctx).await),
            _ => Err(SkillError::unknown_action(self.name(), action)),
        }
    }

    // Fetching IS this skill's generic entry point
    async fn execute(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        self.fetch(params, ctx).await
    }
}

impl HttpSkill {
    async fn fetch(&self, params: &Map<String, Value>, _ctx: &SkillContext) -> SkillResult {
        let Some(url) = params.get("url").and_then(Value::as_str) else {
            return SkillResult::err("'url' is required");
        };

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return SkillResult::err("URL must start with http:// or https://");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .user_agent(self.config.user_agent.as_str())
            .build()
            .unwrap_or_default();

        let response = match client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return SkillResult::err(format!("Failed to fetch URL '{}': {}", url, e)),
        };

        if !response.status().is_success() {
            return SkillResult::err(format!("HTTP error: {}", response.status()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return SkillResult::err(format!("Failed to read response: {}", e)),
        };

        let text = if content_type.contains("text/html") || content_type.contains("application/xhtml") {
            html_to_text(&body)
        } else {
            body
        };

        let content = truncate_chars(&text, self.config.max_content_chars);

        SkillResult::ok(json!({
            "url": url,
            "length": content.chars().count(),
            "content": content,
        }))
    }
}

/// Convert HTML to readable text, dropping non-content elements
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        if let Some(el) = node.value().as_element() {
            // Line breaks for block elements
            match el.name() {
                "p" | "div" | "br" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "tr" => {
                    parts.push("\n".to_string());
                }
                _ => {}
            }
        } else if let Some(text) = node.value().as_text() {
            let excluded = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| EXCLUDED_ELEMENTS.contains(&el.name()))
            });
            if excluded {
                continue;
            }

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }

    collapse_whitespace(&parts.join(" "))
}

/// Collapse runs of whitespace and blank lines
fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_space = false;
    let mut prev_newline = false;

    for ch in text.chars() {
        if ch == '\n' {
            if !prev_newline {
                result.push('\n');
            }
            prev_newline = true;
            prev_space = true;
        } else if ch.is_whitespace() {
            if !prev_space {
                result.push(' ');
            }
            prev_space = true;
        } else {
            result.push(ch);
            prev_space = false;
            prev_newline = false;
        }
    }

    result.trim().to_string()
}

/// Truncate at a character boundary
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_html_to_text_basic() {
        let html = r#"
            <html>
                <body>
                    <h1>Hello World</h1>
                    <p>This is a paragraph.</p>
                </body>
            </html>
        "#;

        let text = html_to_text(html);
        assert!(text.contains("Hello World"));
        assert!(text.contains("This is a paragraph."));
    }

    #[test]
    fn test_html_to_text_excludes_scripts_and_nav() {
        let html = r#"
            <html>
                <body>
                    <nav><a href="/">Site navigation</a></nav>
                    <p>Visible text</p>
                    <script>console.log('hidden');</script>
                    <style>body { color: red; }</style>
                    <footer>Copyright notice</footer>
                </body>
            </html>
        "#;

        let text = html_to_text(html);
        assert!(text.contains("Visible text"));
        assert!(!text.contains("Site navigation"));
        assert!(!text.contains("console.log"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Copyright notice"));
    }

    #[test]
    fn test_collapse_whitespace() {
        let messy = "  Hello    world\n\n\n\nMultiple    spaces  ";
        assert_eq!(collapse_whitespace(messy), "Hello world\nMultiple spaces");
    }

    #[test]
    fn test_truncate_chars() {
        let long = "x".repeat(12_000);
        let truncated = truncate_chars(&long, 10_000);
        assert_eq!(truncated.chars().count(), 10_000);

        let short = "short";
        assert_eq!(truncate_chars(short, 10_000), "short");
    }

    #[test]
    fn test_truncate_chars_multibyte_boundary() {
        let text = "é".repeat(20);
        let truncated = truncate_chars(&text, 10);
        assert_eq!(truncated.chars().count(), 10);
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_url() {
        let temp = tempdir().unwrap();
        let ctx = SkillContext::new(temp.path().to_path_buf(), "test".to_string());
        let skill = HttpSkill::new(FetchConfig::default());

        let mut params = Map::new();
        params.insert("url".to_string(), json!("file:///etc/passwd"));

        let result = skill.fetch(&params, &ctx).await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("http"));
    }

    #[tokio::test]
    async fn test_fetch_missing_url() {
        let temp = tempdir().unwrap();
        let ctx = SkillContext::new(temp.path().to_path_buf(), "test".to_string());
        let skill = HttpSkill::new(FetchConfig::default());

        let result = skill.fetch(&Map::new(), &ctx).await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("'url' is required"));
    }
}
