//! Variable interpolation for step params
//!
//! Step params may contain handlebars templates: simple substitution
//! (`{{ var }}`), transformation helpers (`{{upper var}}`, `{{lower var}}`),
//! and inline conditionals (`{{#if var}}...{{/if}}`). Interpolation recurses
//! through mappings and sequences and never aborts a step: a template that
//! fails to render (unknown variable, syntax error) is kept verbatim and a
//! warning is logged.

use chrono::Local;
use handlebars::{Handlebars, handlebars_helper};
use serde_json::{Map, Value};
use tracing::warn;

handlebars_helper!(upper: |s: String| s.to_uppercase());
handlebars_helper!(lower: |s: String| s.to_lowercase());

/// Renders templates embedded in step params
pub struct Interpolator {
    hbs: Handlebars<'static>,
}

impl Interpolator {
    /// Create an interpolator with the standard helpers
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        // Strict mode makes unknown variables an error, so the original
        // string survives instead of silently becoming empty
        hbs.set_strict_mode(true);
        hbs.register_helper("upper", Box::new(upper));
        hbs.register_helper("lower", Box::new(lower));

        Self { hbs }
    }

    /// Recursively interpolate a value against the context
    pub fn interpolate(&self, value: &Value, context: &Map<String, Value>) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.interpolate(v, context)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.interpolate(v, context)).collect()),
            Value::String(template) => Value::String(self.render(template, context)),
            other => other.clone(),
        }
    }

    /// Interpolate every entry of a params mapping
    pub fn interpolate_params(&self, params: &Map<String, Value>, context: &Map<String, Value>) -> Map<String, Value> {
        params
            .iter()
            .map(|(k, v)| (k.clone(), self.interpolate(v, context)))
            .collect()
    }

    fn render(&self, template: &str, context: &Map<String, Value>) -> String {
        match self.hbs.render_template(template, context) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("Failed to interpolate '{}': {}", template, e);
                template.to_string()
            }
        }
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in context variables available in every run
pub fn builtin_context(workflow_name: &str) -> Map<String, Value> {
    let now = Local::now();

    let mut context = Map::new();
    context.insert("date".to_string(), Value::String(now.format("%Y%m%d").to_string()));
    context.insert(
        "datetime".to_string(),
        Value::String(now.format("%Y%m%d_%H%M%S").to_string()),
    );
    context.insert("timestamp".to_string(), Value::String(now.to_rfc3339()));
    context.insert("workflow_name".to_string(), Value::String(workflow_name.to_string()));
    context
}
