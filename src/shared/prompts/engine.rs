//! Template engine for prompt management using Jinja2 syntax.
//!
//! Templates live in `templates/prompts/` and are compiled into the binary, so the
//! service does not depend on its working directory at runtime.

use minijinja::{Environment, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Template name (relative to `templates/prompts/`) and source
const TEMPLATES: &[(&str, &str)] = &[
    (
        "dataset_summary/system.jinja",
        include_str!("../../../templates/prompts/dataset_summary/system.jinja"),
    ),
    (
        "dataset_summary/user.jinja",
        include_str!("../../../templates/prompts/dataset_summary/user.jinja"),
    ),
    (
        "dataset_chat/system.jinja",
        include_str!("../../../templates/prompts/dataset_chat/system.jinja"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template with the given context.
///
/// # Arguments
/// * `template_name` - The template path relative to `templates/prompts/` (e.g., "dataset_chat/system.jinja")
/// * `ctx` - A HashMap of variable names to values
pub fn render_template(
    template_name: &str,
    ctx: &HashMap<&str, Value>,
) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    let render_ctx = Value::from_iter(ctx.iter().map(|(k, v)| (*k, v.clone())));

    template
        .render(render_ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[cfg(test)]
pub fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}
