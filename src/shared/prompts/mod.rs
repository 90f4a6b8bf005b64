//! Prompt template management module.
//!
//! Templates are stored in `templates/prompts/` and use Jinja2 syntax.
//!
//! # Usage
//!
//! ```ignore
//! use crate::shared::prompts::{render_summary_prompts, DatasetContext};
//!
//! let ctx = DatasetContext::new("sales.csv", &columns, &preview);
//! let prompts = render_summary_prompts(&ctx)?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

use crate::shared::constants::PREVIEW_ROWS;

/// What a prompt knows about an uploaded dataset
#[derive(Debug, Clone)]
pub struct DatasetContext<'a> {
    pub filename: &'a str,
    pub columns: &'a [String],
    /// First rows rendered as an aligned text grid
    pub preview: &'a str,
}

impl<'a> DatasetContext<'a> {
    pub fn new(filename: &'a str, columns: &'a [String], preview: &'a str) -> Self {
        Self {
            filename,
            columns,
            preview,
        }
    }

    fn to_template_context(&self) -> HashMap<&'static str, Value> {
        let mut ctx: HashMap<&str, Value> = HashMap::new();
        ctx.insert("filename", Value::from(self.filename));
        ctx.insert("columns", Value::from_serialize(self.columns));
        ctx.insert("preview", Value::from(self.preview));
        ctx.insert("preview_rows", Value::from(PREVIEW_ROWS));
        ctx
    }
}

/// System and user prompt for a one-shot dataset summary
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPrompts {
    pub system: String,
    pub user: String,
}

/// Render the prompt pair asking for a markdown summary of the dataset.
pub fn render_summary_prompts(dataset: &DatasetContext<'_>) -> Result<SummaryPrompts, TemplateError> {
    let ctx = dataset.to_template_context();

    Ok(SummaryPrompts {
        system: render_template("dataset_summary/system.jinja", &ctx)?,
        user: render_template("dataset_summary/user.jinja", &ctx)?,
    })
}

/// Render the system prompt that grounds a chat conversation in the dataset preview.
pub fn render_chat_system_prompt(dataset: &DatasetContext<'_>) -> Result<String, TemplateError> {
    render_template("dataset_chat/system.jinja", &dataset.to_template_context())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["city".to_string(), "sales".to_string()]
    }

    #[test]
    fn test_summary_prompts_embed_dataset() {
        let columns = columns();
        let preview = "    city  sales\n0  Lagos    1.5";
        let prompts =
            render_summary_prompts(&DatasetContext::new("sales.csv", &columns, preview)).unwrap();

        assert!(prompts.system.contains("data analysis assistant"));
        assert!(prompts.user.contains("'sales.csv'"));
        assert!(prompts.user.contains("columns: city, sales."));
        assert!(prompts.user.contains(preview));
        assert!(prompts.user.contains("## Summary"));
        assert!(prompts.user.contains("## Columns"));
        assert!(prompts.user.contains("## Key Insights"));
    }

    #[test]
    fn test_chat_prompt_grounds_in_preview() {
        let columns = columns();
        let prompt =
            render_chat_system_prompt(&DatasetContext::new("sales.csv", &columns, "PREVIEW"))
                .unwrap();

        assert!(prompt.contains("'sales.csv'"));
        assert!(prompt.contains("city, sales"));
        assert!(prompt.contains("PREVIEW"));
        assert!(prompt.contains("first 10 rows"));
    }

    #[test]
    fn test_preview_is_not_html_escaped() {
        let columns = vec!["a<b".to_string()];
        let prompt =
            render_chat_system_prompt(&DatasetContext::new("x&y.csv", &columns, "<NA>")).unwrap();
        assert!(prompt.contains("x&y.csv"));
        assert!(prompt.contains("a<b"));
        assert!(prompt.contains("<NA>"));
    }
}
