use std::sync::Arc;
use tracing::info;

use crate::core::error::Result;
use crate::features::files::models::File;
use crate::features::files::FileService;
use crate::modules::llm::{ChatCompletionClient, ChatMessage, CompletionOptions};
use crate::shared::constants::{CHAT_MAX_TOKENS, LLM_TEMPERATURE, PREVIEW_ROWS, SUMMARY_MAX_TOKENS};
use crate::shared::prompts::{render_chat_system_prompt, render_summary_prompts, DatasetContext};
use crate::shared::tabular::{render_preview, Table};

/// LLM-backed summaries and chat about the user's files
pub struct AiService {
    files: Arc<FileService>,
    llm: Arc<ChatCompletionClient>,
}

impl AiService {
    pub fn new(files: Arc<FileService>, llm: Arc<ChatCompletionClient>) -> Self {
        Self { files, llm }
    }

    /// Markdown summary (title, summary, columns, key insights) of a file
    pub async fn summary(&self, file_id: i64, user_id: i64) -> Result<String> {
        let (file, table) = self.prepare(file_id, user_id).await?;

        let columns = table.column_names();
        let preview = render_preview(&table, PREVIEW_ROWS);
        let prompts = render_summary_prompts(&DatasetContext::new(
            &file.filename,
            &columns,
            &preview,
        ))?;

        let messages = [
            ChatMessage::system(prompts.system),
            ChatMessage::user(prompts.user),
        ];
        let summary = self
            .llm
            .complete(&messages, options(SUMMARY_MAX_TOKENS))
            .await?;

        info!("Generated summary for file id={} ({} chars)", file.id, summary.len());
        Ok(summary)
    }

    /// Answer the latest message of a conversation about a file.
    ///
    /// The caller's history is sent as-is after a system prompt that carries the preview.
    pub async fn chat(
        &self,
        file_id: i64,
        user_id: i64,
        history: Vec<ChatMessage>,
    ) -> Result<String> {
        let (file, table) = self.prepare(file_id, user_id).await?;

        let columns = table.column_names();
        let preview = render_preview(&table, PREVIEW_ROWS);
        let system_prompt =
            render_chat_system_prompt(&DatasetContext::new(&file.filename, &columns, &preview))?;

        let mut conversation = Vec::with_capacity(history.len() + 1);
        conversation.push(ChatMessage::system(system_prompt));
        conversation.extend(history);

        let reply = self
            .llm
            .complete(&conversation, options(CHAT_MAX_TOKENS))
            .await?;

        info!(
            "Chat reply for file id={} after {} messages",
            file.id,
            conversation.len() - 1
        );
        Ok(reply)
    }

    /// Ownership check, then provider configuration, then the file itself
    async fn prepare(&self, file_id: i64, user_id: i64) -> Result<(File, Table)> {
        let file = self.files.find_owned(file_id, user_id).await?;
        self.llm.ensure_configured()?;
        let table = self.files.load_table(&file).await?;
        Ok((file, table))
    }
}

fn options(max_tokens: u32) -> CompletionOptions {
    CompletionOptions {
        temperature: LLM_TEMPERATURE,
        max_tokens,
    }
}
