use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::modules::llm::ChatMessage;

/// Markdown summary of a dataset
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponseDto {
    #[schema(example = "# Monthly Sales\n## Summary\n...")]
    pub summary: String,
}

/// Chat request about one of the user's files
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequestDto {
    #[schema(example = 1)]
    pub file_id: Option<i64>,
    /// Conversation so far, oldest first
    pub messages: Option<Vec<ChatMessage>>,
}

impl ChatRequestDto {
    /// Both a file and at least one message are required
    pub fn into_parts(self) -> Result<(i64, Vec<ChatMessage>), AppError> {
        match (self.file_id, self.messages) {
            (Some(file_id), Some(messages)) if file_id != 0 && !messages.is_empty() => {
                Ok((file_id, messages))
            }
            _ => Err(AppError::BadRequest(
                "Missing file_id or messages".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponseDto {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> ChatRequestDto {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_chat_request_requires_file_and_messages() {
        let messages = json!([{ "role": "user", "content": "hi" }]);

        assert!(parse(json!({ "messages": messages })).into_parts().is_err());
        assert!(parse(json!({ "file_id": 3 })).into_parts().is_err());
        assert!(parse(json!({ "file_id": 3, "messages": [] }))
            .into_parts()
            .is_err());
        assert!(parse(json!({ "file_id": 0, "messages": messages }))
            .into_parts()
            .is_err());

        let (file_id, messages) = parse(json!({ "file_id": 3, "messages": messages }))
            .into_parts()
            .unwrap();
        assert_eq!(file_id, 3);
        assert_eq!(messages, vec![ChatMessage::user("hi")]);
    }
}
