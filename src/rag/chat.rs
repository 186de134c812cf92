//! OpenAI chat completion backend.

use super::ChatModel;
use crate::error::{Result, TubeqaError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by the OpenAI chat completions API.
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    pub fn new(model: &str, temperature: f32) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| TubeqaError::ModelCompletion(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| TubeqaError::ModelCompletion(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            TubeqaError::ModelCompletion(format!("Failed to generate response: {}", e))
        })?;

        let answer = reply_text(response)?;
        debug!("Model returned {} characters", answer.len());
        Ok(answer)
    }
}

/// Text of the first choice, as returned. A choice without content is an
/// empty answer; a response without choices is an error.
fn reply_text(response: CreateChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| TubeqaError::ModelCompletion("Response contained no choices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(choices: serde_json::Value) -> CreateChatCompletionResponse {
        serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o-mini",
            "choices": choices
        }))
        .unwrap()
    }

    #[test]
    fn test_reply_text_is_verbatim() {
        let reply = response(serde_json::json!([
            { "index": 0, "message": { "role": "assistant", "content": "  It means X.\n" }, "finish_reason": "stop" }
        ]));
        assert_eq!(reply_text(reply).unwrap(), "  It means X.\n");

        let empty = response(serde_json::json!([
            { "index": 0, "message": { "role": "assistant", "content": "" }, "finish_reason": "stop" }
        ]));
        assert_eq!(reply_text(empty).unwrap(), "");
    }

    #[test]
    fn test_reply_without_choices_fails() {
        assert!(matches!(
            reply_text(response(serde_json::json!([]))),
            Err(TubeqaError::ModelCompletion(_))
        ));
    }

    #[test]
    fn test_chat_model_creation() {
        let model = OpenAIChatModel::new("gpt-4o-mini", 0.7).unwrap();
        assert_eq!(model.model(), "gpt-4o-mini");
    }
}
