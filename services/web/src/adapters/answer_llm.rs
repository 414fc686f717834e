//! services/web/src/adapters/answer_llm.rs
//!
//! This module contains the adapter for the answer-generating LLM.
//! It implements the `AnswerGenerator` port from the `core` crate by sending
//! the prompt as a single user message to an OpenAI-compatible chat endpoint
//! (Gemini exposes one under `/v1beta/openai`).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use study_hub_core::ports::{AnswerGenerator, PortError, PortResult};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AnswerGenerator` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct GeminiAnswerAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiAnswerAdapter {
    /// Creates a new `GeminiAnswerAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `AnswerGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnswerGenerator for GeminiAnswerAdapter {
    async fn generate_answer(&self, prompt: &str) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        info!(
            "Sending a {}-character prompt to model {}",
            prompt.len(),
            self.model
        );
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PortError::Unexpected("The model returned no text".to_string()))
    }
}
