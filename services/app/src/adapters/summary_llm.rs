//! services/app/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the summary-generating LLM.
//! It implements the `SummaryGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use study_sync_core::{
    ai::parse_summary,
    ports::{PortError, PortResult, SummaryGenerationService},
};

const SYSTEM_INSTRUCTIONS: &str = "Summarize the text into 3-5 short, punchy bullet points. \
Return JSON: { \"points\": [\"string\"] }";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummaryGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `SummaryGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryGenerationService for OpenAiSummaryAdapter {
    /// Distills note content into a short list of bullet points.
    async fn summarize(&self, content: &str) -> PortResult<Vec<String>> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(content.to_string())
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

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let raw = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Summary LLM response contained no text content.".to_string())
            })?;

        parse_summary(&raw).map_err(|e| PortError::Unexpected(e.to_string()))
    }
}
