//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点；DeepSeek 只是换了 base_url 与默认模型。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{api_key_from_env, LlmClient, Usage};
use crate::memory::{Message, Role};

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    request_timeout: Duration,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
}

fn request_message(m: &Message) -> Result<ChatCompletionRequestMessage, String> {
    let content = m.content.clone();
    let built = match m.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::System),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::User),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::Assistant),
    };
    built.map_err(|e| format!("invalid {:?} message: {e}", m.role))
}

impl OpenAiClient {
    /// api_key 为 None 时读取 OPENAI_API_KEY
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new();
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        let key = api_key
            .map(String::from)
            .or_else(|| api_key_from_env(&["OPENAI_API_KEY"]));
        if let Some(key) = key {
            config = config.with_api_key(key);
        }

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            request_timeout: Duration::from_secs(60),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
        }
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, String> {
        let model = if model.is_empty() { &self.model } else { model };
        let messages = messages
            .iter()
            .map(request_message)
            .collect::<Result<Vec<_>, _>>()?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()
            .map_err(|e| e.to_string())?;

        let response = tokio::time::timeout(self.request_timeout, self.client.chat().create(request))
            .await
            .map_err(|_| format!("LLM request timed out after {}s", self.request_timeout.as_secs()))?
            .map_err(|e| e.to_string())?;

        if let Some(usage) = &response.usage {
            self.prompt_tokens
                .fetch_add(usage.prompt_tokens as u64, Ordering::Relaxed);
            self.completion_tokens
                .fetch_add(usage.completion_tokens as u64, Ordering::Relaxed);
        }
        tracing::debug!(model, choices = response.choices.len(), "llm completion");

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn usage(&self) -> Option<Usage> {
        Some(Usage {
            prompt_tokens: self.prompt_tokens.load(Ordering::Relaxed),
            completion_tokens: self.completion_tokens.load(Ordering::Relaxed),
        })
    }
}
