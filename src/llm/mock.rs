//! Mock LLM 客户端（用于测试与离线运行，无需 API）
//!
//! 回显最后一条 User 消息，并带上本次看到的消息条数，便于验证子 Agent 对话状态是否累积。

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::{Message, Role};

/// Mock 客户端：回显用户最后一条消息
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _model: &str, messages: &[Message]) -> Result<String, String> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, Role::User))
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)");

        Ok(format!(
            "Echo from Mock ({} messages): {}",
            messages.len(),
            last_user
        ))
    }

    fn default_model(&self) -> &str {
        "mock"
    }
}
