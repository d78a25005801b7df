//! LLM 客户端抽象（对话预言机）
//!
//! 子 Agent、摘要器与代码工具都只依赖 LlmClient：给定模型名与完整对话，返回一条回复。

use async_trait::async_trait;

use crate::memory::Message;

/// 累计 token 用量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成；model 为空时使用客户端自身的默认模型
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, String>;

    fn default_model(&self) -> &str;

    /// 不统计用量的实现返回 None
    fn usage(&self) -> Option<Usage> {
        None
    }
}
