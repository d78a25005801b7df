//! DeepSeek 预设（OpenAI 兼容端点）

use crate::llm::{api_key_from_env, OpenAiClient};

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_CHAT: &str = "deepseek-chat";

/// DEEPSEEK_API_KEY 优先，其次 OPENAI_API_KEY；都没有时返回 None
pub fn deepseek_api_key() -> Option<String> {
    api_key_from_env(&["DEEPSEEK_API_KEY", "OPENAI_API_KEY"])
}

/// 空模型名回退到 deepseek-chat
pub fn create_deepseek_client(model: &str, api_key: &str) -> OpenAiClient {
    let model = if model.is_empty() { DEEPSEEK_CHAT } else { model };
    OpenAiClient::new(Some(DEEPSEEK_BASE_URL), model, Some(api_key))
}
