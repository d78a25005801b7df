//! LLM 层：客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock）

pub mod deepseek;
pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use crate::config::AppConfig;

pub use deepseek::{create_deepseek_client, deepseek_api_key, DEEPSEEK_CHAT};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use traits::{LlmClient, Usage};

/// 按顺序读取环境变量中的 API Key，空字符串视为未设置
pub fn api_key_from_env(vars: &[&str]) -> Option<String> {
    vars.iter()
        .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
}

/// 根据配置与环境变量选择 LLM 后端
///
/// 没有任何 API Key 时回退到 Mock，保证解释器在离线环境下也能启动。
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let timeout = cfg.llm.timeouts.request;

    match provider.as_str() {
        "mock" => {
            tracing::info!("Using Mock LLM");
            return Arc::new(MockLlmClient);
        }
        "deepseek" => {
            if let Some(key) = deepseek_api_key() {
                tracing::info!(model = %cfg.llm.model, "Using DeepSeek LLM");
                return Arc::new(
                    create_deepseek_client(&cfg.llm.model, &key).with_request_timeout(timeout),
                );
            }
        }
        "openai" => {
            if let Some(key) = api_key_from_env(&["OPENAI_API_KEY"]) {
                tracing::info!(model = %cfg.llm.model, "Using OpenAI-compatible LLM");
                return Arc::new(
                    OpenAiClient::new(cfg.llm.base_url.as_deref(), &cfg.llm.model, Some(&key))
                        .with_request_timeout(timeout),
                );
            }
        }
        _ => {}
    }
    tracing::warn!(provider = %provider, "No API key for LLM provider, falling back to Mock");
    Arc::new(MockLlmClient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "mock".to_string();
        assert_eq!(create_llm_from_config(&cfg).default_model(), "mock");
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        std::env::set_var("CONDUCTOR_TEST_EMPTY_KEY", "");
        std::env::set_var("CONDUCTOR_TEST_BLANK_KEY", "   ");
        std::env::set_var("CONDUCTOR_TEST_REAL_KEY", "sk-real");
        std::env::remove_var("CONDUCTOR_TEST_UNSET_KEY");

        assert_eq!(
            api_key_from_env(&["CONDUCTOR_TEST_EMPTY_KEY", "CONDUCTOR_TEST_UNSET_KEY"]),
            None
        );
        assert_eq!(
            api_key_from_env(&[
                "CONDUCTOR_TEST_EMPTY_KEY",
                "CONDUCTOR_TEST_BLANK_KEY",
                "CONDUCTOR_TEST_REAL_KEY"
            ]),
            Some("sk-real".to_string())
        );
    }
}
