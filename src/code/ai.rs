//! AI 函数：让模型扮演一个给定签名与说明的 Python 函数，只返回其 return 值
//!
//! evaluate_code / improve_code / write_tests 都走这一条路径。

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::Message;

/// 代码助手协作者
#[async_trait]
pub trait CodeAssistant: Send + Sync {
    /// 分析代码并给出改进建议列表
    async fn evaluate_code(&self, code: &str) -> Result<String, String>;
    /// 按建议改写代码
    async fn improve_code(&self, suggestions: &[String], code: &str) -> Result<String, String>;
    /// 为代码生成测试，focus 为可选关注点
    async fn write_tests(&self, code: &str, focus: &[String]) -> Result<String, String>;
}

/// 基于 LLM 的代码助手
pub struct AiCodeTools {
    llm: Arc<dyn LlmClient>,
    model: String,
}

/// 构造 AI 函数调用的两条消息：system 描述函数，user 给出实参
pub fn ai_function_messages(function: &str, args: &[String], description: &str) -> Vec<Message> {
    vec![
        Message::system(format!(
            "You are now the following python function: ```# {description}\n{function}```\n\nOnly respond with your `return` value."
        )),
        Message::user(args.join(", ")),
    ]
}

fn py_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn py_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

impl AiCodeTools {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    async fn call(&self, function: &str, args: &[String], description: &str) -> Result<String, String> {
        let messages = ai_function_messages(function, args, description);
        self.llm.complete(&self.model, &messages).await
    }
}

#[async_trait]
impl CodeAssistant for AiCodeTools {
    async fn evaluate_code(&self, code: &str) -> Result<String, String> {
        self.call(
            "def analyze_code(code: str) -> List[str]:",
            &[py_str(code)],
            "Analyzes the given code and returns a list of suggestions for improvements.",
        )
        .await
    }

    async fn improve_code(&self, suggestions: &[String], code: &str) -> Result<String, String> {
        self.call(
            "def generate_improved_code(suggestions: List[str], code: str) -> str:",
            &[py_list(suggestions), py_str(code)],
            "Improves the provided code based on the suggestions provided, making no other changes.",
        )
        .await
    }

    async fn write_tests(&self, code: &str, focus: &[String]) -> Result<String, String> {
        self.call(
            "def create_test_cases(code: str, focus: Optional[str] = None) -> str:",
            &[py_str(code), py_list(focus)],
            "Generates test cases for the existing code, focusing on specific areas if required.",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;

    #[test]
    fn test_ai_function_messages() {
        let messages = ai_function_messages("def f(x: int) -> int:", &["1".into(), "2".into()], "Adds.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("```# Adds.\ndef f(x: int) -> int:```"));
        assert_eq!(messages[1].content, "1, 2");
    }

    #[test]
    fn test_python_literals() {
        assert_eq!(py_str("a\"b"), r#""a\"b""#);
        assert_eq!(py_list(&["x".into()]), r#"["x"]"#);
    }
}
