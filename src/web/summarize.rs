//! 文本摘要协作者
//!
//! 长文本按字符数分块，逐块摘要后再对拼接的块摘要做一次总摘要。

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::Message;

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, String>;
}

/// 基于 LLM 的分块摘要
pub struct LlmSummarizer {
    llm: Arc<dyn LlmClient>,
    model: String,
    chunk_chars: usize,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, chunk_chars: usize) -> Self {
        Self {
            llm,
            model: model.into(),
            chunk_chars: chunk_chars.max(1),
        }
    }

    async fn summarize_chunk(&self, chunk: &str) -> Result<String, String> {
        let messages = vec![Message::user(format!(
            "Please summarize the following text, keeping the key facts:\n\n{chunk}"
        ))];
        self.llm.complete(&self.model, &messages).await
    }
}

/// 按行切分，单块不超过 max_chars 个字符；单行过长时硬切
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let mut line: Vec<char> = line.chars().collect();
        while line.len() > max_chars {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = line.split_off(max_chars);
            chunks.push(line.into_iter().collect());
            line = rest;
        }
        if current_len > 0 && current_len + 1 + line.len() > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current_len += line.len();
        current.extend(line);
    }
    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, String> {
        if text.trim().is_empty() {
            return Err("No text to summarize".to_string());
        }
        let chunks = split_text(text, self.chunk_chars);
        tracing::info!(chunks = chunks.len(), "summarizing text");

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            summaries.push(self.summarize_chunk(chunk).await?);
        }
        if summaries.len() == 1 {
            return Ok(summaries.remove(0));
        }
        self.summarize_chunk(&summaries.join("\n")).await
    }
}
