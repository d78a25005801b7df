//! 宿主循环：从输入流读取信封，逐条分发，把结果写回输出流
//!
//! 一个信封在以下任一时刻结束：缓冲内容已能解析为 JSON、遇到空行、输入结束。
//! 解码失败输出 "Error: <message>"；成功输出 "Command <name> returned: <result>"；
//! task_complete 输出 "Shutting down..." 并结束循环。

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands::router::error_text;
use crate::commands::{envelope, CommandOutput, Router};
use crate::core::CommandError;

/// 按行累积输入，切分出完整的信封文本
#[derive(Debug, Default)]
pub struct EnvelopeFramer {
    buffer: String,
}

impl EnvelopeFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推入一行；若凑成一个信封则返回其文本。代码块围栏行（``` / ```json）直接跳过
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return self.finish();
        }
        if is_fence(line) {
            return None;
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
        if envelope::parse_json(&self.buffer).is_some() {
            return self.finish();
        }
        None
    }

    /// 取出剩余缓冲（输入结束或遇到空行时）
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return None;
        }
        Some(std::mem::take(&mut self.buffer))
    }
}

fn is_fence(line: &str) -> bool {
    line.trim()
        .strip_prefix("```")
        .is_some_and(|tag| tag.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// 处理一个信封，返回 (输出文本, 是否结束)
pub async fn respond(router: &Router, raw: &str) -> (String, bool) {
    match envelope::parse(raw) {
        Err(e) => {
            tracing::warn!(error = %e, "envelope rejected");
            (error_text(&CommandError::from(e)), false)
        }
        Ok(env) => match router.dispatch(&env.name, env.args).await {
            CommandOutput::Shutdown => (CommandOutput::Shutdown.to_string(), true),
            output => (format!("Command {} returned: {}", env.name, output), false),
        },
    }
}

/// 运行宿主循环直到输入结束、task_complete 或外部关闭信号
pub async fn run<R, W>(router: &Router, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let token = router.shutdown_manager().token();
    let mut lines = reader.lines();
    let mut framer = EnvelopeFramer::new();

    loop {
        let line = tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("shutdown signal received, leaving host loop");
                break;
            }
            line = lines.next_line() => line?,
        };

        let (frame, eof) = match line {
            Some(line) => (framer.push_line(&line), false),
            None => (framer.finish(), true),
        };

        if let Some(raw) = frame {
            let (text, done) = respond(router, &raw).await;
            writer.write_all(text.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            if done {
                break;
            }
        }
        if eof {
            break;
        }
    }
    Ok(())
}
