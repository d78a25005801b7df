//! Conductor 入口
//!
//! 初始化日志、加载配置、装配解释器，然后从 stdin 读取命令信封、向 stdout 输出结果，
//! 直到 task_complete、输入结束或收到 Ctrl+C / SIGTERM。
//! `conductor --list-commands` 只打印命令列表（可直接拼进 Agent 的 prompt）。

use std::sync::Arc;

use anyhow::Context;
use conductor::config::{load_config, AppConfig};
use conductor::core::ShutdownManager;
use conductor::{host, observability, Collaborators, Interpreter};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        AppConfig::default()
    });

    let shutdown = Arc::new(ShutdownManager::new());
    let collaborators = Collaborators::from_config(&cfg);
    let llm = collaborators.llm.clone();
    let interpreter = Interpreter::new(&cfg, collaborators, shutdown.clone())
        .context("Failed to build interpreter")?;

    if std::env::args().any(|a| a == "--list-commands") {
        print!("{}", interpreter.router().table().to_prompt_section());
        return Ok(());
    }

    shutdown.install_signal_handlers();

    let stdin = BufReader::new(tokio::io::stdin());
    host::run(interpreter.router(), stdin, tokio::io::stdout())
        .await
        .context("Host loop failed")?;

    let remaining = interpreter.agents().lock().await.len();
    let memories = interpreter.memory().lock().await.len();
    let usage = llm.usage().unwrap_or_default();
    tracing::info!(
        agents = remaining,
        memories,
        reason = ?shutdown.reason(),
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        "interpreter stopped"
    );
    Ok(())
}
