//! 命令路由
//!
//! 持有 CommandTable、单条命令超时与关闭信号。execute 保留 CommandError 种类；
//! dispatch 是唯一把错误转成文本的地方：未知命令得到提示文本，其余错误得到 "Error: <message>"。
//! handler 的 panic 也在这里被捕获，一条坏命令不会拖垮宿主进程。每次调用输出一条 JSON 审计日志。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use serde_json::{Map, Value};
use tokio::time::timeout;

use crate::commands::{Args, CommandOutput, CommandTable};
use crate::core::{CommandError, ShutdownManager, ShutdownReason};

pub struct Router {
    table: CommandTable,
    timeout: Duration,
    shutdown: Arc<ShutdownManager>,
}

/// 把错误转成调用方可读的文本
pub fn error_text(err: &CommandError) -> String {
    match err {
        CommandError::UnknownCommand(name) => format!("Unknown command {name}"),
        other => format!("Error: {other}"),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn args_preview(args: &Map<String, Value>) -> String {
    let s = Value::Object(args.clone()).to_string();
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}

impl Router {
    pub fn new(table: CommandTable, timeout_secs: u64, shutdown: Arc<ShutdownManager>) -> Self {
        Self {
            table,
            timeout: Duration::from_secs(timeout_secs),
            shutdown,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn shutdown_manager(&self) -> &Arc<ShutdownManager> {
        &self.shutdown
    }

    /// 执行命令，保留错误种类
    pub async fn execute(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CommandOutput, CommandError> {
        if self.shutdown.is_shutdown() {
            return Err(CommandError::ShutDown);
        }
        let command = self
            .table
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        if let Some(field) = command
            .required_args()
            .iter()
            .find(|field| !arguments.contains_key(**field))
        {
            return Err(CommandError::MissingArgument {
                command: name.to_string(),
                field: field.to_string(),
            });
        }

        let start = Instant::now();
        let preview = args_preview(&arguments);
        let args = Args::new(name, arguments);
        let result = timeout(
            self.timeout,
            AssertUnwindSafe(command.execute(&args)).catch_unwind(),
        )
        .await;

        let result = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(payload)) => Err(CommandError::Panicked(
                name.to_string(),
                panic_message(payload.as_ref()),
            )),
            Err(_) => Err(CommandError::Timeout(name.to_string())),
        };

        let outcome = match &result {
            Ok(CommandOutput::NoResult) => "no_result",
            Ok(_) => "ok",
            Err(CommandError::Timeout(_)) => "timeout",
            Err(CommandError::Panicked(..)) => "panic",
            Err(_) => "error",
        };
        let audit = serde_json::json!({
            "event": "command_audit",
            "command": name,
            "ok": result.is_ok(),
            "outcome": outcome,
            "duration_ms": start.elapsed().as_millis() as u64,
            "args_preview": preview,
        });
        tracing::info!(audit = %audit.to_string(), "command");

        if matches!(result, Ok(CommandOutput::Shutdown)) {
            self.shutdown.shutdown(ShutdownReason::TaskComplete);
        }
        result
    }

    /// 执行命令并把所有错误转成文本；只有 task_complete 返回 Shutdown
    pub async fn dispatch(&self, name: &str, arguments: Map<String, Value>) -> CommandOutput {
        match self.execute(name, arguments).await {
            Ok(output) => output,
            Err(err) => {
                if !matches!(err, CommandError::UnknownCommand(_)) {
                    tracing::warn!(command = %name, error = %err, "command failed");
                }
                CommandOutput::Text(error_text(&err))
            }
        }
    }
}
