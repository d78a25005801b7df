//! task_complete：终止命令，不返回数据，由 Router 触发关闭信号

use async_trait::async_trait;

use crate::commands::{Args, Command, CommandOutput};
use crate::core::CommandError;

pub struct TaskComplete;

#[async_trait]
impl Command for TaskComplete {
    fn name(&self) -> &'static str {
        "task_complete"
    }

    fn description(&self) -> &'static str {
        "Task Complete (Shutdown)"
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let reason = args.get("reason").and_then(|v| v.as_str()).unwrap_or("");
        tracing::info!(reason = %reason, "Shutting down...");
        Ok(CommandOutput::Shutdown)
    }
}
