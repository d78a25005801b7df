//! 命令层：信封解析、命令表、路由与各命令实现
//!
//! 每条命令实现 Command trait（name / description / required_args / execute），
//! 由 CommandTable 按名注册，Router 在调用时检查必需参数、加超时、捕获 panic，
//! 并在最外层把 CommandError 转为文本。

pub mod agents;
pub mod args;
pub mod code;
pub mod envelope;
pub mod files;
pub mod lifecycle;
pub mod memory;
pub mod registry;
pub mod router;
pub mod web;

use std::fmt;

use async_trait::async_trait;

use crate::core::CommandError;

pub use args::Args;
pub use envelope::{parse, Envelope};
pub use registry::{CommandTable, BUILTIN_COMMANDS};
pub use router::Router;

/// 命令结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Text(String),
    /// 上报的非致命失败（如记忆键越界），显示为 None
    NoResult,
    /// task_complete：结束宿主循环
    Shutdown,
}

impl CommandOutput {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}

impl From<Option<String>> for CommandOutput {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NoResult, Self::Text)
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::NoResult => f.write_str("None"),
            Self::Shutdown => f.write_str("Shutting down..."),
        }
    }
}

/// 命令 trait：名称、描述（供 LLM 理解）、必需参数、异步执行
#[async_trait]
pub trait Command: Send + Sync {
    /// 命令名（信封中的 "name" 字段）
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// 必需参数名；Router 在调用 execute 前检查它们是否出现
    fn required_args(&self) -> &'static [&'static str] {
        &[]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError>;
}
