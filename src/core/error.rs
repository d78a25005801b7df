//! 错误类型：信封解码错误与命令执行错误
//!
//! 所有 handler 都返回 CommandError；只有 Router::dispatch 这一层把它转成给调用方看的文本
//! （"Error: ..." 或 "Unknown command ..."），错误种类在此之前一直保留，便于测试与日志。

use thiserror::Error;

/// 信封（{"command": {"name": ..., "args": {...}}}）解码失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid JSON")]
    InvalidSyntax,

    /// 缺少必需字段：command 或 name
    #[error("{}", missing_field_message(.0))]
    MissingField(&'static str),

    /// 其它意料之外的结构问题（如 command 不是对象、name 不是字符串）
    #[error("{0}")]
    Internal(String),
}

fn missing_field_message(field: &str) -> String {
    match field {
        "command" => "Missing 'command' object in JSON".to_string(),
        "name" => "Missing 'name' field in 'command' object".to_string(),
        other => format!("Missing '{other}' field"),
    }
}

/// 命令分发与执行过程中的错误
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Missing required argument '{field}' for command '{command}'")]
    MissingArgument { command: String, field: String },

    #[error("Invalid argument '{field}' for command '{command}': expected {expected}")]
    InvalidArgument {
        command: String,
        field: String,
        expected: &'static str,
    },

    #[error("Agent {0} not found")]
    AgentNotFound(u64),

    /// 外部协作者（LLM、搜索、抓取、文件、代码执行）失败
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },

    #[error("Unknown command {0}")]
    UnknownCommand(String),

    #[error("Command timed out: {0}")]
    Timeout(String),

    #[error("Command '{0}' panicked: {1}")]
    Panicked(String, String),

    #[error("Path escape attempt: {0}")]
    PathEscape(String),

    /// task_complete 之后不再接受任何命令
    #[error("Interpreter is shutting down")]
    ShutDown,

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl CommandError {
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator,
            message: message.into(),
        }
    }
}
