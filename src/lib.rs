//! Conductor - LLM Agent 与能力之间的命令解释器
//!
//! 模块划分：
//! - **commands**: 信封解析、命令表、路由与各命令实现
//! - **agents**: 子 Agent 注册表（单调递增键、累积对话）
//! - **memory**: 永久记忆（按位置寻址）与对话消息
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock）
//! - **web**: 搜索、页面抓取、摘要
//! - **files**: 沙箱文件存储
//! - **code**: AI 代码助手与 Python 执行
//! - **voice**: 朗读通知
//! - **core**: 错误类型与关闭信号
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **interpreter** / **host**: 装配与宿主循环

pub mod agents;
pub mod code;
pub mod commands;
pub mod config;
pub mod core;
pub mod files;
pub mod host;
pub mod interpreter;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod voice;
pub mod web;

pub use commands::{CommandOutput, Router};
pub use interpreter::{Collaborators, Interpreter};
