//! 命令表
//!
//! 命令集合是封闭的：BUILTIN_COMMANDS 列出全部命令名，verify 在启动时检查注册是否完整。

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::Command;
use crate::core::CommandError;

/// 全部内置命令名
pub const BUILTIN_COMMANDS: &[&str] = &[
    "google",
    "wikidata",
    "memory_add",
    "memory_del",
    "memory_ovr",
    "start_agent",
    "message_agent",
    "list_agents",
    "delete_agent",
    "get_text_summary",
    "get_hyperlinks",
    "browse_website",
    "read_file",
    "write_to_file",
    "append_to_file",
    "delete_file",
    "evaluate_code",
    "improve_code",
    "write_tests",
    "execute_python_file",
    "task_complete",
];

/// 命令表：按名称存储 Arc<dyn Command>
#[derive(Default)]
pub struct CommandTable {
    commands: HashMap<&'static str, Arc<dyn Command>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: impl Command + 'static) {
        let name = command.name();
        if self.commands.insert(name, Arc::new(command)).is_some() {
            tracing::warn!(command = %name, "command registered twice, keeping the latest");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// 已注册命令名（排序后）
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 检查命令表与 BUILTIN_COMMANDS 完全一致
    pub fn verify(&self) -> Result<(), CommandError> {
        let missing: Vec<_> = BUILTIN_COMMANDS
            .iter()
            .filter(|name| !self.commands.contains_key(**name))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(CommandError::ConfigError(format!(
                "commands without a handler: {}",
                missing.join(", ")
            )));
        }
        let unknown: Vec<_> = self
            .names()
            .into_iter()
            .filter(|name| !BUILTIN_COMMANDS.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(CommandError::ConfigError(format!(
                "handlers for unknown commands: {}",
                unknown.join(", ")
            )));
        }
        Ok(())
    }

    /// 生成 prompt 中的 Commands 段落：按 BUILTIN_COMMANDS 顺序编号，列出参数
    pub fn to_prompt_section(&self) -> String {
        let mut s = String::from("Commands:\n");
        let mut index = 1;
        for name in BUILTIN_COMMANDS {
            let Some(command) = self.commands.get(name) else {
                continue;
            };
            let args = command
                .required_args()
                .iter()
                .map(|a| format!("\"{a}\": \"<{a}>\""))
                .collect::<Vec<_>>()
                .join(", ");
            s.push_str(&format!(
                "{index}. {}: \"{name}\", args: {args}\n",
                command.description()
            ));
            index += 1;
        }
        s
    }
}
