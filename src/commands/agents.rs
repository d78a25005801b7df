//! start_agent / message_agent / list_agents / delete_agent
//!
//! 所有子 Agent 状态都在 AgentRegistry 中，这里只负责取参、拼结果文本与朗读。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::agents::{AgentKey, AgentRegistry};
use crate::commands::{Args, Command, CommandOutput};
use crate::core::CommandError;
use crate::voice::VoiceNotifier;

pub type SharedAgents = Arc<Mutex<AgentRegistry>>;

/// 四条 Agent 命令共享的上下文
#[derive(Clone)]
pub struct AgentCommands {
    registry: SharedAgents,
    voice: Arc<dyn VoiceNotifier>,
    /// 新建子 Agent 使用的模型
    model: String,
}

impl AgentCommands {
    pub fn new(registry: SharedAgents, voice: Arc<dyn VoiceNotifier>, model: impl Into<String>) -> Self {
        Self {
            registry,
            voice,
            model: model.into(),
        }
    }

    async fn message(&self, key: AgentKey, message: &str) -> Result<String, CommandError> {
        let reply = self.registry.lock().await.send(key, message).await?;
        self.voice.say(&reply);
        Ok(format!("Agent {key} responded: {reply}"))
    }
}

fn agent_key(args: &Args) -> Result<AgentKey, CommandError> {
    let key = args.int("key")?;
    AgentKey::try_from(key).map_err(|_| CommandError::InvalidArgument {
        command: args.command().to_string(),
        field: "key".to_string(),
        expected: "a non-negative integer",
    })
}

pub struct StartAgent(pub AgentCommands);

#[async_trait]
impl Command for StartAgent {
    fn name(&self) -> &'static str {
        "start_agent"
    }

    fn description(&self) -> &'static str {
        "Start GPT Agent"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["name", "task", "prompt"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let name = args.str("name")?;
        let task = args.str("task")?;
        let prompt = args.str("prompt")?;
        let ctx = &self.0;

        let voice_name = name.replace('_', " ");
        let first_message = format!("You are {name}.  Respond with: \"Acknowledged\".");

        ctx.voice.say(&format!("{voice_name} here, Reporting for duty!"));
        let (key, _ack) = ctx
            .registry
            .lock()
            .await
            .create(task, &first_message, &ctx.model)
            .await?;
        ctx.voice
            .say(&format!("Hello {voice_name}. Your task is as follows. {task}."));

        let response = ctx.message(key, prompt).await?;
        Ok(CommandOutput::Text(format!(
            "Agent {name} created with key {key}. First response: {response}"
        )))
    }
}

pub struct MessageAgent(pub AgentCommands);

#[async_trait]
impl Command for MessageAgent {
    fn name(&self) -> &'static str {
        "message_agent"
    }

    fn description(&self) -> &'static str {
        "Message GPT Agent"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["key", "message"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let key = agent_key(args)?;
        let message = args.str("message")?;
        Ok(CommandOutput::Text(self.0.message(key, message).await?))
    }
}

pub struct ListAgents(pub AgentCommands);

/// 形如 [(0, 'summarize'), (1, 'translate')]
pub fn format_agent_list(agents: &[(AgentKey, String)]) -> String {
    let items: Vec<String> = agents
        .iter()
        .map(|(key, task)| format!("({key}, '{task}')"))
        .collect();
    format!("[{}]", items.join(", "))
}

#[async_trait]
impl Command for ListAgents {
    fn name(&self) -> &'static str {
        "list_agents"
    }

    fn description(&self) -> &'static str {
        "List GPT Agents"
    }

    async fn execute(&self, _args: &Args) -> Result<CommandOutput, CommandError> {
        let agents = self.0.registry.lock().await.list();
        Ok(CommandOutput::Text(format_agent_list(&agents)))
    }
}

pub struct DeleteAgent(pub AgentCommands);

#[async_trait]
impl Command for DeleteAgent {
    fn name(&self) -> &'static str {
        "delete_agent"
    }

    fn description(&self) -> &'static str {
        "Delete GPT Agent"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["key"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let raw = args.int("key")?;
        // 负数键不可能存在，按“不存在”上报
        let deleted = match AgentKey::try_from(raw) {
            Ok(key) => self.0.registry.lock().await.delete(key),
            Err(_) => false,
        };
        Ok(CommandOutput::Text(if deleted {
            format!("Agent {raw} deleted.")
        } else {
            format!("Agent {raw} does not exist.")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_agent_list() {
        assert_eq!(format_agent_list(&[]), "[]");
        assert_eq!(
            format_agent_list(&[(0, "summarize".into()), (3, "translate".into())]),
            "[(0, 'summarize'), (3, 'translate')]"
        );
    }
}
