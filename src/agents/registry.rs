//! 子 Agent 注册表
//!
//! 键从 0 单调递增、永不复用：删除后旧键只会得到 AgentNotFound，不会误指向新 Agent。
//! 每个 Agent 的对话状态（消息列表）由注册表独占，send 成功一次就追加 user + assistant 两条。

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::CommandError;
use crate::llm::LlmClient;
use crate::memory::Message;

/// 子 Agent 键
pub type AgentKey = u64;

/// 第一个分配出去的键
pub const BASE_KEY: AgentKey = 0;

/// 单个子 Agent 的记录
#[derive(Debug, Clone)]
pub struct AgentRecord {
    pub task: String,
    /// 子 Agent 使用的模型名（对本层不透明）
    pub model: String,
    pub messages: Vec<Message>,
}

/// 子 Agent 注册表：按键保存对话状态，通过 LlmClient 推进对话
pub struct AgentRegistry {
    llm: Arc<dyn LlmClient>,
    agents: BTreeMap<AgentKey, AgentRecord>,
    next_key: AgentKey,
}

impl AgentRegistry {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            agents: BTreeMap::new(),
            next_key: BASE_KEY,
        }
    }

    /// 创建子 Agent：以 first_message 开启对话，返回 (键, 首次回复)
    ///
    /// 预言机调用失败时不分配键，注册表保持不变。
    pub async fn create(
        &mut self,
        task: &str,
        first_message: &str,
        model: &str,
    ) -> Result<(AgentKey, String), CommandError> {
        let mut messages = vec![Message::user(first_message)];
        let reply = self
            .llm
            .complete(model, &messages)
            .await
            .map_err(|e| CommandError::collaborator("conversation oracle", e))?;
        messages.push(Message::assistant(reply.clone()));

        let key = self.next_key;
        self.next_key += 1;
        self.agents.insert(
            key,
            AgentRecord {
                task: task.to_string(),
                model: model.to_string(),
                messages,
            },
        );
        tracing::info!(key, task = %task, model = %model, "agent created");
        Ok((key, reply))
    }

    /// 向子 Agent 发送消息并返回回复
    ///
    /// 请求基于对话副本构造，只有拿到回复后才提交 user + assistant 两条；
    /// 失败或 future 被超时丢弃时，对话状态保持不变。
    pub async fn send(&mut self, key: AgentKey, message: &str) -> Result<String, CommandError> {
        let record = self
            .agents
            .get_mut(&key)
            .ok_or(CommandError::AgentNotFound(key))?;

        let user = Message::user(message);
        let mut request = record.messages.clone();
        request.push(user.clone());
        let reply = self
            .llm
            .complete(&record.model, &request)
            .await
            .map_err(|e| CommandError::collaborator("conversation oracle", e))?;

        record.messages.push(user);
        record.messages.push(Message::assistant(reply.clone()));
        tracing::info!(key, turns = record.messages.len() / 2, "agent responded");
        Ok(reply)
    }

    /// 列出存活的子 Agent：(键, 任务)，按键升序
    pub fn list(&self) -> Vec<(AgentKey, String)> {
        self.agents
            .iter()
            .map(|(key, record)| (*key, record.task.clone()))
            .collect()
    }

    /// 删除子 Agent；键不存在时返回 false
    pub fn delete(&mut self, key: AgentKey) -> bool {
        let removed = self.agents.remove(&key).is_some();
        if removed {
            tracing::info!(key, "agent deleted");
        } else {
            tracing::warn!(key, "delete requested for unknown agent");
        }
        removed
    }

    pub fn get(&self, key: AgentKey) -> Option<&AgentRecord> {
        self.agents.get(&key)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::memory::Role;
    use async_trait::async_trait;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(Arc::new(MockLlmClient))
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _model: &str, _messages: &[Message]) -> Result<String, String> {
            Err("rate limited".to_string())
        }

        fn default_model(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_keys_are_never_reused() {
        let mut agents = registry();
        let (k0, _) = agents.create("a", "hi", "m").await.unwrap();
        assert_eq!(k0, BASE_KEY);
        assert!(agents.delete(k0));

        let (k1, _) = agents.create("b", "hi", "m").await.unwrap();
        assert!(k1 > k0);
        let (k2, _) = agents.create("c", "hi", "m").await.unwrap();
        assert!(k2 > k1);
    }

    #[tokio::test]
    async fn test_list_and_delete_twice() {
        let mut agents = registry();
        let (key, _) = agents.create("summarize", "hi", "m").await.unwrap();
        agents.create("translate", "hi", "m").await.unwrap();

        assert_eq!(
            agents.list(),
            vec![(key, "summarize".to_string()), (key + 1, "translate".to_string())]
        );
        assert!(agents.delete(key));
        assert!(!agents.delete(key));
        assert_eq!(agents.list(), vec![(key + 1, "translate".to_string())]);
    }

    #[tokio::test]
    async fn test_send_accumulates_state() {
        let mut agents = registry();
        let (key, ack) = agents.create("t", "You are Bob.", "m").await.unwrap();
        assert_eq!(ack, "Echo from Mock (1 messages): You are Bob.");

        let first = agents.send(key, "go").await.unwrap();
        assert_eq!(first, "Echo from Mock (3 messages): go");
        let second = agents.send(key, "again").await.unwrap();
        assert_eq!(second, "Echo from Mock (5 messages): again");
        assert_eq!(agents.get(key).unwrap().messages.len(), 6);
    }

    #[tokio::test]
    async fn test_send_to_missing_or_deleted_agent() {
        let mut agents = registry();
        assert!(matches!(
            agents.send(7, "hello").await,
            Err(CommandError::AgentNotFound(7))
        ));

        let (key, _) = agents.create("t", "hi", "m").await.unwrap();
        agents.delete(key);
        assert!(matches!(
            agents.send(key, "hello").await,
            Err(CommandError::AgentNotFound(k)) if k == key
        ));
    }

    /// "slow" 消息永远等不到回复
    struct SlowLlm;

    #[async_trait]
    impl LlmClient for SlowLlm {
        async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, String> {
            if messages.last().map(|m| m.content.as_str()) == Some("slow") {
                std::future::pending::<()>().await;
            }
            MockLlmClient.complete(model, messages).await
        }

        fn default_model(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_timed_out_send_leaves_conversation_unchanged() {
        let mut agents = AgentRegistry::new(Arc::new(SlowLlm));
        let (key, _) = agents.create("t", "hi", "m").await.unwrap();
        assert_eq!(agents.get(key).unwrap().messages.len(), 2);

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(100), agents.send(key, "slow"))
                .await;
        assert!(timed_out.is_err());
        assert_eq!(agents.get(key).unwrap().messages.len(), 2);

        let reply = agents.send(key, "go").await.unwrap();
        assert_eq!(reply, "Echo from Mock (3 messages): go");
        let roles: Vec<Role> = agents.get(key).unwrap().messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_conversation_unchanged() {
        let mut agents = registry();
        let (key, _) = agents.create("t", "hi", "m").await.unwrap();
        agents.llm = Arc::new(FailingLlm);
        assert!(matches!(
            agents.send(key, "go").await,
            Err(CommandError::Collaborator { .. })
        ));
        assert_eq!(agents.get(key).unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_oracle_failure_allocates_no_key() {
        let mut agents = AgentRegistry::new(Arc::new(FailingLlm));
        let err = agents.create("t", "hi", "m").await.unwrap_err();
        assert!(matches!(err, CommandError::Collaborator { .. }));
        assert!(agents.is_empty());
    }
}
