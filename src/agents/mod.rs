//! 子 Agent：注册表与对话状态

pub mod registry;

pub use registry::{AgentKey, AgentRecord, AgentRegistry, BASE_KEY};
