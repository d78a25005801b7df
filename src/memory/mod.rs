//! 记忆层：永久记忆（按位置寻址）与对话消息类型

pub mod conversation;
pub mod store;

pub use conversation::{Message, Role};
pub use store::MemoryStore;
