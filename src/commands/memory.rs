//! memory_add / memory_del / memory_ovr
//!
//! 越界键返回 NoResult（上报、不报错），存储保持不变。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::commands::{Args, Command, CommandOutput};
use crate::core::CommandError;
use crate::memory::MemoryStore;

/// 进程内共享的永久记忆
pub type SharedMemory = Arc<Mutex<MemoryStore>>;

pub struct MemoryAdd {
    store: SharedMemory,
}

impl MemoryAdd {
    pub fn new(store: SharedMemory) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for MemoryAdd {
    fn name(&self) -> &'static str {
        "memory_add"
    }

    fn description(&self) -> &'static str {
        "Memory Add"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["string"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let value = args.str("string")?;
        Ok(CommandOutput::Text(self.store.lock().await.append(value)))
    }
}

pub struct MemoryDel {
    store: SharedMemory,
}

impl MemoryDel {
    pub fn new(store: SharedMemory) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for MemoryDel {
    fn name(&self) -> &'static str {
        "memory_del"
    }

    fn description(&self) -> &'static str {
        "Memory Delete"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["key"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let key = args.int("key")?;
        Ok(self.store.lock().await.delete(key).into())
    }
}

pub struct MemoryOvr {
    store: SharedMemory,
}

impl MemoryOvr {
    pub fn new(store: SharedMemory) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for MemoryOvr {
    fn name(&self) -> &'static str {
        "memory_ovr"
    }

    fn description(&self) -> &'static str {
        "Memory Overwrite"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["key", "string"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let key = args.int("key")?;
        let value = args.str("string")?;
        Ok(self.store.lock().await.overwrite(key, value).into())
    }
}
