//! 核心：错误类型与关闭信号

pub mod error;
pub mod shutdown;

pub use error::{CommandError, DecodeError};
pub use shutdown::{ShutdownManager, ShutdownReason};
