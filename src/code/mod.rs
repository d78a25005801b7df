//! 代码工具协作者：AI 代码助手与 Python 执行

pub mod ai;
pub mod python;

pub use ai::{AiCodeTools, CodeAssistant};
pub use python::{LocalPython, PythonRunner};
