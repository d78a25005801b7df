//! Python 文件执行：只允许工作区内已存在的 .py 文件，带超时与 tracing 审计

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::CommandError;
use crate::files::SafeFs;

#[async_trait]
pub trait PythonRunner: Send + Sync {
    async fn execute_file(&self, file: &str) -> Result<String, CommandError>;
}

/// 本地解释器执行，工作目录为工作区根
pub struct LocalPython {
    fs: SafeFs,
    interpreter: String,
    timeout: Duration,
}

impl LocalPython {
    pub fn new(fs: SafeFs, interpreter: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            fs,
            interpreter: interpreter.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn script_path(&self, file: &str) -> Result<PathBuf, CommandError> {
        if !file.trim().ends_with(".py") {
            return Err(CommandError::InvalidArgument {
                command: "execute_python_file".to_string(),
                field: "file".to_string(),
                expected: "a .py file",
            });
        }
        let path = self.fs.resolve(file)?;
        if !path.is_file() {
            return Err(CommandError::collaborator(
                "python",
                format!("File '{}' does not exist.", file.trim()),
            ));
        }
        Ok(path)
    }
}

#[async_trait]
impl PythonRunner for LocalPython {
    async fn execute_file(&self, file: &str) -> Result<String, CommandError> {
        let path = self.script_path(file)?;
        tracing::info!(file = %file, interpreter = %self.interpreter, "execute python file");

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&path).current_dir(self.fs.root()).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                CommandError::collaborator(
                    "python",
                    format!("Execution timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|e| CommandError::collaborator("python", format!("Execution failed: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Ok(if stderr.trim().is_empty() {
            stdout
        } else {
            format!("{}\nstderr: {}", stdout.trim_end(), stderr.trim())
        })
    }
}
