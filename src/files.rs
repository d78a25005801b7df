//! 沙箱文件存储
//!
//! SafeFs 绑定工作区根目录，所有路径先做词法校验（禁止绝对路径与 ../ 逃逸），
//! 目标已存在时再用 canonicalize 校验（防止符号链接逃逸）。

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::core::CommandError;

/// 文件存储协作者
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn read(&self, path: &str) -> Result<String, CommandError>;
    async fn write(&self, path: &str, text: &str) -> Result<(), CommandError>;
    async fn append(&self, path: &str, text: &str) -> Result<(), CommandError>;
    async fn delete(&self, path: &str) -> Result<(), CommandError>;
}

/// 沙箱文件系统：绑定根目录，resolve 校验路径在根下
#[derive(Debug, Clone)]
pub struct SafeFs {
    root_dir: PathBuf,
}

fn io_error(op: &str, e: std::io::Error) -> CommandError {
    CommandError::collaborator("file store", format!("{op} failed: {e}"))
}

impl SafeFs {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        let root = root_dir.as_ref().to_path_buf();
        let root_dir = root.canonicalize().unwrap_or(root);
        Self { root_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// 将相对路径解析到根目录下；逃逸返回 PathEscape
    pub fn resolve(&self, path: &str) -> Result<PathBuf, CommandError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(CommandError::PathEscape("(empty path)".to_string()));
        }

        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(CommandError::PathEscape(trimmed.to_string())); // 如 ../../etc/passwd
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(CommandError::PathEscape(trimmed.to_string()));
                }
            }
        }
        if parts.is_empty() {
            return Err(CommandError::PathEscape(trimmed.to_string()));
        }

        let full: PathBuf = parts.iter().fold(self.root_dir.clone(), |acc, p| acc.join(p));
        if let Ok(canonical) = full.canonicalize() {
            let root_canon = self
                .root_dir
                .canonicalize()
                .unwrap_or_else(|_| self.root_dir.clone());
            if !canonical.starts_with(root_canon) {
                return Err(CommandError::PathEscape(trimmed.to_string()));
            }
        }
        Ok(full)
    }

    async fn ensure_parent(&self, full: &Path) -> Result<(), CommandError> {
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("Create directory", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for SafeFs {
    async fn read(&self, path: &str) -> Result<String, CommandError> {
        let full = self.resolve(path)?;
        tracing::info!(path = %path, "read file");
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| io_error("Read", e))
    }

    async fn write(&self, path: &str, text: &str) -> Result<(), CommandError> {
        let full = self.resolve(path)?;
        self.ensure_parent(&full).await?;
        tracing::info!(path = %path, bytes = text.len(), "write file");
        tokio::fs::write(&full, text)
            .await
            .map_err(|e| io_error("Write", e))
    }

    async fn append(&self, path: &str, text: &str) -> Result<(), CommandError> {
        use tokio::io::AsyncWriteExt;

        let full = self.resolve(path)?;
        self.ensure_parent(&full).await?;
        tracing::info!(path = %path, bytes = text.len(), "append file");
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .await
            .map_err(|e| io_error("Open", e))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| io_error("Append", e))?;
        file.flush().await.map_err(|e| io_error("Append", e))
    }

    async fn delete(&self, path: &str) -> Result<(), CommandError> {
        let full = self.resolve(path)?;
        tracing::info!(path = %path, "delete file");
        tokio::fs::remove_file(&full)
            .await
            .map_err(|e| io_error("Delete", e))
    }
}
