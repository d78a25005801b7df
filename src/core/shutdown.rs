//! 关闭信号
//!
//! task_complete、Ctrl+C 与 SIGTERM 共用同一个 ShutdownManager。
//! Router 在关闭后拒绝后续命令，宿主循环在 token 取消时停止读取。

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// 驱动 Agent 发出 task_complete
    TaskComplete,
    /// Ctrl+C
    UserInitiated,
    /// SIGTERM
    Signal,
}

#[derive(Debug, Default)]
pub struct ShutdownManager {
    token: CancellationToken,
    reason: OnceLock<ShutdownReason>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// 只记录第一次的原因
    pub fn shutdown(&self, reason: ShutdownReason) {
        if self.reason.set(reason).is_ok() {
            tracing::info!(?reason, "shutdown requested");
        }
        self.token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.get().copied()
    }

    /// 安装 Ctrl+C / SIGTERM 处理器；关闭后任务随 token 退出
    pub fn install_signal_handlers(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let token = manager.token();
            tokio::select! {
                _ = token.cancelled() => {}
                Ok(()) = tokio::signal::ctrl_c() => {
                    manager.shutdown(ShutdownReason::UserInitiated);
                }
                _ = terminate() => {
                    manager.shutdown(ShutdownReason::Signal);
                }
            }
        });
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
