//! 优雅退出信号
//!
//! Linux/macOS 监听 SIGINT、SIGTERM；Windows 监听 Ctrl+C。

use tracing::info;

/// 退出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// 用户中断信号 (Ctrl+C)
    Interrupt,
    /// 终止信号 (SIGTERM)
    Terminate,
}

/// 优雅退出错误类型
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("信号设置失败: {0}")]
    SignalSetup(String),
}

/// 等待第一个退出信号
#[cfg(unix)]
pub async fn wait_for_signal() -> Result<ShutdownReason, ShutdownError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;
    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;

    let reason = tokio::select! {
        _ = sigint.recv() => {
            info!("接收到SIGINT信号 (Ctrl+C)");
            ShutdownReason::Interrupt
        }
        _ = sigterm.recv() => {
            info!("接收到SIGTERM信号");
            ShutdownReason::Terminate
        }
    };
    Ok(reason)
}

/// 等待第一个退出信号
#[cfg(not(unix))]
pub async fn wait_for_signal() -> Result<ShutdownReason, ShutdownError> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;
    info!("接收到Ctrl+C信号");
    Ok(ShutdownReason::Interrupt)
}
