use thiserror::Error;

/// 应用统一错误类型
///
/// Display 文本会被原样绘制进错误徽章，因此保持简短、面向读者。
#[derive(Error, Debug)]
pub enum AppError {
    /// 上游资料查询返回非成功状态
    #[error("User \"{username}\" not found")]
    ProfileNotFound { username: String },

    /// 网络请求错误（连接失败、非预期状态码等）
    #[error("Network error: {0}")]
    Network(String),

    /// 上游请求超时（包含 connect/read 等阶段）
    #[error("Upstream timeout: {0}")]
    Timeout(String),

    /// 上游返回的 JSON 无法解析
    #[error("Invalid upstream data: {0}")]
    Json(String),

    /// 本地背景图读取/压缩失败（仅在主题解析内部出现，会被降级策略吞掉）
    #[error("Image asset error: {0}")]
    ImageAsset(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 稳定的错误码，用于日志检索。
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            AppError::Network(_) => "UPSTREAM_ERROR",
            AppError::Timeout(_) => "UPSTREAM_TIMEOUT",
            AppError::Json(_) => "UPSTREAM_INVALID_DATA",
            AppError::ImageAsset(_) => "IMAGE_ASSET_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否属于上游不可用类错误（网络/超时/数据畸形）。
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::Timeout(_) | AppError::Json(_)
        )
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::Json(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageAsset(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ImageAsset(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use std::time::Duration;

    async fn start_hanging_http_server() -> std::net::SocketAddr {
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind tcp listener");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            loop {
                let (socket, _) = match listener.accept().await {
                    Ok(v) => v,
                    Err(_) => break,
                };
                tokio::spawn(async move {
                    // 不返回任何 HTTP 响应，触发客户端 read timeout。
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    drop(socket);
                });
            }
        });

        addr
    }

    #[tokio::test]
    async fn app_error_from_reqwest_timeout_is_timeout() {
        let addr = start_hanging_http_server().await;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("build reqwest client");

        let err = client
            .get(format!("http://{addr}/"))
            .send()
            .await
            .expect_err("expected timeout");
        assert!(err.is_timeout(), "expected reqwest timeout, got: {err}");

        let app: AppError = err.into();
        assert!(
            matches!(app, AppError::Timeout(_)),
            "expected AppError::Timeout, got: {app:?}"
        );
        assert!(app.is_upstream_unavailable());
        assert_eq!(app.code(), "UPSTREAM_TIMEOUT");
    }

    #[test]
    fn profile_not_found_message_embeds_username() {
        let err = AppError::ProfileNotFound {
            username: "ghost-user".to_string(),
        };
        assert_eq!(err.to_string(), "User \"ghost-user\" not found");
        assert!(!err.is_upstream_unavailable());
    }
}
