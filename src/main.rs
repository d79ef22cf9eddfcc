use profile_badge::{AppConfig, AppState, build_router, logging, shutdown};

#[tokio::main]
async fn main() {
    // 先加载配置，再按配置初始化日志
    let config_result = AppConfig::init_global();
    let log_cfg = match &config_result {
        Ok(()) => AppConfig::global().logging.clone(),
        Err(_) => Default::default(),
    };
    logging::init_tracing(&log_cfg);
    if let Err(e) = config_result {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    let state = match AppState::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("App state init failed: {}", e);
            std::process::exit(1);
        }
    };

    let public_dir = config.public_dir();
    if !public_dir.is_dir() {
        tracing::warn!(
            "公开资源目录 {:?} 不存在，图片主题将直接使用外链 {}",
            public_dir,
            config.public_base_url()
        );
    }

    let app = build_router(config, state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("Badge API: http://{}{}/badge.svg", addr, config.api.prefix);
    tracing::info!("Upstream: {}", config.upstream.api_base_url);

    let shutdown_timeout = config.shutdown.timeout_duration();
    let (drained_tx, drained_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown_signal = async move {
        match shutdown::wait_for_signal().await {
            Ok(reason) => tracing::info!("接收到退出信号: {:?}，开始优雅退出...", reason),
            Err(e) => tracing::error!("信号处理器启动失败: {}，立即退出", e),
        }
        // 超过优雅退出时限仍有未完成请求时强制退出
        tokio::spawn(async move {
            if tokio::time::timeout(shutdown_timeout, drained_rx).await.is_err() {
                tracing::warn!("优雅退出超时，强制退出");
                std::process::exit(1);
            }
        });
    };

    let graceful = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }
    let _ = drained_tx.send(());

    tracing::info!("服务器已优雅关闭");
}
