/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 路由装配
pub mod app;

/// OpenAPI 文档
pub mod openapi;

/// 优雅退出信号
pub mod shutdown;

/// 上游 HTTP Client 构建
pub mod http;

/// 日志初始化
pub mod logging;

// 导出常用类型供外部使用
pub use app::build_router;
pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;
