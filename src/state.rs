use axum::http::HeaderValue;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::features::badge::BadgeService;

/// 聚合的应用共享状态（只读，请求之间不共享可变数据）
#[derive(Clone)]
pub struct AppState {
    pub badge: Arc<BadgeService>,
    /// 成功徽章响应的 `Cache-Control`
    pub cache_control: HeaderValue,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let cache_control = HeaderValue::from_str(&cfg.badge.cache_control())
            .map_err(|e| AppError::Internal(format!("Cache-Control 取值无效: {e}")))?;
        Ok(Self {
            badge: Arc::new(BadgeService::from_config(cfg)?),
            cache_control,
        })
    }
}
