use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use crate::config::UpstreamConfig;

/// 构建访问上游资料 API 的 HTTP Client（统一连接池/Keep-Alive），由应用状态持有并在请求间复用。
///
/// 说明：
/// - 上游无响应时不能无限挂起，这里统一设置 `timeout`；
/// - GitHub API 要求携带 User-Agent，并推荐显式声明 `Accept`；
/// - 配置了令牌时以 Bearer 方式附带，提升限流额度。
pub fn build_upstream_client(cfg: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    if let Some(token) = cfg.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut v) => {
                v.set_sensitive(true);
                headers.insert(AUTHORIZATION, v);
            }
            Err(_) => tracing::warn!("upstream.token 含非法字符，已忽略"),
        }
    }

    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .default_headers(headers)
        .timeout(cfg.timeout_duration())
        .build()
}
