use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use crate::state::AppState;

use super::options::{BadgeQuery, RenderOptions};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

#[utoipa::path(
    get,
    path = "/badge.svg",
    summary = "生成资料统计徽章",
    description = "按用户名拉取公开资料，汇总仓库数、星标总数与关注者数并渲染为 SVG。未提供用户名时返回占位图；拉取失败时返回带错误信息的 SVG（状态码仍为 200）。",
    params(BadgeQuery),
    responses(
        (status = 200, description = "SVG 徽章（成功时附带 Cache-Control）", body = String, content_type = "image/svg+xml")
    ),
    tag = "Badge"
)]
pub async fn get_badge(
    State(state): State<AppState>,
    query: Result<Query<BadgeQuery>, QueryRejection>,
) -> impl IntoResponse {
    let t_total = Instant::now();
    // 参数解析阶段不允许失败：无法反序列化的 query 视为空参数
    let q = match query {
        Ok(Query(q)) => q,
        Err(e) => {
            tracing::debug!("徽章参数解析失败，按空参数处理: {}", e);
            BadgeQuery::default()
        }
    };
    let opts = RenderOptions::from_query(&q);
    tracing::debug!(
        username = opts.username.as_deref().unwrap_or(""),
        theme = ?opts.theme,
        "收到徽章请求"
    );

    let outcome = state.badge.render(&opts, Utc::now().date_naive()).await;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(SVG_CONTENT_TYPE));
    if outcome.is_rendered() {
        headers.insert(header::CACHE_CONTROL, state.cache_control.clone());
    }

    tracing::info!(
        target: "badge_performance",
        rendered = outcome.is_rendered(),
        "徽章请求完成，总耗时: {}ms",
        t_total.elapsed().as_millis()
    );
    (StatusCode::OK, headers, outcome.into_svg())
}

pub fn create_badge_router() -> Router<AppState> {
    Router::new().route("/badge.svg", get(get_badge))
}
