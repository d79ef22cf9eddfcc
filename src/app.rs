use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{Json, Response};
use axum::{Router, routing::get};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::features::badge::create_badge_router;
use crate::openapi::ApiDoc;
use crate::state::AppState;

fn compression_predicate() -> impl tower_http::compression::predicate::Predicate {
    use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};

    // SVG 徽章是文本，压缩收益明显；位图背景等静态资源本身已压缩，跳过。
    SizeAbove::default()
        .and(NotForContentType::GRPC)
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE)
        .and(NotForContentType::const_new("application/octet-stream"))
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "健康检查",
    description = "用于探活的健康检查端点，返回服务状态与版本信息。",
    responses((status = 200, description = "服务健康", body = serde_json::Value)),
    tag = "Health"
)]
pub async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// 为公开静态资源（`public/` 下的背景图等）添加缓存头，外链背景图会被徽章反复引用。
async fn static_cache_control_middleware(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    if res.status().is_success() && res.headers().get(header::CACHE_CONTROL).is_none() {
        res.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        );
    }
    res
}

/// 组装完整路由：徽章接口、健康检查、接口文档；未匹配的路径回落到公开静态资源。
pub fn build_router(cfg: &AppConfig, state: AppState) -> Router {
    let static_files = Router::new()
        .fallback_service(ServeDir::new(cfg.public_dir()))
        .layer(axum::middleware::from_fn(static_cache_control_middleware));

    let prefix = format!("/{}", cfg.api.prefix.trim().trim_matches('/'));
    let mut router = Router::<AppState>::new().route("/health", get(health_check));
    // axum 不支持在根路径 nest，前缀为空时直接 merge
    router = if prefix == "/" {
        router.merge(create_badge_router())
    } else {
        router.nest(&prefix, create_badge_router())
    };

    router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .fallback_service(static_files)
        .layer(CompressionLayer::new().compress_when(compression_predicate()))
}

#[cfg(test)]
mod compression_predicate_tests {
    use super::compression_predicate;
    use axum::body::Body;
    use axum::http::{Response as HttpResponse, header};
    use tower_http::compression::predicate::Predicate;

    fn should_compress_for(ct: &str) -> bool {
        // 命中 SizeAbove（默认 32B），避免因为 body 太小导致测试不稳定。
        let body_bytes = vec![b'x'; 2048];
        let resp = HttpResponse::builder()
            .header(header::CONTENT_TYPE, ct)
            .body(Body::from(body_bytes))
            .unwrap();
        compression_predicate().should_compress(&resp)
    }

    #[test]
    fn compression_predicate_disables_raster_images_but_allows_svg() {
        assert!(!should_compress_for("image/png"));
        assert!(!should_compress_for("image/jpeg"));
        assert!(should_compress_for("image/svg+xml; charset=utf-8"));
    }

    #[test]
    fn compression_predicate_disables_binary_downloads() {
        assert!(!should_compress_for("application/octet-stream"));
    }
}
