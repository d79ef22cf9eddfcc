use utoipa::openapi::server::{ServerBuilder, ServerVariableBuilder};
use utoipa::{Modify, OpenApi};

/// 为 Swagger UI 提供正确的“业务接口前缀”Servers 配置。
///
/// - 徽章接口默认前缀为 `/api`（对应 `config.api.prefix` / `APP_API__PREFIX`）。
/// - `/health` 不带前缀，因此额外提供 `/` 作为备用 server。
struct ApiServers;

impl Modify for ApiServers {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let api = ServerBuilder::new()
            .url("{api_prefix}")
            .description(Some("徽章接口（默认 /api）"))
            .parameter(
                "api_prefix",
                ServerVariableBuilder::new()
                    .default_value("/api")
                    .description(Some("接口前缀：对应 config.api.prefix")),
            )
            .build();

        let root = ServerBuilder::new()
            .url("/")
            .description(Some("根路径（用于 /health）"))
            .build();

        openapi.servers = Some(vec![api, root]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::app::health_check,
        crate::features::badge::handler::get_badge,
    ),
    modifiers(&ApiServers),
    tags(
        (name = "Badge", description = "资料统计徽章：仓库数、星标总数、关注者数（SVG）。"),
        (name = "Health", description = "健康检查：服务探活。"),
    ),
    info(
        title = "Profile Badge API",
        version = env!("CARGO_PKG_VERSION"),
        description = "按用户名动态生成 SVG 资料徽章。徽章接口实际挂载在 `config.api.prefix`（默认 /api）下，OpenAPI 的 paths 不包含该前缀。"
    )
)]
pub struct ApiDoc;
