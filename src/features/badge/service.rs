use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::error::AppError;

use super::assets::ThemeAssets;
use super::border::resolve_border;
use super::client::ProfileClient;
use super::options::RenderOptions;
use super::renderer::{Footer, render_badge_svg, render_error_svg, render_placeholder_svg};

/// 一次徽章请求的渲染结果，三种情况都携带合法 SVG
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeOutcome {
    /// 未提供用户名
    Placeholder(&'static str),
    /// 成功渲染
    Rendered(String),
    /// 拉取失败后的错误徽章
    Failed(String),
}

impl BadgeOutcome {
    pub fn svg(&self) -> &str {
        match self {
            BadgeOutcome::Placeholder(s) => s,
            BadgeOutcome::Rendered(s) | BadgeOutcome::Failed(s) => s,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, BadgeOutcome::Rendered(_))
    }

    pub fn into_svg(self) -> String {
        match self {
            BadgeOutcome::Placeholder(s) => s.to_string(),
            BadgeOutcome::Rendered(s) | BadgeOutcome::Failed(s) => s,
        }
    }
}

/// 徽章渲染流水线：参数 -> 主题/描边 -> 拉取资料 -> 格式化 -> 组装 SVG。
#[derive(Debug, Clone)]
pub struct BadgeService {
    client: ProfileClient,
    assets: ThemeAssets,
    footer_text: String,
}

impl BadgeService {
    pub fn new(client: ProfileClient, assets: ThemeAssets, footer_text: String) -> Self {
        Self {
            client,
            assets,
            footer_text,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            ProfileClient::from_config(&cfg.upstream)?,
            ThemeAssets::from_config(cfg),
            cfg.badge.footer_text.clone(),
        ))
    }

    /// 渲染徽章。`today` 由调用方传入，便于在固定时钟下得到逐字节一致的输出。
    ///
    /// 参数解析之后的任何失败都会短路到错误徽章，本函数本身不会失败。
    pub async fn render(&self, opts: &RenderOptions, today: NaiveDate) -> BadgeOutcome {
        let Some(username) = opts.username.as_deref() else {
            return BadgeOutcome::Placeholder(render_placeholder_svg());
        };

        let theme = self.assets.resolve(&opts.theme).await;
        let border = resolve_border(&opts.border, &theme);
        tracing::debug!(
            kind = ?theme.kind(),
            border = border.is_enabled(),
            "主题与描边解析完成"
        );
        let footer = Footer {
            text: &self.footer_text,
            date: today,
        };

        match self.client.fetch(username).await {
            Ok(stats) => {
                BadgeOutcome::Rendered(render_badge_svg(&stats, &theme, &border, opts, &footer))
            }
            Err(e) => {
                // 用户不存在不记为告警
                if e.is_upstream_unavailable() {
                    tracing::warn!(username, code = e.code(), "徽章数据获取失败: {}", e);
                } else {
                    tracing::info!(username, code = e.code(), "徽章数据获取失败: {}", e);
                }
                BadgeOutcome::Failed(render_error_svg(&e, &border, &footer))
            }
        }
    }
}
