use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀（徽章位于 `{prefix}/badge.svg`）
    pub prefix: String,
}

/// 上游资料 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 资料 API 基地址（不带结尾 `/`）
    #[serde(default = "UpstreamConfig::default_api_base_url")]
    pub api_base_url: String,
    /// 请求时携带的 User-Agent（GitHub API 要求必须提供）
    #[serde(default = "UpstreamConfig::default_user_agent")]
    pub user_agent: String,
    /// 单次上游请求超时（秒）
    #[serde(default = "UpstreamConfig::default_timeout")]
    pub timeout_secs: u64,
    /// 可选访问令牌（提升匿名限流额度）
    #[serde(default)]
    pub token: Option<String>,
    /// 仓库列表单页条数（仅请求第一页）
    #[serde(default = "UpstreamConfig::default_per_page")]
    pub per_page: u32,
}

impl UpstreamConfig {
    fn default_api_base_url() -> String {
        "https://api.github.com".to_string()
    }
    fn default_user_agent() -> String {
        format!("profile-badge/{}", env!("CARGO_PKG_VERSION"))
    }
    fn default_timeout() -> u64 {
        5
    }
    fn default_per_page() -> u32 {
        100
    }

    /// 获取上游请求超时时间
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            user_agent: Self::default_user_agent(),
            timeout_secs: Self::default_timeout(),
            token: None,
            per_page: Self::default_per_page(),
        }
    }
}

/// 静态资源配置（图片主题背景）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// 本地公开资源根目录
    #[serde(default = "AssetsConfig::default_public_dir")]
    pub public_dir: String,
    /// 对外可访问的基地址，用于图片主题的外链回退（留空则按部署环境推断）
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl AssetsConfig {
    fn default_public_dir() -> String {
        "./public".to_string()
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: Self::default_public_dir(),
            public_base_url: None,
        }
    }
}

/// 徽章渲染配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// 成功响应的缓存时长（秒），同时作用于浏览器与共享缓存
    #[serde(default = "BadgeConfig::default_cache_max_age")]
    pub cache_max_age_secs: u64,
    /// 左下角署名文字
    #[serde(default = "BadgeConfig::default_footer_text")]
    pub footer_text: String,
    /// 背景图 JPEG 压缩质量（1-100）
    #[serde(default = "BadgeConfig::default_background_quality")]
    pub background_quality: u8,
}

impl BadgeConfig {
    fn default_cache_max_age() -> u64 {
        21_600
    }
    fn default_footer_text() -> String {
        "Powered by Xlebovoz".to_string()
    }
    fn default_background_quality() -> u8 {
        70
    }

    /// 成功响应的 `Cache-Control` 取值
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={0}, s-maxage={0}",
            self.cache_max_age_secs
        )
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            cache_max_age_secs: Self::default_cache_max_age(),
            footer_text: Self::default_footer_text(),
            background_quality: Self::default_background_quality(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 日志格式：full | compact
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "full".to_string(),
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 优雅退出超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        10
    }

    /// 获取优雅退出超时时间
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    /// 上游资料 API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 静态资源
    #[serde(default)]
    pub assets: AssetsConfig,
    /// 徽章渲染
    #[serde(default)]
    pub badge: BadgeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 加载配置：内置默认值 < `config.toml`（可选） < 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        let builder = ConfigBuilder::builder()
            .add_source(ConfigBuilder::try_from(&AppConfig::default())?)
            .add_source(File::from(config_path).required(false))
            // 支持环境变量覆盖，例如：APP_SERVER__PORT、APP_UPSTREAM__TIMEOUT_SECS
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;

        tracing::debug!(
            "配置加载完成: upstream = {}, public_dir = {}",
            config.upstream.api_base_url,
            config.assets.public_dir
        );

        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取本地公开资源根目录
    pub fn public_dir(&self) -> PathBuf {
        PathBuf::from(&self.assets.public_dir)
    }

    /// 图片主题外链回退所用的基地址。
    ///
    /// 优先使用显式配置；否则读取部署平台注入的 `VERCEL_URL`；最后回退到本机地址。
    pub fn public_base_url(&self) -> String {
        if let Some(url) = self
            .assets
            .public_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return url.trim_end_matches('/').to_string();
        }
        if let Ok(host) = std::env::var("VERCEL_URL")
            && !host.trim().is_empty()
        {
            return format!("https://{}", host.trim());
        }
        format!("http://localhost:{}", self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            api: ApiConfig {
                prefix: "/api".to_string(),
            },
            upstream: UpstreamConfig::default(),
            assets: AssetsConfig::default(),
            badge: BadgeConfig::default(),
            logging: LoggingConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}
