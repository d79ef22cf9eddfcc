use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 默认过滤规则：本 crate 与 tower_http 使用配置中的级别
fn default_filter(cfg: &LoggingConfig) -> String {
    let level = cfg.level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("profile_badge={level},tower_http={level}")
}

/// 初始化 tracing 订阅器。`RUST_LOG` 存在时优先生效。
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(cfg).into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if cfg.format.eq_ignore_ascii_case("compact") {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing 初始化失败（可能已初始化）: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::default_filter;
    use crate::config::LoggingConfig;

    #[test]
    fn default_filter_uses_configured_level() {
        let cfg = LoggingConfig {
            level: "debug".to_string(),
            format: "full".to_string(),
        };
        assert_eq!(default_filter(&cfg), "profile_badge=debug,tower_http=debug");

        let blank = LoggingConfig {
            level: " ".to_string(),
            format: "compact".to_string(),
        };
        assert_eq!(default_filter(&blank), "profile_badge=info,tower_http=info");
    }
}
