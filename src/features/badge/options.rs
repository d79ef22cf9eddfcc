use serde::Deserialize;

use super::border::BorderParam;

/// 徽章请求的原始 Query 参数（全部可选）
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BadgeQuery {
    /// 用户名；缺省时返回占位图
    #[serde(default)]
    pub username: Option<String>,
    /// 是否在顶部显示名称（与 `"true"` 大小写不敏感比较）
    #[serde(default)]
    pub show_username: Option<String>,
    /// 主题键（dark/light/github），或包含 `/` 的背景图路径
    #[serde(default)]
    pub theme: Option<String>,
    /// 描边：仅出现即启用；可取颜色名或 3/6 位十六进制
    #[serde(default)]
    pub border: Option<String>,
}

/// `theme` 参数的分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeParam {
    /// 命名主题键
    Named(String),
    /// 背景图路径（相对公开资源根目录）
    ImagePath(String),
}

impl ThemeParam {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.filter(|s| !s.is_empty()) {
            Some(v) if v.contains('/') => ThemeParam::ImagePath(v.to_string()),
            Some(v) => ThemeParam::Named(v.to_string()),
            None => ThemeParam::Named("dark".to_string()),
        }
    }
}

/// 规范化后的渲染选项，构造后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// 去除首尾空白后的用户名；`None` 表示渲染占位图
    pub username: Option<String>,
    pub show_username: bool,
    pub theme: ThemeParam,
    pub border: BorderParam,
}

impl RenderOptions {
    /// 参数解析：任何输入都有确定的回退值，不会失败。
    pub fn from_query(q: &BadgeQuery) -> Self {
        let username = q
            .username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let show_username = q
            .show_username
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        Self {
            username,
            show_username,
            theme: ThemeParam::parse(q.theme.as_deref()),
            border: BorderParam::parse(q.border.as_deref()),
        }
    }
}
