//! 徽章主题：命名主题表 + 图片背景主题。
//!
//! 主题是一个封闭的标签联合：渐变背景或图片背景。颜色角色在类型层面全部必填，
//! 因而不存在“缺色”的主题；主题键区分大小写，未知键一律回退到 `dark`。

/// 主题的颜色角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// 主文字（数值、用户名）
    pub text: &'static str,
    /// 次要文字（列标题）
    pub muted: &'static str,
    /// 分隔线
    pub divider: &'static str,
    /// 页脚文字
    pub footer: &'static str,
    /// 默认描边色（`border` 未指定颜色时使用）
    pub accent: &'static str,
}

/// 主题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Gradient,
    Image,
}

/// 图片背景来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// 压缩后内嵌的 `data:image/jpeg;base64,...`
    Embedded(String),
    /// 由渲染端自行拉取的外链
    Remote(String),
}

impl ImageSource {
    /// `<image href>` 使用的原始地址（未转义）
    pub fn href(&self) -> &str {
        match self {
            ImageSource::Embedded(uri) => uri,
            ImageSource::Remote(url) => url,
        }
    }
}

/// 背景描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    /// 三段线性渐变（0% / 50% / 100%）
    Gradient([&'static str; 3]),
    /// 覆盖填充的图片 + 半透明暗色遮罩
    Image(ImageSource),
}

/// 解析后的主题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub palette: Palette,
    pub background: Background,
}

/// 图片主题上的半透明遮罩，保证任意照片背景上文字可读
pub const IMAGE_OVERLAY_FILL: &str = "rgba(0,0,0,0.4)";

const DARK_PALETTE: Palette = Palette {
    text: "#f0f6fc",
    muted: "#8b949e",
    divider: "#30363d",
    footer: "#6e7681",
    accent: "#58a6ff",
};

const LIGHT_PALETTE: Palette = Palette {
    text: "#24292f",
    muted: "#57606a",
    divider: "#d0d7de",
    footer: "#8b949e",
    accent: "#0969da",
};

const GITHUB_PALETTE: Palette = Palette {
    text: "#ffffff",
    muted: "#959da5",
    divider: "#444d56",
    footer: "#8b949e",
    accent: "#2fbb4f",
};

/// 图片主题统一使用白色系文字
const IMAGE_PALETTE: Palette = Palette {
    text: "#ffffff",
    muted: "#cccccc",
    divider: "rgba(255,255,255,0.3)",
    footer: "rgba(255,255,255,0.7)",
    accent: "#ffffff",
};

const DARK_STOPS: [&str; 3] = ["#0d1117", "#161b22", "#0d1117"];

/// 命名主题表：键 -> (颜色角色, 渐变色)
const NAMED_THEMES: &[(&str, Palette, [&str; 3])] = &[
    ("dark", DARK_PALETTE, DARK_STOPS),
    ("light", LIGHT_PALETTE, ["#f6f8fa", "#ffffff", "#f6f8fa"]),
    ("github", GITHUB_PALETTE, ["#24292e", "#2f363d", "#24292e"]),
];

impl Theme {
    /// 内置默认主题
    pub fn dark() -> Self {
        Theme {
            palette: DARK_PALETTE,
            background: Background::Gradient(DARK_STOPS),
        }
    }

    /// 按键查找命名主题（精确匹配，区分大小写）
    pub fn named(key: &str) -> Option<Self> {
        NAMED_THEMES
            .iter()
            .find(|(name, _, _)| *name == key)
            .map(|(_, palette, stops)| Theme {
                palette: *palette,
                background: Background::Gradient(*stops),
            })
    }

    /// 命名主题解析：未知键回退到 `dark`
    pub fn resolve_named(key: &str) -> Self {
        Self::named(key).unwrap_or_else(|| {
            tracing::debug!("未知主题 {:?}，回退到 dark", key);
            Self::dark()
        })
    }

    /// 以图片为背景的主题
    pub fn image(source: ImageSource) -> Self {
        Theme {
            palette: IMAGE_PALETTE,
            background: Background::Image(source),
        }
    }

    pub fn kind(&self) -> ThemeKind {
        match self.background {
            Background::Gradient(_) => ThemeKind::Gradient,
            Background::Image(_) => ThemeKind::Image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_resolves_to_dark_exactly() {
        assert_eq!(Theme::resolve_named("unknownkey"), Theme::dark());
        assert_eq!(Theme::resolve_named(""), Theme::dark());
    }

    #[test]
    fn named_lookup_is_exact() {
        let light = Theme::resolve_named("light");
        assert_eq!(light.palette.text, "#24292f");
        assert_eq!(light.palette.accent, "#0969da");
        assert_eq!(light.kind(), ThemeKind::Gradient);

        assert_eq!(Theme::resolve_named("LIGHT"), Theme::dark());
        assert_eq!(Theme::resolve_named(" light"), Theme::dark());
    }

    #[test]
    fn dark_matches_catalog_entry() {
        assert_eq!(Theme::named("dark"), Some(Theme::dark()));
    }

    #[test]
    fn image_theme_uses_white_text() {
        let t = Theme::image(ImageSource::Remote("https://x/bg.png".into()));
        assert_eq!(t.kind(), ThemeKind::Image);
        assert_eq!(t.palette.text, "#ffffff");
        assert_eq!(t.palette.accent, "#ffffff");
    }
}
