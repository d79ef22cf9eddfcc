use super::theme::Theme;

/// 启用描边时的线宽
pub const BORDER_WIDTH: u32 = 2;

/// 颜色名 -> 十六进制
const BORDER_COLORS: &[(&str, &str)] = &[
    ("red", "#f85149"),
    ("blue", "#58a6ff"),
    ("green", "#2fbb4f"),
    ("yellow", "#f1e05a"),
    ("purple", "#a371f7"),
    ("pink", "#f778ba"),
    ("orange", "#ff7b72"),
    ("white", "#ffffff"),
    ("black", "#000000"),
];

/// 解析后的描边
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderSpec {
    pub color: String,
    /// 0 表示无描边
    pub width: u32,
}

impl BorderSpec {
    /// 无描边（颜色仍取主题默认色，便于属性输出保持一致）
    pub fn none(theme: &Theme) -> Self {
        Self {
            color: theme.palette.accent.to_string(),
            width: 0,
        }
    }

    /// 实际输出的 `stroke-width`：外框内缩 2px，描边以两倍线宽绘制以填满内缩区域。
    pub fn stroke_width(&self) -> u32 {
        self.width * 2
    }

    pub fn is_enabled(&self) -> bool {
        self.width > 0
    }
}

/// 按颜色名查找（大小写不敏感）
pub fn named_color(name: &str) -> Option<&'static str> {
    BORDER_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, hex)| *hex)
}

/// 校验 3 位或 6 位十六进制颜色（可带 `#`），返回规范化的 `#xxxxxx`/`#xxx`。
pub fn parse_hex_color(raw: &str) -> Option<String> {
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if (hex.len() == 3 || hex.len() == 6) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(format!("#{hex}"))
    } else {
        None
    }
}

/// 规范化后的 `border` 参数（尚未结合主题）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorderParam {
    /// 参数缺省：无描边
    Absent,
    /// 仅出现、取值为 `true` 或无法识别：使用主题默认色
    ThemeAccent,
    /// 颜色名或合法十六进制
    Color(String),
}

impl BorderParam {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return BorderParam::Absent;
        };
        if raw.is_empty() || raw.eq_ignore_ascii_case("true") {
            return BorderParam::ThemeAccent;
        }
        if let Some(hex) = named_color(raw) {
            return BorderParam::Color(hex.to_string());
        }
        if let Some(hex) = parse_hex_color(raw) {
            return BorderParam::Color(hex);
        }
        tracing::debug!("无法识别的 border 取值 {:?}，使用主题默认色", raw);
        BorderParam::ThemeAccent
    }
}

/// 结合主题得到最终描边；必须在主题解析之后、SVG 组装之前调用。
pub fn resolve_border(param: &BorderParam, theme: &Theme) -> BorderSpec {
    let color = match param {
        BorderParam::Absent => return BorderSpec::none(theme),
        BorderParam::ThemeAccent => theme.palette.accent.to_string(),
        BorderParam::Color(hex) => hex.clone(),
    };
    BorderSpec {
        color,
        width: BORDER_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn border(raw: Option<&str>, theme: &Theme) -> BorderSpec {
        resolve_border(&BorderParam::parse(raw), theme)
    }

    #[test]
    fn absent_border_has_zero_width() {
        let theme = Theme::dark();
        let b = border(None, &theme);
        assert_eq!(b.width, 0);
        assert_eq!(b.stroke_width(), 0);
        assert!(!b.is_enabled());
    }

    #[test]
    fn named_color_maps_to_fixed_hex() {
        let theme = Theme::dark();
        let b = border(Some("blue"), &theme);
        assert_eq!(b.color, "#58a6ff");
        assert_eq!(b.width, BORDER_WIDTH);

        let b = border(Some("Purple"), &theme);
        assert_eq!(b.color, "#a371f7");
    }

    #[test]
    fn flag_only_uses_theme_accent() {
        let theme = Theme::resolve_named("light");
        assert_eq!(border(Some(""), &theme).color, "#0969da");
        assert_eq!(border(Some("TRUE"), &theme).color, "#0969da");
        assert_eq!(border(Some(""), &theme).width, BORDER_WIDTH);
    }

    #[test]
    fn hex_accepted_with_or_without_hash() {
        let theme = Theme::dark();
        assert_eq!(border(Some("ff8800"), &theme).color, "#ff8800");
        assert_eq!(border(Some("#abc"), &theme).color, "#abc");
    }

    #[test]
    fn invalid_hex_falls_back_to_accent() {
        let theme = Theme::resolve_named("github");
        let b = border(Some("zz9988"), &theme);
        assert_eq!(b.color, "#2fbb4f");
        assert_eq!(b.width, BORDER_WIDTH);

        let b = border(Some("false"), &theme);
        assert_eq!(b.color, "#2fbb4f");
        assert!(b.is_enabled());
    }
}
