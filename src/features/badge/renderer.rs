use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::AppError;

use super::border::BorderSpec;
use super::client::ProfileStats;
use super::format::format_count;
use super::options::RenderOptions;
use super::theme::{Background, IMAGE_OVERLAY_FILL, Theme};

// 画布与布局常量
pub const CANVAS_WIDTH: u32 = 450;
/// 不显示用户名时的画布高度
pub const CANVAS_HEIGHT_SHORT: u32 = 145;
/// 显示用户名时的画布高度
pub const CANVAS_HEIGHT_TALL: u32 = 155;
/// 显示用户名时所有行整体下移的距离
const USERNAME_Y_OFFSET: u32 = 25;
const COLUMN_CENTERS: [u32; 3] = [75, 225, 375];
const DIVIDER_XS: [u32; 2] = [150, 300];
const STAT_GROUP_Y: u32 = 60;
const DIVIDER_TOP_Y: u32 = 40;
const DIVIDER_BOTTOM_Y: u32 = 105;
const FOOTER_Y: u32 = 120;
const FOOTER_MARGIN_X: u32 = 20;
const CORNER_RADIUS: u32 = 20;
const FONT_FAMILY: &str = "Arial, sans-serif";
/// 错误信息最大显示宽度（按等宽列估算）
const ERROR_MESSAGE_MAX_WIDTH: usize = 46;

/// 用户名缺省时的固定占位图
const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="80" viewBox="0 0 300 80">
  <style>
    .container { font-family: 'Segoe UI', Arial, sans-serif; }
    .title { font-size: 18px; font-weight: 600; fill: #24292f; }
    .desc { font-size: 14px; fill: #57606a; }
  </style>
  <rect x="2" y="2" width="296" height="76" fill="#f6f8fa" rx="12" stroke="none"/>
  <text x="150" y="35" class="container title" text-anchor="middle">GitHub Badge API</text>
  <text x="150" y="55" class="container desc" text-anchor="middle">Add ?username=yourname to URL</text>
</svg>
"##;

/// 页脚：左侧署名、右侧日期
#[derive(Debug, Clone, Copy)]
pub struct Footer<'a> {
    pub text: &'a str,
    pub date: NaiveDate,
}

/// 布局变体：仅由是否显示用户名决定画布高度与纵向偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeLayout {
    pub height: u32,
    pub y_offset: u32,
}

impl BadgeLayout {
    pub fn new(show_username: bool) -> Self {
        if show_username {
            Self {
                height: CANVAS_HEIGHT_TALL,
                y_offset: USERNAME_Y_OFFSET,
            }
        } else {
            Self {
                height: CANVAS_HEIGHT_SHORT,
                y_offset: 0,
            }
        }
    }
}

pub fn render_placeholder_svg() -> &'static str {
    PLACEHOLDER_SVG
}

/// 组装成功路径的徽章 SVG。给定相同输入（含日期）输出完全一致。
pub fn render_badge_svg(
    stats: &ProfileStats,
    theme: &Theme,
    border: &BorderSpec,
    opts: &RenderOptions,
    footer: &Footer<'_>,
) -> String {
    let layout = BadgeLayout::new(opts.show_username);
    let height = layout.height;
    let dy = layout.y_offset;
    let p = &theme.palette;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_WIDTH}" height="{height}" viewBox="0 0 {CANVAS_WIDTH} {height}">"#
    ));
    svg.push('\n');
    svg.push_str(&background_markup(theme, border, height));

    if opts.show_username {
        svg.push_str(&format!(
            r#"  <text x="{}" y="30" font-family="{FONT_FAMILY}" font-size="16" fill="{}" text-anchor="middle" font-weight="600">{}</text>"#,
            CANVAS_WIDTH / 2,
            p.text,
            escape_xml(&stats.display_name)
        ));
        svg.push('\n');
    }

    let columns = [
        ("📦 Repos", format_count(stats.repo_count)),
        ("⭐ Stars", format_count(stats.star_total)),
        ("👥 Followers", format_count(stats.follower_count)),
    ];
    for (i, (label, value)) in columns.iter().enumerate() {
        svg.push_str(&format!(
            r#"  <g transform="translate({}, {})">
    <text x="0" y="-25" font-family="{FONT_FAMILY}" font-size="14" fill="{}" text-anchor="middle" font-weight="500">{label}</text>
    <text x="0" y="25" font-family="{FONT_FAMILY}" font-size="42" fill="{}" text-anchor="middle" font-weight="bold">{value}</text>
  </g>
"#,
            COLUMN_CENTERS[i],
            STAT_GROUP_Y + dy,
            p.muted,
            p.text,
        ));
        if let Some(x) = DIVIDER_XS.get(i) {
            svg.push_str(&format!(
                r#"  <line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{}" stroke-width="2"/>"#,
                DIVIDER_TOP_Y + dy,
                DIVIDER_BOTTOM_Y + dy,
                p.divider
            ));
            svg.push('\n');
        }
    }

    svg.push_str(&footer_markup(footer, FOOTER_Y + dy, p.footer));
    svg.push_str("</svg>\n");
    svg
}

/// 错误徽章：固定画布、红色渐变背景、居中错误信息。只做字符串拼接，不会失败。
pub fn render_error_svg(err: &AppError, border: &BorderSpec, footer: &Footer<'_>) -> String {
    let height = CANVAS_HEIGHT_SHORT;
    let message = error_message(err);

    let mut svg = String::with_capacity(2048);
    svg.push_str(&format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_WIDTH}" height="{height}" viewBox="0 0 {CANVAS_WIDTH} {height}">
  <defs>
    <linearGradient id="error-gradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="#f85149"/>
      <stop offset="100%" stop-color="#da3633"/>
    </linearGradient>
  </defs>
"##
    ));
    svg.push_str(&outer_rect("url(#error-gradient)", border, height));
    svg.push_str(&format!(
        r#"  <text x="{}" y="70" font-family="{FONT_FAMILY}" font-size="16" fill="white" text-anchor="middle" font-weight="bold">❌ {}</text>"#,
        CANVAS_WIDTH / 2,
        escape_xml(&message)
    ));
    svg.push('\n');
    svg.push_str(&footer_markup(footer, height - 15, "rgba(255,255,255,0.7)"));
    svg.push_str("</svg>\n");
    svg
}

/// 错误徽章上的文字。用户名完整保留；其余错误的细节部分（上游原始报错）按宽度截断。
fn error_message(err: &AppError) -> String {
    match err {
        AppError::ProfileNotFound { .. } => err.to_string(),
        _ => truncate_with_ellipsis(&err.to_string(), ERROR_MESSAGE_MAX_WIDTH),
    }
}

fn background_markup(theme: &Theme, border: &BorderSpec, height: u32) -> String {
    match &theme.background {
        Background::Gradient([start, mid, end]) => {
            let mut out = format!(
                r##"  <defs>
    <linearGradient id="gradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="{start}"/>
      <stop offset="50%" stop-color="{mid}"/>
      <stop offset="100%" stop-color="{end}"/>
    </linearGradient>
  </defs>
"##
            );
            out.push_str(&outer_rect("url(#gradient)", border, height));
            out
        }
        Background::Image(source) => {
            let href = escape_xml(source.href());
            let mut out = format!(
                r#"  <defs>
    <pattern id="bg-image" patternUnits="userSpaceOnUse" width="{CANVAS_WIDTH}" height="{height}">
      <image href="{href}" x="0" y="0" width="{CANVAS_WIDTH}" height="{height}" preserveAspectRatio="xMidYMid slice"/>
    </pattern>
  </defs>
"#
            );
            out.push_str(&outer_rect("url(#bg-image)", border, height));
            out.push_str(&format!(
                r#"  <rect x="2" y="2" width="{}" height="{}" fill="{IMAGE_OVERLAY_FILL}" rx="{CORNER_RADIUS}" stroke="none"/>"#,
                CANVAS_WIDTH - 4,
                height - 4
            ));
            out.push('\n');
            out
        }
    }
}

/// 外层圆角矩形，描边参数来自 BorderSpec（宽度为 0 时不可见）
fn outer_rect(fill: &str, border: &BorderSpec, height: u32) -> String {
    format!(
        "  <rect x=\"2\" y=\"2\" width=\"{}\" height=\"{}\" fill=\"{fill}\" rx=\"{CORNER_RADIUS}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\"/>\n",
        CANVAS_WIDTH - 4,
        height - 4,
        escape_xml(&border.color),
        border.stroke_width()
    )
}

fn footer_markup(footer: &Footer<'_>, y: u32, fill: &str) -> String {
    format!(
        r#"  <text x="{FOOTER_MARGIN_X}" y="{y}" font-family="{FONT_FAMILY}" font-size="10" fill="{fill}" text-anchor="start" font-weight="400">{}</text>
  <text x="{}" y="{y}" font-family="{FONT_FAMILY}" font-size="10" fill="{fill}" text-anchor="end" font-weight="400">{}</text>
"#,
        escape_xml(footer.text),
        CANVAS_WIDTH - FOOTER_MARGIN_X,
        footer.date.format("%Y-%m-%d")
    )
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.width() <= max_width {
        return text.to_string();
    }
    // 预留省略号宽度（按 1 计）
    let target = max_width.saturating_sub(1);
    let mut acc = String::new();
    let mut w = 0usize;
    for ch in text.chars() {
        let ch_w = UnicodeWidthChar::width(ch).unwrap_or(0).max(1);
        if w + ch_w > target {
            break;
        }
        acc.push(ch);
        w += ch_w;
    }
    acc.push('…');
    acc
}
