use std::path::{Component, Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD as base64_engine};
use image::ColorType;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use reqwest::Url;
use tokio::task::spawn_blocking;

use crate::config::AppConfig;
use crate::error::AppError;

use super::options::ThemeParam;
use super::theme::{ImageSource, Theme};

/// 背景图压缩目标尺寸（与徽章画布等宽）
pub const BACKGROUND_WIDTH: u32 = 450;
pub const BACKGROUND_HEIGHT: u32 = 140;

/// 图片主题的降级策略，按顺序尝试，前一项失败才尝试下一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageStrategy {
    /// 读取本地资源，裁剪压缩后以 Data URI 内嵌
    EmbedCompressed,
    /// 直接引用对外地址，由渲染端自行拉取
    LinkRemote,
}

const IMAGE_STRATEGIES: [ImageStrategy; 2] =
    [ImageStrategy::EmbedCompressed, ImageStrategy::LinkRemote];

/// 主题解析器：命名主题查表；图片主题按“内嵌压缩 -> 外链 -> dark”逐级降级。
#[derive(Debug, Clone)]
pub struct ThemeAssets {
    public_dir: PathBuf,
    public_base_url: String,
    quality: u8,
}

impl ThemeAssets {
    pub fn new(public_dir: PathBuf, public_base_url: String, quality: u8) -> Self {
        Self {
            public_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            quality: quality.clamp(1, 100),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.public_dir(),
            cfg.public_base_url(),
            cfg.badge.background_quality,
        )
    }

    /// 解析主题，永不失败：图片相关错误在内部逐级恢复。
    pub async fn resolve(&self, param: &ThemeParam) -> Theme {
        match param {
            ThemeParam::Named(key) => Theme::resolve_named(key),
            ThemeParam::ImagePath(raw) => self.resolve_image(raw).await,
        }
    }

    async fn resolve_image(&self, raw: &str) -> Theme {
        let image_path = if raw.starts_with('/') {
            raw.to_string()
        } else {
            format!("/{raw}")
        };

        for strategy in IMAGE_STRATEGIES {
            match self.apply(strategy, &image_path).await {
                Ok(source) => {
                    tracing::debug!(?strategy, path = %image_path, "图片主题解析完成");
                    return Theme::image(source);
                }
                Err(e) => {
                    tracing::warn!(
                        ?strategy,
                        path = %image_path,
                        code = e.code(),
                        "图片主题策略失败，尝试下一级: {}",
                        e
                    );
                }
            }
        }
        Theme::dark()
    }

    async fn apply(
        &self,
        strategy: ImageStrategy,
        image_path: &str,
    ) -> Result<ImageSource, AppError> {
        match strategy {
            ImageStrategy::EmbedCompressed => {
                let path = local_asset_path(&self.public_dir, image_path)?;
                tokio::fs::metadata(&path).await?;
                let quality = self.quality;
                let uri = spawn_blocking(move || {
                    compress_cover_data_uri(&path, BACKGROUND_WIDTH, BACKGROUND_HEIGHT, quality)
                })
                .await
                .map_err(|e| AppError::Internal(format!("阻塞压缩任务执行失败: {e}")))??;
                Ok(ImageSource::Embedded(uri))
            }
            ImageStrategy::LinkRemote => {
                let url = remote_asset_url(&self.public_base_url, image_path)?;
                Ok(ImageSource::Remote(url))
            }
        }
    }
}

/// 将请求路径映射到公开资源目录下的文件；仅允许普通路径段，拒绝 `..` 等越界成分。
fn local_asset_path(public_dir: &Path, image_path: &str) -> Result<PathBuf, AppError> {
    let relative = Path::new(image_path.trim_start_matches('/'));
    let mut out = public_dir.to_path_buf();
    let mut segments = 0usize;
    for comp in relative.components() {
        match comp {
            Component::Normal(seg) => {
                out.push(seg);
                segments += 1;
            }
            Component::CurDir => {}
            _ => {
                return Err(AppError::ImageAsset(format!(
                    "非法的资源路径: {image_path}"
                )));
            }
        }
    }
    if segments == 0 {
        return Err(AppError::ImageAsset("空的资源路径".to_string()));
    }
    Ok(out)
}

fn remote_asset_url(base_url: &str, image_path: &str) -> Result<String, AppError> {
    let url = Url::parse(&format!("{base_url}{image_path}"))
        .map_err(|e| AppError::ImageAsset(format!("无法构造外链地址: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(AppError::ImageAsset(format!("不支持的外链协议: {other}"))),
    }
}

/// 将磁盘图片按给定尺寸进行等比裁剪填充（相当于 xMidYMid slice），再编码为 JPEG 并返回 Data URI。
fn compress_cover_data_uri(
    path: &Path,
    target_w: u32,
    target_h: u32,
    quality: u8,
) -> Result<String, AppError> {
    let img = image::open(path)?;
    let rgb = img
        .resize_to_fill(target_w, target_h, FilterType::Triangle)
        .to_rgb8();

    let mut out = Vec::new();
    let mut enc = JpegEncoder::new_with_quality(&mut out, quality);
    enc.encode(&rgb, target_w, target_h, ColorType::Rgb8.into())?;
    let b64 = base64_engine.encode(out);
    Ok(format!("data:image/jpeg;base64,{b64}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::badge::theme::{Background, ThemeKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_public_dir() -> PathBuf {
        static SEQ: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "profile-badge-assets-{}-{}",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(dir.join("bg")).expect("create temp dir");
        dir
    }

    fn write_png(path: &Path, w: u32, h: u32) {
        let img = image::RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save(path).expect("write png");
    }

    #[tokio::test]
    async fn local_image_is_embedded_as_jpeg_data_uri() {
        let dir = temp_public_dir();
        write_png(&dir.join("bg/photo.png"), 900, 600);
        let assets = ThemeAssets::new(dir.clone(), "https://badge.example.com".into(), 70);

        let theme = assets
            .resolve(&ThemeParam::ImagePath("bg/photo.png".into()))
            .await;
        assert_eq!(theme.kind(), ThemeKind::Image);
        let Background::Image(ImageSource::Embedded(uri)) = &theme.background else {
            panic!("expected embedded image, got {:?}", theme.background);
        };
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let b64 = uri.trim_start_matches("data:image/jpeg;base64,");
        let bytes = base64_engine.decode(b64).expect("decode base64");
        let decoded = image::load_from_memory(&bytes).expect("decode jpeg");
        assert_eq!(decoded.width(), BACKGROUND_WIDTH);
        assert_eq!(decoded.height(), BACKGROUND_HEIGHT);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_remote_link() {
        let dir = temp_public_dir();
        let assets = ThemeAssets::new(dir.clone(), "https://badge.example.com/".into(), 70);

        let theme = assets
            .resolve(&ThemeParam::ImagePath("/bg/none.jpg".into()))
            .await;
        assert_eq!(
            theme.background,
            Background::Image(ImageSource::Remote(
                "https://badge.example.com/bg/none.jpg".into()
            ))
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn undecodable_file_falls_back_to_remote_link() {
        let dir = temp_public_dir();
        std::fs::write(dir.join("bg/broken.png"), b"not an image").expect("write file");
        let assets = ThemeAssets::new(dir.clone(), "http://localhost:3000".into(), 70);

        let theme = assets
            .resolve(&ThemeParam::ImagePath("bg/broken.png".into()))
            .await;
        assert_eq!(
            theme.background,
            Background::Image(ImageSource::Remote(
                "http://localhost:3000/bg/broken.png".into()
            ))
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn unusable_base_url_falls_back_to_dark() {
        let dir = temp_public_dir();
        let assets = ThemeAssets::new(dir.clone(), "not a url".into(), 70);

        let theme = assets
            .resolve(&ThemeParam::ImagePath("bg/none.jpg".into()))
            .await;
        assert_eq!(theme, Theme::dark());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn traversal_never_reaches_the_filesystem() {
        let root = Path::new("/srv/public");
        assert!(local_asset_path(root, "/../etc/passwd").is_err());
        assert!(local_asset_path(root, "/").is_err());
        assert_eq!(
            local_asset_path(root, "/bg/./a.png").expect("valid path"),
            PathBuf::from("/srv/public/bg/a.png")
        );
    }
}
