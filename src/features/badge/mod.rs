mod assets;
pub mod border;
pub mod client;
pub mod format;
pub mod handler;
pub mod options;
pub mod renderer;
mod service;
pub mod theme;

pub use assets::ThemeAssets;
pub use border::{BorderParam, BorderSpec, resolve_border};
pub use client::{ProfileClient, ProfileStats};
pub use format::format_count;
pub use handler::create_badge_router;
pub use options::{BadgeQuery, RenderOptions, ThemeParam};
pub use renderer::{Footer, render_badge_svg, render_error_svg, render_placeholder_svg};
pub use service::{BadgeOutcome, BadgeService};
pub use theme::{Theme, ThemeKind};
