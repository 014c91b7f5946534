//! Render a looping, horizontally scrolling GIF banner from a list of badge images.
//!
//! The pipeline runs once, strictly in order:
//!
//! 1. **Fetch**: download each badge (shields URLs are rewritten to ask for PNG) and decode it
//!    into premultiplied RGBA8. Failed badges are logged and skipped.
//! 2. **Compose**: scale every badge to a common height and lay them out left to right.
//! 3. **Animate**: slide a canvas-wide window over a doubled strip, one palette-reduced frame
//!    per tick.
//! 4. **Encode**: write the frames as an endlessly looping GIF.
//!
//! Network access sits behind [`BadgeFetcher`], so everything past the fetch can run on
//! synthetic badges.
#![forbid(unsafe_code)]

pub mod animate;
pub mod assets;
pub mod compose;
pub mod composite_cpu;
pub mod config;
pub mod encode_gif;
pub mod fetch;
pub mod foundation;
pub mod pipeline;

pub use animate::{FrameRGBA, PalettedFrame, ScrollPlan, animate, build_loop_strip, quantize};
pub use assets::{Badge, decode::decode_badge};
pub use compose::{Strip, compose_strip, fit_height, strip_width};
pub use config::{BannerConfig, DEFAULT_BADGE_URLS};
pub use encode_gif::{GifConfig, ensure_parent_dir, write_gif};
pub use fetch::{
    BadgeFetcher, HttpFetcher, check_content_type, fetch_badges, rasterize_url,
};
pub use foundation::core::{Canvas, Fps, Rgb8};
pub use foundation::error::{BannerError, BannerResult};
pub use pipeline::{RenderStats, fetch_and_compose, render_banner};
