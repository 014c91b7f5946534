use std::path::PathBuf;

use crate::{
    animate::animate,
    compose::{Strip, compose_strip},
    config::BannerConfig,
    encode_gif::{GifConfig, write_gif},
    fetch::{BadgeFetcher, fetch_badges},
    foundation::error::{BannerError, BannerResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderStats {
    pub badges_requested: usize,
    pub badges_fetched: usize,
    pub strip_width: u32,
    pub frames: usize,
    pub fps: u32,
    pub out_path: PathBuf,
}

/// Fetches every configured badge and lays them out into a strip.
///
/// Returns the strip together with the number of badges that made it in. Fails with
/// [`BannerError::NoBadges`] when none could be fetched.
pub fn fetch_and_compose(
    cfg: &BannerConfig,
    fetcher: &dyn BadgeFetcher,
) -> BannerResult<(Strip, usize)> {
    cfg.validate()?;

    tracing::info!("Downloading {} badges…", cfg.badge_urls.len());
    let badges = fetch_badges(fetcher, &cfg.badge_urls);
    if badges.is_empty() {
        return Err(BannerError::NoBadges);
    }

    let strip = compose_strip(
        &badges,
        cfg.badge_height(),
        cfg.padding_x,
        cfg.background_rgb,
    )?;
    Ok((strip, badges.len()))
}

/// Runs the whole banner pipeline: fetch, compose, animate, encode.
///
/// Nothing is written when no badge could be fetched.
pub fn render_banner(cfg: &BannerConfig, fetcher: &dyn BadgeFetcher) -> BannerResult<RenderStats> {
    let (strip, fetched) = fetch_and_compose(cfg, fetcher)?;

    let canvas = cfg.canvas()?;
    let fps = cfg.fps()?;
    tracing::debug!(
        speed_px_per_frame = cfg.speed_px_per_frame,
        "nominal speed (step is derived from loop distance)"
    );
    let frames = animate(
        &strip,
        canvas,
        fps,
        cfg.duration_seconds,
        cfg.background_rgb,
    )?;

    let gif = GifConfig {
        width: canvas.width,
        height: canvas.height,
        delay_ms: fps.frame_delay_ms(),
        out_path: cfg.output_path.clone(),
    };
    write_gif(&gif, &frames)?;

    Ok(RenderStats {
        badges_requested: cfg.badge_urls.len(),
        badges_fetched: fetched,
        strip_width: strip.width,
        frames: frames.len(),
        fps: fps.get(),
        out_path: gif.out_path,
    })
}
