use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use image::imageops::FilterType;

use crate::{
    assets::Badge,
    composite_cpu::{blit_over, fill},
    foundation::{
        core::Rgb8,
        error::{BannerError, BannerResult},
    },
};

/// All badges laid out side by side on an opaque background.
#[derive(Clone, Debug)]
pub struct Strip {
    pub width: u32,
    pub height: u32,
    /// Opaque RGBA8, row-major, tightly packed.
    pub rgba8: Vec<u8>,
}

impl Strip {
    /// A strip of the given size filled with `background`.
    pub fn filled(width: u32, height: u32, background: Rgb8) -> Self {
        let mut rgba8 = vec![0u8; width as usize * height as usize * 4];
        fill(&mut rgba8, background.to_rgba_opaque());
        Self {
            width,
            height,
            rgba8,
        }
    }

    pub fn composite(&mut self, badge: &Badge, x: i64, y: i64) -> BannerResult<()> {
        blit_over(
            &mut self.rgba8,
            self.width,
            self.height,
            &badge.rgba8_premul,
            badge.width,
            badge.height,
            x,
            y,
        )
    }

    /// Views the strip as a badge so it can be composited like one.
    pub fn as_badge(&self) -> Badge {
        Badge {
            width: self.width,
            height: self.height,
            rgba8_premul: Arc::new(self.rgba8.clone()),
        }
    }

    pub fn save_png(&self, path: &Path) -> BannerResult<()> {
        image::save_buffer_with_format(
            path,
            &self.rgba8,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Scales `badge` to `target_height`, keeping its aspect ratio. Width never drops below 1.
pub fn fit_height(badge: &Badge, target_height: u32) -> BannerResult<Badge> {
    if target_height == 0 {
        return Err(BannerError::validation("target height must be > 0"));
    }
    if badge.height == target_height {
        return Ok(badge.clone());
    }

    let scale = f64::from(target_height) / f64::from(badge.height);
    let new_width = ((f64::from(badge.width) * scale).round() as u32).max(1);

    let src = image::RgbaImage::from_raw(
        badge.width,
        badge.height,
        badge.rgba8_premul.as_ref().clone(),
    )
    .ok_or_else(|| BannerError::validation("badge buffer does not match its dimensions"))?;
    // Resampling premultiplied pixels keeps transparent edges from bleeding colour.
    let resized = image::imageops::resize(&src, new_width, target_height, FilterType::Lanczos3);
    let mut rgba8_premul = resized.into_raw();
    clamp_to_alpha_in_place(&mut rgba8_premul);

    Ok(Badge {
        width: new_width,
        height: target_height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Lanczos ringing can push a premultiplied channel above its alpha.
fn clamp_to_alpha_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
}

/// `sum(widths) + padding * (count - 1)`.
pub fn strip_width(widths: &[u32], padding: u32) -> BannerResult<u32> {
    let gaps = widths.len().saturating_sub(1) as u64;
    let total = widths.iter().map(|&w| u64::from(w)).sum::<u64>() + u64::from(padding) * gaps;
    u32::try_from(total)
        .map_err(|_| BannerError::validation(format!("strip width {total} is too large")))
}

/// Normalizes every badge to `target_height` and lays them out left to right, `padding`
/// pixels apart, on an opaque `background`.
pub fn compose_strip(
    badges: &[Badge],
    target_height: u32,
    padding: u32,
    background: Rgb8,
) -> BannerResult<Strip> {
    if badges.is_empty() {
        return Err(BannerError::NoBadges);
    }

    let resized = badges
        .iter()
        .map(|b| fit_height(b, target_height))
        .collect::<BannerResult<Vec<_>>>()?;
    let widths: Vec<u32> = resized.iter().map(|b| b.width).collect();
    let width = strip_width(&widths, padding)?;

    let mut strip = Strip::filled(width, target_height, background);
    let mut x = 0i64;
    for badge in &resized {
        strip.composite(badge, x, 0)?;
        x += i64::from(badge.width) + i64::from(padding);
    }

    tracing::debug!(
        badges = resized.len(),
        width,
        height = target_height,
        "composed strip"
    );
    Ok(strip)
}
