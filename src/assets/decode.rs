use std::sync::Arc;

use crate::{
    assets::Badge,
    foundation::error::{BannerError, BannerResult},
};

/// Decodes any raster format `image` understands into a premultiplied badge.
pub fn decode_badge(bytes: &[u8]) -> BannerResult<Badge> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| BannerError::decode(format!("decode badge image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(BannerError::decode("badge image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Badge {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
