use crate::foundation::error::{BannerError, BannerResult};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Fills a premultiplied RGBA8 buffer with a single colour.
pub fn fill(dst: &mut [u8], rgba: PremulRgba8) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Composites `src` (premultiplied, `src_w` x `src_h`) onto `dst` with its top-left corner at
/// (`x`, `y`). Parts falling outside `dst` are clipped.
#[allow(clippy::too_many_arguments)]
pub fn blit_over(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x: i64,
    y: i64,
) -> BannerResult<()> {
    if dst.len() != dst_w as usize * dst_h as usize * 4
        || src.len() != src_w as usize * src_h as usize * 4
    {
        return Err(BannerError::validation(
            "blit_over expects tightly packed rgba8 buffers",
        ));
    }

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src_w)).min(i64::from(dst_w));
    let y1 = (y + i64::from(src_h)).min(i64::from(dst_h));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let row_px = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_off = (sy * src_w as usize + sx) * 4;
        let d_off = (dy as usize * dst_w as usize + x0 as usize) * 4;
        let s_row = &src[s_off..s_off + row_px * 4];
        let d_row = &mut dst[d_off..d_off + row_px * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
