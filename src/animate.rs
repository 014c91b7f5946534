//! Turns a composed strip into the frames of a seamless leftward scroll.
//!
//! The strip is laid out twice with one canvas width of background between the copies. A
//! canvas-wide window then slides over that working strip, `step` pixels per frame, wrapping
//! once it has travelled `loop_distance = strip_width + canvas_width` pixels. Because the
//! second copy starts exactly `loop_distance` pixels after the first, the wrap is invisible
//! up to the integer rounding of `step`.

use crate::{
    composite_cpu::{blit_over, fill},
    compose::Strip,
    foundation::{
        core::{Canvas, Fps, Rgb8},
        error::{BannerError, BannerResult},
    },
};

/// NeuQuant sampling factor passed to the `gif` quantizer (1 = best, 30 = fastest).
pub const QUANTIZE_SPEED: i32 = 10;

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Opaque RGBA8, row-major.
    pub data: Vec<u8>,
}

/// A frame reduced to at most 256 colours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalettedFrame {
    pub width: u16,
    pub height: u16,
    /// RGB triples.
    pub palette: Vec<u8>,
    /// One palette index per pixel.
    pub indices: Vec<u8>,
}

/// Frame count and horizontal stepping for one animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollPlan {
    pub total_frames: u64,
    pub loop_distance: u64,
    pub step: u64,
}

impl ScrollPlan {
    pub fn new(strip_width: u32, canvas_width: u32, fps: Fps, duration_secs: f64) -> Self {
        let total_frames = fps.frames_for_secs(duration_secs);
        let loop_distance = u64::from(strip_width) + u64::from(canvas_width);
        let step = ((loop_distance as f64 / total_frames as f64).round() as u64).max(1);
        Self {
            total_frames,
            loop_distance,
            step,
        }
    }

    /// Window offsets, one per frame, starting at 0.
    pub fn offsets(self) -> impl Iterator<Item = u64> {
        let Self {
            total_frames,
            loop_distance,
            step,
        } = self;
        let loop_distance = loop_distance.max(1);
        std::iter::successors(Some(0u64), move |&x| Some((x + step) % loop_distance))
            .take(total_frames as usize)
    }
}

/// `strip`, a canvas-wide gap, then `strip` again.
pub fn build_loop_strip(strip: &Strip, canvas_width: u32, background: Rgb8) -> BannerResult<Strip> {
    let width = u64::from(strip.width) * 2 + u64::from(canvas_width);
    let width = u32::try_from(width)
        .map_err(|_| BannerError::validation(format!("loop strip width {width} is too large")))?;

    let mut out = Strip::filled(width, strip.height, background);
    let src = strip.as_badge();
    out.composite(&src, 0, 0)?;
    out.composite(&src, i64::from(strip.width) + i64::from(canvas_width), 0)?;
    Ok(out)
}

/// Renders the canvas-wide window of `loop_strip` starting at `x`, vertically centred.
pub fn render_frame(
    loop_strip: &Strip,
    canvas: Canvas,
    x: u64,
    background: Rgb8,
) -> BannerResult<FrameRGBA> {
    let mut data = vec![0u8; canvas.byte_len()];
    fill(&mut data, background.to_rgba_opaque());

    let y = (i64::from(canvas.height) - i64::from(loop_strip.height)) / 2;
    let x = i64::try_from(x).map_err(|_| BannerError::validation("scroll offset overflow"))?;
    blit_over(
        &mut data,
        canvas.width,
        canvas.height,
        &loop_strip.rgba8,
        loop_strip.width,
        loop_strip.height,
        -x,
        y,
    )?;

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

pub fn quantize(frame: FrameRGBA) -> BannerResult<PalettedFrame> {
    let width = u16::try_from(frame.width)
        .map_err(|_| BannerError::validation("frame width exceeds GIF limit"))?;
    let height = u16::try_from(frame.height)
        .map_err(|_| BannerError::validation("frame height exceeds GIF limit"))?;
    if frame.data.len() != usize::from(width) * usize::from(height) * 4 {
        return Err(BannerError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }

    let mut data = frame.data;
    let gif_frame = gif::Frame::from_rgba_speed(width, height, &mut data, QUANTIZE_SPEED);
    Ok(PalettedFrame {
        width,
        height,
        palette: gif_frame.palette.unwrap_or_default(),
        indices: gif_frame.buffer.into_owned(),
    })
}

/// Produces every frame of the scroll, already palette-reduced.
pub fn animate(
    strip: &Strip,
    canvas: Canvas,
    fps: Fps,
    duration_secs: f64,
    background: Rgb8,
) -> BannerResult<Vec<PalettedFrame>> {
    let plan = ScrollPlan::new(strip.width, canvas.width, fps, duration_secs);
    tracing::debug!(
        frames = plan.total_frames,
        loop_distance = plan.loop_distance,
        step = plan.step,
        "scroll plan"
    );

    let loop_strip = build_loop_strip(strip, canvas.width, background)?;
    let mut frames = Vec::with_capacity(plan.total_frames.min(1 << 16) as usize);
    for x in plan.offsets() {
        let frame = render_frame(&loop_strip, canvas, x, background)?;
        frames.push(quantize(frame)?);
    }
    Ok(frames)
}
