use std::{
    borrow::Cow,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    animate::PalettedFrame,
    foundation::error::{BannerError, BannerResult},
};

#[derive(Clone, Debug)]
pub struct GifConfig {
    pub width: u32,
    pub height: u32,
    /// Display time of every frame.
    pub delay_ms: u32,
    pub out_path: PathBuf,
}

impl GifConfig {
    pub fn validate(&self) -> BannerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BannerError::validation("gif width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(BannerError::validation(format!(
                "gif dimensions {}x{} exceed {}x{}",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        if self.delay_ms == 0 {
            return Err(BannerError::validation("gif frame delay must be non-zero"));
        }
        Ok(())
    }

    /// GIF stores delays in hundredths of a second.
    pub fn delay_centis(&self) -> u16 {
        let cs = (self.delay_ms + 5) / 10;
        cs.clamp(1, u32::from(u16::MAX)) as u16
    }
}

pub fn ensure_parent_dir(path: &Path) -> BannerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Writes `frames` as an endlessly looping GIF. Each frame fully replaces the previous one.
pub fn write_gif(cfg: &GifConfig, frames: &[PalettedFrame]) -> BannerResult<()> {
    cfg.validate()?;
    if frames.is_empty() {
        return Err(BannerError::validation("gif needs at least one frame"));
    }
    let (width, height) = (cfg.width as u16, cfg.height as u16);
    if let Some(bad) = frames
        .iter()
        .find(|f| f.width != width || f.height != height)
    {
        return Err(BannerError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            bad.width, bad.height, width, height
        )));
    }

    ensure_parent_dir(&cfg.out_path)?;
    let file = File::create(&cfg.out_path)
        .with_context(|| format!("create gif '{}'", cfg.out_path.display()))?;

    let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
        .map_err(|e| BannerError::encode(format!("start gif stream: {e}")))?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .map_err(|e| BannerError::encode(format!("write loop extension: {e}")))?;

    let delay = cfg.delay_centis();
    for (i, f) in frames.iter().enumerate() {
        let frame = gif::Frame {
            width,
            height,
            delay,
            dispose: gif::DisposalMethod::Background,
            palette: Some(f.palette.clone()),
            buffer: Cow::Borrowed(f.indices.as_slice()),
            ..Default::default()
        };
        encoder
            .write_frame(&frame)
            .map_err(|e| BannerError::encode(format!("write frame {i}: {e}")))?;
    }

    // `into_inner` writes the trailer; flushing surfaces buffered I/O errors.
    let mut out = encoder
        .into_inner()
        .map_err(|e| BannerError::encode(format!("finish gif stream: {e}")))?;
    use std::io::Write as _;
    out.flush()
        .with_context(|| format!("flush gif '{}'", cfg.out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(out: &str) -> GifConfig {
        GifConfig {
            width: 2,
            height: 2,
            delay_ms: 40,
            out_path: PathBuf::from("target").join("encode_gif_unit").join(out),
        }
    }

    fn solid_frame(index: u8) -> PalettedFrame {
        PalettedFrame {
            width: 2,
            height: 2,
            palette: vec![0, 0, 0, 255, 255, 255],
            indices: vec![index; 4],
        }
    }

    #[test]
    fn config_validation_catches_bad_values() {
        assert!(
            GifConfig {
                width: 0,
                ..cfg("a.gif")
            }
            .validate()
            .is_err()
        );
        assert!(
            GifConfig {
                width: 70_000,
                ..cfg("a.gif")
            }
            .validate()
            .is_err()
        );
        assert!(
            GifConfig {
                delay_ms: 0,
                ..cfg("a.gif")
            }
            .validate()
            .is_err()
        );
        cfg("a.gif").validate().unwrap();
    }

    #[test]
    fn delay_rounds_to_centiseconds() {
        assert_eq!(cfg("a.gif").delay_centis(), 4);
        assert_eq!(
            GifConfig {
                delay_ms: 33,
                ..cfg("a.gif")
            }
            .delay_centis(),
            3
        );
        assert_eq!(
            GifConfig {
                delay_ms: 1,
                ..cfg("a.gif")
            }
            .delay_centis(),
            1
        );
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert!(write_gif(&cfg("empty.gif"), &[]).is_err());
    }

    #[test]
    fn mismatched_frame_is_rejected() {
        let mut f = solid_frame(0);
        f.width = 3;
        f.indices = vec![0; 6];
        assert!(write_gif(&cfg("mismatch.gif"), &[f]).is_err());
    }

    #[test]
    fn writes_looping_gif_with_background_disposal() {
        let c = cfg("two.gif");
        let _ = std::fs::remove_file(&c.out_path);
        write_gif(&c, &[solid_frame(0), solid_frame(1)]).unwrap();

        let bytes = std::fs::read(&c.out_path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        // NETSCAPE2.0 application extension with loop count 0 (forever).
        let netscape = b"NETSCAPE2.0\x03\x01\x00\x00";
        assert!(bytes.windows(netscape.len()).any(|w| w == netscape));

        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let mut dec = opts.read_info(File::open(&c.out_path).unwrap()).unwrap();
        let mut n = 0;
        while let Some(frame) = dec.read_next_frame().unwrap() {
            assert_eq!(frame.delay, 4);
            assert_eq!(frame.dispose, gif::DisposalMethod::Background);
            assert_eq!((frame.width, frame.height), (2, 2));
            n += 1;
        }
        assert_eq!(n, 2);
    }
}
