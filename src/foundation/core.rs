use crate::foundation::error::{BannerError, BannerResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> BannerResult<Self> {
        if width == 0 || height == 0 {
            return Err(BannerError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Whole frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(u32);

impl Fps {
    pub fn new(fps: u32) -> BannerResult<Self> {
        if fps == 0 {
            return Err(BannerError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Display time of a single frame, `round(1000 / fps)`.
    pub fn frame_delay_ms(self) -> u32 {
        (1000.0 / f64::from(self.0)).round() as u32
    }

    /// `max(1, round(fps * secs))`.
    pub fn frames_for_secs(self, secs: f64) -> u64 {
        let n = (f64::from(self.0) * secs).round();
        if n.is_finite() && n >= 1.0 {
            n as u64
        } else {
            1
        }
    }
}

/// Opaque background colour, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba_opaque(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}
