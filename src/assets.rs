pub mod decode;

use std::sync::Arc;

/// A fetched badge ready for composition.
#[derive(Clone, Debug)]
pub struct Badge {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Badge {
    /// Builds a badge from premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgba8_premul.len() != width as usize * height as usize * 4
        {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}
