use std::path::Path;

use crate::foundation::{
    core::unpremul_rgba8,
    error::{ScrollFxError, ScrollFxResult},
};

/// A rendered frame as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha**, matching what the rasterizer produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Frame with no pixels.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy of the pixels with alpha divided back out.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremul_rgba8([px[0], px[1], px[2], px[3]]));
        }
        out
    }
}

/// Encode `frame` as a straight-alpha PNG at `path`.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> ScrollFxResult<()> {
    if frame.is_empty() {
        return Err(ScrollFxError::render("cannot encode an empty frame"));
    }
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.data.len() != expected {
        return Err(ScrollFxError::render("frame byte len mismatch"));
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ScrollFxError::render(format!("write png '{}': {e}", path.display())))
}
