use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::render::pixels::premultiply_rgba8_in_place;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> CanvasResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CanvasError::decode("image size overflow"))?;
        if rgba.len() != expected {
            return Err(CanvasError::decode(format!(
                "expected {expected} rgba8 bytes for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    /// Solid straight-alpha color, handy for placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> CanvasResult<Self> {
        let px = rgba.repeat((width as usize) * (height as usize));
        Self::from_straight_rgba8(width, height, px)
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Decode any format the `image` crate recognizes.
pub fn decode_image(bytes: &[u8]) -> CanvasResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CanvasError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
