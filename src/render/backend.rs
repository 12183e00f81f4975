use std::ops::{Deref, DerefMut};

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{ImageRef, Rect, Vec2};
use crate::foundation::error::CanvasResult;

/// Straight-alpha RGBA8 pixels read back from (or written to) a surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, not premultiplied.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn byte_len_matches(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 4
    }
}

/// The drawing capability the compositor needs.
///
/// Transform calls post-multiply the current transform, like a 2D canvas context. `save` and
/// `restore` push and pop that transform; prefer [`TransformScope`] over calling them directly.
pub trait Renderer {
    /// Resize the surface. Clears pixels and resets the transform stack.
    fn resize_surface(&mut self, width: u32, height: u32) -> CanvasResult<()>;
    /// Current surface size in pixels.
    fn surface_size(&self) -> (u32, u32);
    /// Fill the surface with transparent pixels.
    fn clear(&mut self);
    fn save(&mut self);
    /// Pop the transform pushed by the matching `save`. Extra calls are ignored.
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, sx: f64, sy: f64);
    fn rotate(&mut self, radians: f64);
    /// Draw `image` stretched into `dest` under the current transform.
    fn draw_image(&mut self, image: &ImageRef, dest: Rect) -> CanvasResult<()>;
    /// Read back the whole surface, ignoring the current transform.
    fn read_pixels(&mut self) -> CanvasResult<PixelBuffer>;
    /// Replace the whole surface. The buffer must match the surface size.
    fn write_pixels(&mut self, pixels: &PixelBuffer) -> CanvasResult<()>;
    /// Make decoded pixels available under `image` for later `draw_image` calls.
    fn register_image(&mut self, _image: &ImageRef, _decoded: &DecodedImage) -> CanvasResult<()> {
        Ok(())
    }
}

/// A `save` whose matching `restore` runs on drop, even when a draw call fails with `?`.
pub struct TransformScope<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer + ?Sized> TransformScope<'a, R> {
    pub fn enter(renderer: &'a mut R) -> Self {
        renderer.save();
        Self { renderer }
    }
}

impl<R: Renderer + ?Sized> Deref for TransformScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for TransformScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for TransformScope<'_, R> {
    fn drop(&mut self) {
        self.renderer.restore();
    }
}
