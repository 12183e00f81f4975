use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, ImageRef, Rect, Vec2};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::render::backend::{PixelBuffer, Renderer};
use crate::render::pixels::{over_in_place, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Options for [`CpuRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuRendererOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl CpuRendererOpts {
    /// Return options with a straight-alpha color used by `clear` instead of transparency.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// Software renderer powered by `vello_cpu`.
///
/// Draw calls are batched in a `vello_cpu::RenderContext` and composited onto a premultiplied
/// RGBA8 surface whenever pixels are read back.
pub struct CpuRenderer {
    opts: CpuRendererOpts,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    surface: Vec<u8>,
    pending: bool,
    transform: Affine,
    stack: Vec<Affine>,
    images: HashMap<ImageRef, ImagePaint>,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("images", &self.images.len())
            .field("depth", &self.stack.len())
            .finish()
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new(CpuRendererOpts::default())
    }
}

impl CpuRenderer {
    pub fn new(opts: CpuRendererOpts) -> Self {
        Self {
            opts,
            width: 1,
            height: 1,
            ctx: vello_cpu::RenderContext::new(1, 1),
            surface: vec![0; 4],
            pending: false,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            images: HashMap::new(),
        }
    }

    /// Current transform, as set by `translate`/`scale`/`rotate`.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn open_scopes(&self) -> usize {
        self.stack.len()
    }

    pub fn has_image(&self, image: &ImageRef) -> bool {
        self.images.contains_key(image)
    }

    fn flush_pending(&mut self) -> CanvasResult<()> {
        if !self.pending {
            return Ok(());
        }
        self.ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut layer);
        over_in_place(&mut self.surface, layer.data_as_u8_slice())?;
        self.ctx.reset();
        self.pending = false;
        Ok(())
    }

    fn fill_surface(&mut self) {
        match self.opts.clear_rgba {
            Some(rgba) => {
                let mut px = rgba;
                premultiply_rgba8_in_place(&mut px);
                for dst in self.surface.chunks_exact_mut(4) {
                    dst.copy_from_slice(&px);
                }
            }
            None => self.surface.fill(0),
        }
    }
}

impl Renderer for CpuRenderer {
    fn resize_surface(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        let w: u16 = width
            .try_into()
            .map_err(|_| CanvasError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CanvasError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(CanvasError::render("surface must be at least 1x1"));
        }
        if w != self.width || h != self.height {
            self.ctx = vello_cpu::RenderContext::new(w, h);
        } else {
            self.ctx.reset();
        }
        self.width = w;
        self.height = h;
        self.surface = vec![0; (w as usize) * (h as usize) * 4];
        self.pending = false;
        self.transform = Affine::IDENTITY;
        self.stack.clear();
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn clear(&mut self) {
        self.ctx.reset();
        self.pending = false;
        self.fill_surface();
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform *= Affine::translate(offset);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform *= Affine::scale_non_uniform(sx, sy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform *= Affine::rotate(radians);
    }

    fn draw_image(&mut self, image: &ImageRef, dest: Rect) -> CanvasResult<()> {
        let Some(p) = self.images.get(image) else {
            return Err(CanvasError::render(format!(
                "image '{image}' was never registered"
            )));
        };
        if dest.width() == 0.0 || dest.height() == 0.0 {
            return Ok(());
        }
        let (w, h) = (f64::from(p.w), f64::from(p.h));
        let tr = self.transform
            * Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / w, dest.height() / h);

        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(p.paint.clone());
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        self.pending = true;
        Ok(())
    }

    fn read_pixels(&mut self) -> CanvasResult<PixelBuffer> {
        self.flush_pending()?;
        let mut data = self.surface.clone();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(PixelBuffer {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
        })
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) -> CanvasResult<()> {
        let (w, h) = self.surface_size();
        if pixels.width != w || pixels.height != h || !pixels.byte_len_matches() {
            return Err(CanvasError::render(
                "write_pixels buffer does not match the surface",
            ));
        }
        self.flush_pending()?;
        self.surface.copy_from_slice(&pixels.data);
        premultiply_rgba8_in_place(&mut self.surface);
        Ok(())
    }

    fn register_image(&mut self, image: &ImageRef, decoded: &DecodedImage) -> CanvasResult<()> {
        let pixmap =
            pixmap_from_premul_bytes(&decoded.rgba8_premul, decoded.width, decoded.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.images.insert(
            image.clone(),
            ImagePaint {
                paint,
                w: decoded.width,
                h: decoded.height,
            },
        );
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CanvasResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CanvasError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CanvasError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CanvasError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
