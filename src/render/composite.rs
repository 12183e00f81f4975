use crate::foundation::core::{Point, Rect, Size, Vec2};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::model::overlay::Overlay;
use crate::model::session::Session;
use crate::render::backend::{Renderer, TransformScope};
use crate::render::pixels::invert_rgb_in_place;
use crate::render::record::{DrawCommand, RecordingRenderer};

/// Largest surface edge the compositor will ask a renderer for.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Whole-pixel surface size for a fractional one (truncated, at least 1x1).
pub fn surface_dims(size: Size) -> CanvasResult<(u32, u32)> {
    fn to_px(v: f64) -> CanvasResult<u32> {
        if !v.is_finite() || v < 0.0 {
            return Err(CanvasError::render("surface has invalid width/height"));
        }
        Ok((v.trunc() as u32).max(1))
    }

    let w = to_px(size.width)?;
    let h = to_px(size.height)?;
    if w > MAX_SURFACE_DIM || h > MAX_SURFACE_DIM {
        return Err(CanvasError::render(format!(
            "surface size too large: {w}x{h} (max {MAX_SURFACE_DIM}x{MAX_SURFACE_DIM})"
        )));
    }
    Ok((w, h))
}

/// Paint `session` over a base image of `base` pixels.
///
/// The output depends only on the session and `base`. Flip is applied inside the pan/zoom
/// scope, so it mirrors about the image's own width. Inversion runs once over the finished
/// surface.
#[tracing::instrument(skip(session, renderer), fields(overlays = session.overlays.len()))]
pub fn composite<R: Renderer + ?Sized>(
    session: &Session,
    base: Size,
    renderer: &mut R,
) -> CanvasResult<()> {
    let canvas = &session.canvas;
    let surface = canvas.surface_size(base);
    let (w, h) = surface_dims(surface)?;
    renderer.resize_surface(w, h)?;
    renderer.clear();

    let mut scope = TransformScope::enter(renderer);
    scope.translate(canvas.translate);
    scope.scale(canvas.scale(), canvas.scale());
    if canvas.flipped {
        scope.scale(-1.0, 1.0);
        scope.translate(Vec2::new(-base.width, 0.0));
    }

    scope.draw_image(
        &session.base_image,
        Rect::from_origin_size(Point::ORIGIN, surface),
    )?;

    for overlay in &session.overlays {
        draw_overlay(&mut *scope, overlay)?;
    }

    if canvas.inverted {
        let mut pixels = scope.read_pixels()?;
        invert_rgb_in_place(&mut pixels.data);
        scope.write_pixels(&pixels)?;
    }
    Ok(())
}

fn draw_overlay<R: Renderer + ?Sized>(renderer: &mut R, overlay: &Overlay) -> CanvasResult<()> {
    let mut scope = TransformScope::enter(renderer);
    scope.translate(overlay.position.to_vec2());
    scope.scale(overlay.scale(), overlay.scale());
    scope.rotate(overlay.rotation_degrees.to_radians());
    scope.draw_image(
        overlay.image(),
        Rect::from_origin_size(Point::ORIGIN, overlay.native_size()),
    )
}

/// The draw sequence [`composite`] would issue, without painting anything.
pub fn plan(session: &Session, base: Size) -> CanvasResult<Vec<DrawCommand>> {
    let mut recorder = RecordingRenderer::new();
    composite(session, base, &mut recorder)?;
    Ok(recorder.into_commands())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
