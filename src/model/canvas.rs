use crate::foundation::core::{Size, Vec2, clamp_scale};

/// Placement of the base image on the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
    /// Pan offset in surface pixels.
    pub translate: Vec2,
    scale: f64,
    /// Mirror horizontally about the image's own width.
    pub flipped: bool,
    /// Invert RGB channels of the composited surface.
    pub inverted: bool,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CanvasTransform {
    /// Identity placement: no pan, scale 1, no flip, no invert.
    pub fn identity() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
            flipped: false,
            inverted: false,
        }
    }

    /// Build a transform from raw parts. `scale` is clamped.
    pub fn from_parts(translate: Vec2, scale: f64, flipped: bool, inverted: bool) -> Self {
        Self {
            translate,
            scale: clamp_scale(scale, 1.0),
            flipped,
            inverted,
        }
    }

    /// Uniform zoom factor, always within `[MIN_SCALE, MAX_SCALE]`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the pan offset.
    pub fn set_translate(&mut self, dx: f64, dy: f64) {
        self.translate = Vec2::new(dx, dy);
    }

    /// Additive zoom (wheel input). Returns the new scale.
    pub fn adjust_scale(&mut self, delta: f64) -> f64 {
        self.scale = clamp_scale(self.scale + delta, self.scale);
        self.scale
    }

    /// Set the zoom factor directly (clamped).
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale, self.scale);
    }

    pub fn toggle_flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn toggle_invert(&mut self) {
        self.inverted = !self.inverted;
    }

    /// Return to identity.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Size of the drawing surface for a base image of `base` pixels.
    pub fn surface_size(&self, base: Size) -> Size {
        Size::new(base.width * self.scale, base.height * self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/canvas.rs"]
mod tests;
