use crate::foundation::core::{ImageRef, Point, Rect, Size, Vec2, clamp_scale};

/// One decorative layer composited over the base image.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Top-left corner in surface space.
    pub position: Point,
    scale: f64,
    /// Rotation about `position`, in degrees. Unbounded.
    pub rotation_degrees: f64,
    native_size: Size,
    image: ImageRef,
}

impl Overlay {
    /// New overlay at the origin with scale 1 and no rotation.
    pub fn new(image: ImageRef, native_size: Size) -> Self {
        Self {
            position: Point::ORIGIN,
            scale: 1.0,
            rotation_degrees: 0.0,
            native_size,
            image,
        }
    }

    /// Rebuild an overlay from persisted fields. `scale` is clamped.
    pub fn from_parts(
        image: ImageRef,
        native_size: Size,
        position: Point,
        scale: f64,
        rotation_degrees: f64,
    ) -> Self {
        Self {
            position,
            scale: clamp_scale(scale, 1.0),
            rotation_degrees,
            native_size,
            image,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Intrinsic size captured when the overlay was added. Never changes.
    pub fn native_size(&self) -> Size {
        self.native_size
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn translate_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Additive zoom (wheel input). Returns the new scale.
    pub fn adjust_scale(&mut self, delta: f64) -> f64 {
        self.scale = clamp_scale(self.scale + delta, self.scale);
        self.scale
    }

    /// Multiplicative zoom (pinch input). Returns the new scale.
    pub fn multiply_scale(&mut self, ratio: f64) -> f64 {
        self.scale = clamp_scale(self.scale * ratio, self.scale);
        self.scale
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation_degrees += degrees;
    }

    /// Unrotated bounding box: `position` to `position + native_size * scale`.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.native_size * self.scale)
    }

    /// Inclusive containment test against [`Overlay::bounds`].
    pub fn contains(&self, p: Point) -> bool {
        let b = self.bounds();
        p.x >= b.x0 && p.x <= b.x1 && p.y >= b.y0 && p.y <= b.y1
    }
}

/// Overlays in paint order (index 0 paints first) plus the current selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayStack {
    overlays: Vec<Overlay>,
    selected: Option<usize>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a stack from persisted overlays. Nothing is selected.
    pub fn from_overlays(overlays: Vec<Overlay>) -> Self {
        Self {
            overlays,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Overlay> {
        self.overlays.iter()
    }

    pub fn as_slice(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn get(&self, index: usize) -> Option<&Overlay> {
        self.overlays.get(index)
    }

    /// Append on top and select it. Returns its index.
    pub fn push(&mut self, overlay: Overlay) -> usize {
        self.overlays.push(overlay);
        let idx = self.overlays.len() - 1;
        self.selected = Some(idx);
        idx
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Overlay> {
        self.selected.and_then(|i| self.overlays.get(i))
    }

    pub fn selected_mut(&mut self) -> Option<&mut Overlay> {
        self.selected.and_then(|i| self.overlays.get_mut(i))
    }

    /// Select by index. Out-of-range indices are ignored and return `false`.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.overlays.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Drop every overlay and the selection.
    pub fn clear(&mut self) {
        self.overlays.clear();
        self.selected = None;
    }

    /// Swap the selected overlay with the one painted just before it.
    ///
    /// No-op (returns `false`) without a selection or at index 0.
    pub fn move_selected_up(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => {
                self.overlays.swap(i - 1, i);
                self.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Swap the selected overlay with the one painted just after it.
    ///
    /// No-op (returns `false`) without a selection or at the last index.
    pub fn move_selected_down(&mut self) -> bool {
        match self.selected {
            Some(i) if i + 1 < self.overlays.len() => {
                self.overlays.swap(i, i + 1);
                self.selected = Some(i + 1);
                true
            }
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a OverlayStack {
    type Item = &'a Overlay;
    type IntoIter = std::slice::Iter<'a, Overlay>;

    fn into_iter(self) -> Self::IntoIter {
        self.overlays.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/overlay.rs"]
mod tests;
