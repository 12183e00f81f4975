use crate::foundation::core::ImageRef;
use crate::model::canvas::CanvasTransform;
use crate::model::overlay::OverlayStack;

/// The unit of save/restore: base image reference, transforms, overlays and annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Reference to the base image's pixel source.
    pub base_image: ImageRef,
    /// Base image placement.
    pub canvas: CanvasTransform,
    /// Overlays in paint order.
    pub overlays: OverlayStack,
    /// Opaque records carried through save/load without interpretation.
    pub annotations: Vec<serde_json::Value>,
}

impl Session {
    /// Fresh session for a newly loaded base image.
    pub fn new(base_image: ImageRef) -> Self {
        Self {
            base_image,
            canvas: CanvasTransform::identity(),
            overlays: OverlayStack::new(),
            annotations: Vec::new(),
        }
    }

    /// Identity transform, empty overlay stack, no selection.
    ///
    /// The base image and annotations are kept.
    pub fn reset(&mut self) {
        self.canvas.reset();
        self.overlays.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/session.rs"]
mod tests;
