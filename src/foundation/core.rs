use std::fmt;

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Smallest scale any transform may take.
pub const MIN_SCALE: f64 = 0.5;
/// Largest scale any transform may take.
pub const MAX_SCALE: f64 = 3.0;

/// Clamp a scale factor into `[MIN_SCALE, MAX_SCALE]`.
///
/// Non-finite input returns `fallback`.
pub fn clamp_scale(value: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(MIN_SCALE, MAX_SCALE)
}

/// Opaque handle to an image's pixel source (a relative path or URI).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap a reference string.
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Borrow the reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
