use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::core::ImageRef;
use crate::foundation::error::{CanvasError, CanvasResult};

/// Resolves an [`ImageRef`] to decoded pixels.
pub trait ImageSource {
    fn load(&mut self, image: &ImageRef) -> CanvasResult<DecodedImage>;
}

/// Reads images from files below a root directory.
#[derive(Clone, Debug)]
pub struct DirImageSource {
    root: PathBuf,
}

impl DirImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for DirImageSource {
    fn load(&mut self, image: &ImageRef) -> CanvasResult<DecodedImage> {
        let norm = normalize_rel_path(image.as_str())?;
        let path = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&path).map_err(|e| {
            CanvasError::decode(format!("failed to read image '{}': {e}", path.display()))
        })?;
        decode_image(&bytes)
    }
}

/// Pre-decoded images keyed by reference.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<ImageRef, DecodedImage>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: impl Into<ImageRef>, decoded: DecodedImage) {
        self.images.insert(image.into(), decoded);
    }

    pub fn with_image(mut self, image: impl Into<ImageRef>, decoded: DecodedImage) -> Self {
        self.insert(image, decoded);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn load(&mut self, image: &ImageRef) -> CanvasResult<DecodedImage> {
        self.images
            .get(image)
            .cloned()
            .ok_or_else(|| CanvasError::decode(format!("unknown image '{image}'")))
    }
}

/// Normalize and validate a root-relative image path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CanvasResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CanvasError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(CanvasError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CanvasError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CanvasError::validation(
            "image path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
