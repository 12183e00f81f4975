use crate::foundation::core::{ImageRef, Rect, Vec2};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::render::backend::{PixelBuffer, Renderer};

/// One renderer call, as captured by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Clear,
    Save,
    Restore,
    Translate(Vec2),
    Scale { sx: f64, sy: f64 },
    Rotate { radians: f64 },
    DrawImage { image: ImageRef, dest: Rect },
    ReadPixels,
    WritePixels,
}

/// Renderer that paints nothing and records every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    width: u32,
    height: u32,
    depth: usize,
    failing_image: Option<ImageRef>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `draw_image` of `image` fail with a render error.
    pub fn with_failing_image(mut self, image: ImageRef) -> Self {
        self.failing_image = Some(image);
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn open_scopes(&self) -> usize {
        self.depth
    }
}

impl Renderer for RecordingRenderer {
    fn resize_surface(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        self.width = width;
        self.height = height;
        self.depth = 0;
        self.commands.push(DrawCommand::Resize { width, height });
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn rotate(&mut self, radians: f64) {
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn draw_image(&mut self, image: &ImageRef, dest: Rect) -> CanvasResult<()> {
        if self.failing_image.as_ref() == Some(image) {
            return Err(CanvasError::render(format!("draw of '{image}' failed")));
        }
        self.commands.push(DrawCommand::DrawImage {
            image: image.clone(),
            dest,
        });
        Ok(())
    }

    fn read_pixels(&mut self) -> CanvasResult<PixelBuffer> {
        self.commands.push(DrawCommand::ReadPixels);
        Ok(PixelBuffer::transparent(self.width, self.height))
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) -> CanvasResult<()> {
        if pixels.width != self.width || pixels.height != self.height || !pixels.byte_len_matches()
        {
            return Err(CanvasError::render(
                "write_pixels buffer does not match the surface",
            ));
        }
        self.commands.push(DrawCommand::WritePixels);
        Ok(())
    }
}
