use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::decode::DecodedImage;
use crate::assets::source::ImageSource;
use crate::editor::command::EditorCommand;
use crate::editor::config::EditorOpts;
use crate::foundation::core::{ImageRef, Size};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::interaction::gesture::{GestureController, GestureOutcome, GestureState};
use crate::interaction::history::{EditAction, History};
use crate::interaction::input::{HistoryCommand, InputEvent};
use crate::model::overlay::Overlay;
use crate::model::session::Session;
use crate::persist::blob::{restore, snapshot};
use crate::persist::store::SessionStore;
use crate::render::backend::{PixelBuffer, Renderer};
use crate::render::composite::{composite, plan};
use crate::render::record::DrawCommand;

/// Owns one editing session and keeps the renderer's surface in sync with it.
///
/// Every mutating call recomposites before returning, so the surface always reflects the
/// current session.
pub struct Editor<R: Renderer, S: ImageSource> {
    opts: EditorOpts,
    session: Session,
    base: DecodedImage,
    gestures: GestureController,
    history: History,
    renderer: R,
    images: S,
}

impl<R: Renderer, S: ImageSource> std::fmt::Debug for Editor<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("base_image", &self.session.base_image)
            .field("overlays", &self.session.overlays.len())
            .field("state", &self.gestures.state())
            .field("history", &self.history)
            .finish()
    }
}

impl<R: Renderer, S: ImageSource> Editor<R, S> {
    /// Load `base_image` and start a fresh session on it.
    #[tracing::instrument(skip(images, renderer, opts))]
    pub fn open(
        base_image: ImageRef,
        images: S,
        renderer: R,
        opts: EditorOpts,
    ) -> CanvasResult<Self> {
        Self::from_session(Session::new(base_image), images, renderer, opts)
    }

    /// Start from an existing session, decoding every image it references.
    ///
    /// The session keeps no selection it did not already have.
    #[tracing::instrument(skip_all, fields(base = %session.base_image, overlays = session.overlays.len()))]
    pub fn from_session(
        session: Session,
        mut images: S,
        mut renderer: R,
        opts: EditorOpts,
    ) -> CanvasResult<Self> {
        let decoded = decode_session_images(&mut images, &session)?;
        register_session_images(&mut renderer, &session, &decoded)?;

        let mut editor = Self {
            gestures: GestureController::new(opts.surface_origin, opts.wheel_zoom_factor),
            history: History::new(opts.history_limit),
            session,
            base: decoded.base,
            renderer,
            images,
            opts,
        };
        editor.redraw()?;
        Ok(editor)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn images_mut(&mut self) -> &mut S {
        &mut self.images
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    /// Natural size of the current base image.
    pub fn base_size(&self) -> Size {
        self.base.size()
    }

    /// Swap in a new base image, keeping the transform and overlays.
    ///
    /// A decode or redraw failure leaves the session as it was.
    pub fn load_image(&mut self, image: ImageRef) -> CanvasResult<()> {
        let decoded = self.images.load(&image)?;
        self.renderer.register_image(&image, &decoded)?;
        tracing::debug!(
            %image,
            width = decoded.width,
            height = decoded.height,
            "base image loaded"
        );
        let prior = self.session.clone();
        self.session.base_image = image;
        let prior_base = std::mem::replace(&mut self.base, decoded);
        self.commit(prior, Some(prior_base))
    }

    /// Append an overlay showing `image` and select it. Returns its stack index.
    ///
    /// The overlay's native size is the current surface size, not the image's own size.
    pub fn add_overlay(&mut self, image: ImageRef) -> CanvasResult<usize> {
        let decoded = self.images.load(&image)?;
        self.renderer.register_image(&image, &decoded)?;

        let prior = self.session.clone();
        let native = self.session.canvas.surface_size(self.base.size());
        let index = self.session.overlays.push(Overlay::new(image, native));
        tracing::debug!(index, width = native.width, height = native.height, "overlay added");
        self.commit(prior, None)?;
        Ok(index)
    }

    pub fn toggle_flip(&mut self) -> CanvasResult<()> {
        let prior = self.session.clone();
        self.session.canvas.toggle_flip();
        self.commit(prior, None)
    }

    pub fn toggle_invert(&mut self) -> CanvasResult<()> {
        let prior = self.session.clone();
        self.session.canvas.toggle_invert();
        self.commit(prior, None)
    }

    /// Identity transform, no overlays, no selection. Idempotent.
    pub fn reset(&mut self) -> CanvasResult<()> {
        let prior = self.session.clone();
        self.gestures.cancel();
        self.session.reset();
        self.commit(prior, None)
    }

    /// Pan the base image to an absolute offset.
    pub fn set_base_translate(&mut self, dx: f64, dy: f64) -> CanvasResult<()> {
        let prior = self.session.clone();
        self.session.canvas.set_translate(dx, dy);
        self.commit(prior, None)
    }

    /// Add `delta` to the base scale, clamped. Returns the new scale.
    ///
    /// A scale whose surface cannot be allocated is rolled back and reported as an error.
    pub fn adjust_base_scale(&mut self, delta: f64) -> CanvasResult<f64> {
        let prior = self.session.clone();
        let scale = self.session.canvas.adjust_scale(delta);
        self.commit(prior, None)?;
        Ok(scale)
    }

    /// Swap the selected overlay with the one below it. Returns `false` (and does nothing)
    /// when there is no selection or it is already at index 0.
    pub fn move_layer_up(&mut self) -> CanvasResult<bool> {
        let prior = self.session.clone();
        let moved = self.session.overlays.move_selected_up();
        if moved {
            self.commit(prior, None)?;
        }
        Ok(moved)
    }

    pub fn move_layer_down(&mut self) -> CanvasResult<bool> {
        let prior = self.session.clone();
        let moved = self.session.overlays.move_selected_down();
        if moved {
            self.commit(prior, None)?;
        }
        Ok(moved)
    }

    /// Feed one input event through the gesture machine.
    ///
    /// If the resulting redraw fails, the mutation is rolled back and the gesture cancelled.
    pub fn handle_input(&mut self, event: &InputEvent) -> CanvasResult<GestureOutcome> {
        let prior = self.session.clone();
        let outcome = self.gestures.handle(&mut self.session, event);
        match outcome {
            GestureOutcome::History(HistoryCommand::Undo) => {
                self.undo()?;
            }
            GestureOutcome::History(HistoryCommand::Redo) => {
                self.redo()?;
            }
            GestureOutcome::Swipe(direction) => {
                tracing::debug!(?direction, "swipe");
            }
            _ if outcome.needs_redraw() => self.commit(prior, None)?,
            _ => {}
        }
        Ok(outcome)
    }

    /// Record an already-applied edit so it can be undone.
    pub fn push_action(&mut self, action: Box<dyn EditAction>) {
        self.history.push(action);
    }

    /// Undo the newest applied action. Returns its description, or `None` if there was none.
    ///
    /// On a redraw failure both the session and the history cursor stay where they were.
    pub fn undo(&mut self) -> CanvasResult<Option<String>> {
        if !self.history.can_undo() {
            return Ok(None);
        }
        let prior = self.session.clone();
        let Some(desc) = self.history.undo(&mut self.session) else {
            return Ok(None);
        };
        self.gestures.cancel();
        if let Err(err) = self.commit(prior, None) {
            let mut scratch = self.session.clone();
            self.history.redo(&mut scratch);
            return Err(err);
        }
        Ok(Some(desc))
    }

    pub fn redo(&mut self) -> CanvasResult<Option<String>> {
        if !self.history.can_redo() {
            return Ok(None);
        }
        let prior = self.session.clone();
        let Some(desc) = self.history.redo(&mut self.session) else {
            return Ok(None);
        };
        self.gestures.cancel();
        if let Err(err) = self.commit(prior, None) {
            let mut scratch = self.session.clone();
            self.history.undo(&mut scratch);
            return Err(err);
        }
        Ok(Some(desc))
    }

    /// Run one scripted command.
    pub fn apply(&mut self, command: &EditorCommand) -> CanvasResult<()> {
        match command {
            EditorCommand::LoadImage { src } => self.load_image(src.clone()),
            EditorCommand::AddOverlay { src } => self.add_overlay(src.clone()).map(drop),
            EditorCommand::ToggleFlip => self.toggle_flip(),
            EditorCommand::ToggleInvert => self.toggle_invert(),
            EditorCommand::Reset => self.reset(),
            EditorCommand::MoveLayerUp => self.move_layer_up().map(drop),
            EditorCommand::MoveLayerDown => self.move_layer_down().map(drop),
            EditorCommand::Undo => self.undo().map(drop),
            EditorCommand::Redo => self.redo().map(drop),
            EditorCommand::Input { event } => self.handle_input(event).map(drop),
        }
    }

    /// Serialize the session into `store` under the configured key.
    #[tracing::instrument(skip(self, store))]
    pub fn save_project(&self, store: &mut dyn SessionStore) -> CanvasResult<()> {
        let blob = snapshot(&self.session)?;
        store.save(&self.opts.session_key, &blob)?;
        tracing::debug!(bytes = blob.len(), "session saved");
        Ok(())
    }

    /// Replace the session with the one saved in `store`.
    ///
    /// Returns `Ok(false)` and leaves everything untouched when nothing is saved or the blob is
    /// malformed. Every referenced image is decoded before the swap, and a failed redraw swaps
    /// the previous session, base image and history back in.
    #[tracing::instrument(skip(self, store))]
    pub fn load_project(&mut self, store: &dyn SessionStore) -> CanvasResult<bool> {
        let Some(raw) = store.load(&self.opts.session_key)? else {
            tracing::debug!("no saved session");
            return Ok(false);
        };
        let restored = match restore(&raw) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed saved session");
                return Ok(false);
            }
        };

        let decoded = decode_session_images(&mut self.images, &restored)?;
        register_session_images(&mut self.renderer, &restored, &decoded)?;

        self.gestures.cancel();
        let overlays = restored.overlays.len();
        let prior = std::mem::replace(&mut self.session, restored);
        let prior_base = std::mem::replace(&mut self.base, decoded.base);
        let prior_history =
            std::mem::replace(&mut self.history, History::new(self.opts.history_limit));
        if let Err(err) = self.commit(prior, Some(prior_base)) {
            self.history = prior_history;
            return Err(err);
        }
        tracing::debug!(overlays, "session restored");
        Ok(true)
    }

    /// Redraw after an edit. On failure the session (and `prior_base`, when the base image was
    /// swapped) is put back and the surface is redrawn from it.
    fn commit(&mut self, prior: Session, prior_base: Option<DecodedImage>) -> CanvasResult<()> {
        let Err(err) = self.redraw() else {
            return Ok(());
        };
        tracing::warn!(error = %err, "redraw failed, edit rolled back");
        self.session = prior;
        if let Some(base) = prior_base {
            self.base = base;
        }
        self.gestures.cancel();
        if let Err(again) = self.redraw() {
            tracing::warn!(error = %again, "redraw of the restored session failed");
        }
        Err(err)
    }

    /// Recomposite the session onto the renderer's surface.
    pub fn redraw(&mut self) -> CanvasResult<()> {
        composite(&self.session, self.base.size(), &mut self.renderer)
    }

    /// The draw sequence for the current session.
    pub fn plan(&self) -> CanvasResult<Vec<DrawCommand>> {
        plan(&self.session, self.base.size())
    }

    /// Straight-alpha pixels of the current surface.
    pub fn read_pixels(&mut self) -> CanvasResult<PixelBuffer> {
        self.renderer.read_pixels()
    }

    /// Encode the current surface as PNG at `path`.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn export_png(&mut self, path: &Path) -> CanvasResult<()> {
        let pixels = self.renderer.read_pixels()?;
        if !pixels.byte_len_matches() {
            return Err(CanvasError::render("surface readback has the wrong length"));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &pixels.data,
            pixels.width,
            pixels.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Export into `dir` under the configured file name. Returns the written path.
    pub fn export_to_dir(&mut self, dir: &Path) -> CanvasResult<PathBuf> {
        let path = dir.join(&self.opts.export_file_name);
        self.export_png(&path)?;
        Ok(path)
    }

    pub fn into_parts(self) -> (Session, R) {
        (self.session, self.renderer)
    }
}

/// Decoded pixels for everything a session references.
struct SessionImages {
    base: DecodedImage,
    overlays: Vec<(ImageRef, DecodedImage)>,
}

fn decode_session_images<S: ImageSource>(
    images: &mut S,
    session: &Session,
) -> CanvasResult<SessionImages> {
    let base = images.load(&session.base_image)?;
    let mut overlays: Vec<(ImageRef, DecodedImage)> = Vec::new();
    for overlay in &session.overlays {
        if overlays.iter().any(|(r, _)| r == overlay.image()) {
            continue;
        }
        let decoded = images.load(overlay.image())?;
        overlays.push((overlay.image().clone(), decoded));
    }
    Ok(SessionImages { base, overlays })
}

fn register_session_images<R: Renderer>(
    renderer: &mut R,
    session: &Session,
    decoded: &SessionImages,
) -> CanvasResult<()> {
    renderer.register_image(&session.base_image, &decoded.base)?;
    for (image, pixels) in &decoded.overlays {
        renderer.register_image(image, pixels)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/editor/canvas_editor.rs"]
mod tests;
