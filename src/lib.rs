//! Transform-and-compositing core for an interactive image overlay editor.
//!
//! A [`Session`] holds a base image with a pan/zoom/flip/invert transform and a z-ordered stack of
//! overlays. The [`Editor`] feeds raw pointer, touch, wheel and key input through a gesture state
//! machine, recomposites through a [`Renderer`] after every mutation, and saves or restores the
//! session as a JSON blob.
//!
//! - Open an [`Editor`] over an [`ImageSource`] and a renderer ([`CpuRenderer`] paints pixels,
//!   [`RecordingRenderer`] captures draw calls)
//! - Drive it with [`InputEvent`]s or scripted [`EditorCommand`]s
//! - Persist with any [`SessionStore`], export the surface with [`Editor::export_png`]
#![forbid(unsafe_code)]

mod assets;
mod editor;
mod foundation;
mod interaction;
mod model;
mod persist;
mod render;

pub use crate::foundation::core::{
    Affine, ImageRef, MAX_SCALE, MIN_SCALE, Point, Rect, Size, Vec2, clamp_scale,
};
pub use crate::foundation::error::{CanvasError, CanvasResult};
pub use crate::foundation::math::{contact_angle_deg, contact_distance};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::source::{DirImageSource, ImageSource, MemoryImageSource, normalize_rel_path};
pub use crate::editor::canvas_editor::Editor;
pub use crate::editor::command::EditorCommand;
pub use crate::editor::config::{DEFAULT_EXPORT_FILE_NAME, EditorOpts};
pub use crate::interaction::gesture::{
    DEFAULT_WHEEL_ZOOM_FACTOR, GestureController, GestureOutcome, GestureState, SwipeDirection,
};
pub use crate::interaction::hit_test::{hit_test, select_at};
pub use crate::interaction::history::{EditAction, History, SnapshotAction};
pub use crate::interaction::input::{HistoryCommand, InputEvent, KeyChord};
pub use crate::model::canvas::CanvasTransform;
pub use crate::model::overlay::{Overlay, OverlayStack};
pub use crate::model::session::Session;
pub use crate::persist::blob::{restore, snapshot};
pub use crate::persist::store::{DirStore, MemoryStore, SESSION_KEY, SessionStore};
pub use crate::render::backend::{PixelBuffer, Renderer, TransformScope};
pub use crate::render::composite::{MAX_SURFACE_DIM, composite, plan, surface_dims};
pub use crate::render::cpu::{CpuRenderer, CpuRendererOpts};
pub use crate::render::pixels::invert_rgb_in_place;
pub use crate::render::record::{DrawCommand, RecordingRenderer};
