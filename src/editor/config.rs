use crate::foundation::core::Vec2;
use crate::interaction::gesture::DEFAULT_WHEEL_ZOOM_FACTOR;
use crate::persist::store::SESSION_KEY;

/// File name used by [`crate::Editor::export_to_dir`].
pub const DEFAULT_EXPORT_FILE_NAME: &str = "golden_celestial_ratio.png";

/// Editor behaviour knobs. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorOpts {
    /// Scale change per wheel `delta_y` unit.
    pub wheel_zoom_factor: f64,
    /// Store key holding the saved session.
    pub session_key: String,
    /// File name for exports into a directory.
    pub export_file_name: String,
    /// Surface top-left corner in input space.
    pub surface_origin: Vec2,
    /// Maximum retained undo steps; `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            wheel_zoom_factor: DEFAULT_WHEEL_ZOOM_FACTOR,
            session_key: SESSION_KEY.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            surface_origin: Vec2::ZERO,
            history_limit: Some(100),
        }
    }
}

impl EditorOpts {
    pub fn with_wheel_zoom_factor(mut self, factor: f64) -> Self {
        self.wheel_zoom_factor = factor;
        self
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    pub fn with_surface_origin(mut self, origin: Vec2) -> Self {
        self.surface_origin = origin;
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/config.rs"]
mod tests;
