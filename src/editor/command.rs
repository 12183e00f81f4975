use crate::foundation::core::ImageRef;
use crate::interaction::input::InputEvent;

/// One scripted editor operation, as read from a replay file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    LoadImage { src: ImageRef },
    AddOverlay { src: ImageRef },
    ToggleFlip,
    ToggleInvert,
    Reset,
    MoveLayerUp,
    MoveLayerDown,
    Undo,
    Redo,
    Input { event: InputEvent },
}
