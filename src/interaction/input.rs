use crate::foundation::core::Point;

/// Raw input, all coordinates in one screen space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { at: Point },
    PointerMove { at: Point },
    PointerUp,
    /// All contacts currently on the surface.
    TouchStart { touches: Vec<Point> },
    /// All contacts currently on the surface.
    TouchMove { touches: Vec<Point> },
    /// `changed` is the contact that lifted, when known.
    TouchEnd {
        #[serde(default)]
        changed: Option<Point>,
    },
    Wheel { delta_y: f64 },
    Key { chord: KeyChord },
}

/// A key pressed together with the platform's command modifier (or not).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyChord {
    pub modifier: bool,
    pub key: char,
}

/// History navigation requested by a key chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

impl KeyChord {
    pub fn new(modifier: bool, key: char) -> Self {
        Self { modifier, key }
    }

    /// `modifier+z` undoes, `modifier+y` redoes. Everything else maps to nothing.
    pub fn command(self) -> Option<HistoryCommand> {
        if !self.modifier {
            return None;
        }
        match self.key {
            'z' => Some(HistoryCommand::Undo),
            'y' => Some(HistoryCommand::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/input.rs"]
mod tests;
