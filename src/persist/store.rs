use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{CanvasError, CanvasResult};

/// Key under which the editor keeps its saved session.
pub const SESSION_KEY: &str = "savedProject";

/// Local key-value storage for serialized sessions.
pub trait SessionStore {
    fn save(&mut self, key: &str, value: &str) -> CanvasResult<()>;
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> CanvasResult<Option<String>>;
}

/// In-process store, lost on drop.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str) -> CanvasResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> CanvasResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}

/// One `<key>.json` file per key under a root directory.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> CanvasResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CanvasError::validation(format!(
                "store key '{key}' must be non-empty ascii alphanumerics, '_' or '-'"
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl SessionStore for DirStore {
    fn save(&mut self, key: &str, value: &str) -> CanvasResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root).map_err(|e| {
            CanvasError::persist(format!("create store dir '{}': {e}", self.root.display()))
        })?;
        std::fs::write(&path, value)
            .map_err(|e| CanvasError::persist(format!("write '{}': {e}", path.display())))
    }

    fn load(&self, key: &str) -> CanvasResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CanvasError::persist(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;
