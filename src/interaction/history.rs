use crate::model::session::Session;

/// An undoable edit. What it restores is up to the implementor.
pub trait EditAction: Send {
    fn undo(&self, session: &mut Session);
    fn redo(&self, session: &mut Session);
    fn description(&self) -> String;
}

/// Restores a whole captured session on undo and redo.
#[derive(Clone, Debug)]
pub struct SnapshotAction {
    description: String,
    before: Session,
    after: Session,
}

impl SnapshotAction {
    pub fn new(description: impl Into<String>, before: Session, after: Session) -> Self {
        Self {
            description: description.into(),
            before,
            after,
        }
    }
}

impl EditAction for SnapshotAction {
    fn undo(&self, session: &mut Session) {
        *session = self.before.clone();
    }

    fn redo(&self, session: &mut Session) {
        *session = self.after.clone();
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Linear undo/redo stack.
///
/// `cursor` counts applied actions; everything at or after it is the redo tail.
pub struct History {
    actions: Vec<Box<dyn EditAction>>,
    cursor: usize,
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("len", &self.actions.len())
            .field("cursor", &self.cursor)
            .field("limit", &self.limit)
            .finish()
    }
}

impl History {
    /// `limit` caps the number of retained actions; the oldest are dropped first.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            actions: Vec::new(),
            cursor: 0,
            limit: limit.filter(|&n| n > 0),
        }
    }

    /// Record an already-applied action. Discards the redo tail.
    pub fn push(&mut self, action: Box<dyn EditAction>) {
        self.actions.truncate(self.cursor);
        self.actions.push(action);
        self.cursor = self.actions.len();
        self.prune();
    }

    /// Undo the most recent applied action. Returns its description.
    pub fn undo(&mut self, session: &mut Session) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let action = &self.actions[self.cursor];
        action.undo(session);
        Some(action.description())
    }

    /// Re-apply the next action in the redo tail. Returns its description.
    pub fn redo(&mut self, session: &mut Session) -> Option<String> {
        let action = self.actions.get(self.cursor)?;
        action.redo(session);
        self.cursor += 1;
        Some(action.description())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.actions.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.actions.len() - self.cursor
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cursor = 0;
    }

    fn prune(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.actions.len() > limit {
            let excess = self.actions.len() - limit;
            self.actions.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/history.rs"]
mod tests;
